//! Heap-allocated two-field records returned under different calling conventions.

/// Two-field numeric record, laid out as `struct { double x; double y; }`.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct interop_point_t {
    pub x: f64,
    pub y: f64,
}

fn allocate(x: f64, y: f64) -> *mut interop_point_t {
    Box::into_raw(Box::new(interop_point_t { x, y }))
}

/// Allocates a record holding `x` and `y` using the C calling convention.
///
/// The returned record should be released with `interop_point_free`.
#[unsafe(no_mangle)]
pub extern "C" fn interop_point_create_cdecl(x: f64, y: f64) -> *mut interop_point_t {
    log::trace!("interop_point_create_cdecl({x}, {y})");
    allocate(x, y)
}

/// Allocates a record holding `x` and `y` using the system calling convention.
///
/// This is `stdcall` on 32-bit Windows and the C convention everywhere else.
/// The returned record should be released with `interop_point_free`.
#[unsafe(no_mangle)]
pub extern "system" fn interop_point_create_stdcall(x: f64, y: f64) -> *mut interop_point_t {
    log::trace!("interop_point_create_stdcall({x}, {y})");
    allocate(x, y)
}

/// Frees a record returned by one of the `interop_point_create_*` functions.
#[unsafe(no_mangle)]
pub extern "C" fn interop_point_free(point: *mut interop_point_t) {
    if point.is_null() {
        return;
    }
    // Safety: point must have been allocated by this library.
    unsafe {
        drop(Box::from_raw(point));
    }
}
