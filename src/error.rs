use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use thiserror::Error;

/// Opaque error type for C callers.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct interop_error_t;

#[derive(Debug, Error, Eq, PartialEq)]
pub(crate) enum FixtureError {
    #[error("{field} was null")]
    NullPointer { field: &'static str },
    #[error("incrementing {value} would overflow")]
    Overflow { value: i32 },
}

struct ErrorHandle {
    message: CString,
}

pub(crate) fn cstring_from_str_lossy(value: &str) -> CString {
    let sanitized = value.replace('\0', " ");
    // No interior NULs remain after sanitizing.
    CString::new(sanitized).unwrap_or_default()
}

pub(crate) fn clear_error(out_error: *mut *mut interop_error_t) {
    if !out_error.is_null() {
        // Safety: caller provided a valid out_error pointer.
        unsafe {
            *out_error = ptr::null_mut();
        }
    }
}

pub(crate) fn write_error(out_error: *mut *mut interop_error_t, error: FixtureError) {
    log::debug!("reporting error to caller: {error}");
    write_message(out_error, &error.to_string());
}

pub(crate) fn write_message(out_error: *mut *mut interop_error_t, message: &str) {
    if out_error.is_null() {
        return;
    }
    let handle = Box::new(ErrorHandle {
        message: cstring_from_str_lossy(message),
    });
    // Safety: out_error is non-null and points to writable memory.
    unsafe {
        *out_error = Box::into_raw(handle) as *mut interop_error_t;
    }
}

/// Returns the message for an error allocated by this library.
///
/// The returned pointer is valid as long as the error handle is alive.
#[unsafe(no_mangle)]
pub extern "C" fn interop_error_message(error: *const interop_error_t) -> *const c_char {
    if error.is_null() {
        return ptr::null();
    }
    // Safety: error must be a valid handle allocated by this library.
    let handle = unsafe { &*(error as *const ErrorHandle) };
    handle.message.as_ptr()
}

/// Frees an error handle.
#[unsafe(no_mangle)]
pub extern "C" fn interop_error_free(error: *mut interop_error_t) {
    if error.is_null() {
        return;
    }
    // Safety: error must be a valid handle allocated by this library.
    unsafe {
        drop(Box::from_raw(error as *mut ErrorHandle));
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn error_handle_carries_message() {
        let mut error: *mut interop_error_t = ptr::null_mut();
        write_error(&mut error, FixtureError::NullPointer { field: "value" });
        assert!(!error.is_null());

        let message = unsafe { CStr::from_ptr(interop_error_message(error)) };
        assert_eq!(message.to_str().unwrap(), "value was null");
        interop_error_free(error);
    }

    #[test]
    fn clear_error_resets_out_pointer() {
        let mut error: *mut interop_error_t = ptr::null_mut();
        write_error(&mut error, FixtureError::Overflow { value: i32::MAX });
        let previous = error;
        clear_error(&mut error);
        assert!(error.is_null());
        interop_error_free(previous);
    }

    #[test]
    fn interior_nul_is_replaced() {
        let value = cstring_from_str_lossy("a\0b");
        assert_eq!(value.to_str().unwrap(), "a b");
    }

    #[test]
    fn null_handles_are_tolerated() {
        assert!(interop_error_message(ptr::null()).is_null());
        interop_error_free(ptr::null_mut());
        write_error(ptr::null_mut(), FixtureError::NullPointer { field: "x" });
    }
}
