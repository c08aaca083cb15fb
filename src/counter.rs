//! Increment an integer through a caller-owned pointer.

use std::os::raw::c_int;

use crate::error::{FixtureError, clear_error, interop_error_t, write_error};
use crate::ffi::read_mut;

/// Increments `*value` by one and returns the new value.
///
/// `c_int::MAX` wraps to `c_int::MIN`. A null `value` returns 0 and writes nothing.
#[unsafe(no_mangle)]
pub extern "C" fn interop_increment(value: *mut c_int) -> c_int {
    let Some(value) = read_mut(value, "value", std::ptr::null_mut()) else {
        return 0;
    };
    let next = value.wrapping_add(1);
    if next < *value {
        log::warn!("interop_increment wrapped {} to {next}", *value);
    } else {
        log::trace!("interop_increment({}) -> {next}", *value);
    }
    *value = next;
    next
}

/// Increments `*value` by one, storing the new value in both `*value` and `*out_value`.
///
/// Returns false and sets `out_error` when either pointer is null or the increment
/// would overflow. `*value` is left untouched on failure.
#[unsafe(no_mangle)]
pub extern "C" fn interop_increment_checked(
    value: *mut c_int,
    out_value: *mut c_int,
    out_error: *mut *mut interop_error_t,
) -> bool {
    clear_error(out_error);
    let Some(current) = read_mut(value, "value", out_error).map(|value| *value) else {
        return false;
    };
    if read_mut(out_value, "out_value", out_error).is_none() {
        return false;
    }
    let Some(next) = current.checked_add(1) else {
        write_error(out_error, FixtureError::Overflow { value: current });
        return false;
    };
    log::trace!("interop_increment_checked({current}) -> {next}");
    // Safety: both pointers were checked above; they may alias.
    unsafe {
        *value = next;
        *out_value = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::ptr;

    use super::*;
    use crate::error::{interop_error_free, interop_error_message};

    fn message(error: *mut interop_error_t) -> String {
        let text = unsafe { CStr::from_ptr(interop_error_message(error)) }
            .to_string_lossy()
            .into_owned();
        interop_error_free(error);
        text
    }

    #[test]
    fn increments_in_place_and_returns_new_value() {
        for start in [-2, -1, 0, 41, 1_000_000] {
            let mut value: c_int = start;
            assert_eq!(interop_increment(&mut value), start + 1);
            assert_eq!(value, start + 1);
        }
    }

    #[test]
    fn repeated_calls_accumulate() {
        let mut value: c_int = 0;
        for _ in 0..10 {
            interop_increment(&mut value);
        }
        assert_eq!(value, 10);
    }

    #[test]
    fn max_wraps_to_min() {
        let mut value = c_int::MAX;
        assert_eq!(interop_increment(&mut value), c_int::MIN);
        assert_eq!(value, c_int::MIN);
    }

    #[test]
    fn null_returns_zero() {
        assert_eq!(interop_increment(ptr::null_mut()), 0);
    }

    #[test]
    fn checked_reports_new_value() {
        let mut value: c_int = 7;
        let mut out_value: c_int = 0;
        let mut error: *mut interop_error_t = ptr::null_mut();
        assert!(interop_increment_checked(&mut value, &mut out_value, &mut error));
        assert!(error.is_null());
        assert_eq!((value, out_value), (8, 8));
    }

    #[test]
    fn checked_rejects_overflow_without_writing() {
        let mut value = c_int::MAX;
        let mut out_value: c_int = 0;
        let mut error: *mut interop_error_t = ptr::null_mut();
        assert!(!interop_increment_checked(&mut value, &mut out_value, &mut error));
        assert_eq!(value, c_int::MAX);
        assert_eq!(out_value, 0);
        assert_eq!(message(error), format!("incrementing {} would overflow", c_int::MAX));
    }

    #[test]
    fn checked_rejects_null_pointers() {
        let mut value: c_int = 1;
        let mut error: *mut interop_error_t = ptr::null_mut();
        assert!(!interop_increment_checked(ptr::null_mut(), &mut value, &mut error));
        assert_eq!(message(error), "value was null");

        let mut error: *mut interop_error_t = ptr::null_mut();
        assert!(!interop_increment_checked(&mut value, ptr::null_mut(), &mut error));
        assert_eq!(message(error), "out_value was null");
        assert_eq!(value, 1);
    }
}
