//! Shared pointer helpers for the exported functions.

use crate::error::{FixtureError, interop_error_t, write_error};

/// Borrows the pointee of a caller-supplied pointer, reporting null through `out_error`.
pub(crate) fn read_mut<'a, T>(
    value: *mut T,
    field: &'static str,
    out_error: *mut *mut interop_error_t,
) -> Option<&'a mut T> {
    if value.is_null() {
        log::warn!("{field} was null");
        write_error(out_error, FixtureError::NullPointer { field });
        return None;
    }
    // Safety: caller guarantees a valid, aligned, writable pointer.
    Some(unsafe { &mut *value })
}
