//! C-ABI fixtures for foreign-function interop conformance tests.

mod counter;
mod error;
mod ffi;
mod logging;
mod point;

pub use counter::{interop_increment, interop_increment_checked};
pub use error::{interop_error_free, interop_error_message, interop_error_t};
pub use logging::{
    LOG_ENV, interop_log_callback_t, interop_log_config_init, interop_log_config_t,
    interop_log_init, interop_log_level_t, interop_log_record_t,
};
pub use point::{
    interop_point_create_cdecl, interop_point_create_stdcall, interop_point_free,
    interop_point_t,
};
