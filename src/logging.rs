//! Logging configuration exposed to C callers.

use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, RwLock};

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;

use crate::error::{clear_error, cstring_from_str_lossy, interop_error_t, write_message};

/// Environment variable consulted when `interop_log_init` receives no config.
pub const LOG_ENV: &str = "INTEROP_LOG";

static LOGGER_INSTALLED: AtomicBool = AtomicBool::new(false);
static LOGGER_INIT: Once = Once::new();
static INTEROP_LOGGER: Lazy<InteropLogger> = Lazy::new(InteropLogger::new);

/// Log level values for fixture logging.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum interop_log_level_t {
    INTEROP_LOG_LEVEL_OFF = 0,
    INTEROP_LOG_LEVEL_ERROR = 1,
    INTEROP_LOG_LEVEL_WARN = 2,
    INTEROP_LOG_LEVEL_INFO = 3,
    INTEROP_LOG_LEVEL_DEBUG = 4,
    INTEROP_LOG_LEVEL_TRACE = 5,
}

impl From<interop_log_level_t> for LevelFilter {
    fn from(value: interop_log_level_t) -> Self {
        match value {
            interop_log_level_t::INTEROP_LOG_LEVEL_OFF => LevelFilter::Off,
            interop_log_level_t::INTEROP_LOG_LEVEL_ERROR => LevelFilter::Error,
            interop_log_level_t::INTEROP_LOG_LEVEL_WARN => LevelFilter::Warn,
            interop_log_level_t::INTEROP_LOG_LEVEL_INFO => LevelFilter::Info,
            interop_log_level_t::INTEROP_LOG_LEVEL_DEBUG => LevelFilter::Debug,
            interop_log_level_t::INTEROP_LOG_LEVEL_TRACE => LevelFilter::Trace,
        }
    }
}

impl From<Level> for interop_log_level_t {
    fn from(value: Level) -> Self {
        match value {
            Level::Error => interop_log_level_t::INTEROP_LOG_LEVEL_ERROR,
            Level::Warn => interop_log_level_t::INTEROP_LOG_LEVEL_WARN,
            Level::Info => interop_log_level_t::INTEROP_LOG_LEVEL_INFO,
            Level::Debug => interop_log_level_t::INTEROP_LOG_LEVEL_DEBUG,
            Level::Trace => interop_log_level_t::INTEROP_LOG_LEVEL_TRACE,
        }
    }
}

/// Log record delivered to a C callback.
///
/// String pointers are only valid for the duration of the callback. `line` is 0 when unknown.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct interop_log_record_t {
    pub level: interop_log_level_t,
    pub target: *const c_char,
    pub message: *const c_char,
    pub line: u32,
}

/// Callback invoked for each enabled log record, from whichever thread emitted it.
#[allow(non_camel_case_types)]
pub type interop_log_callback_t =
    Option<extern "C" fn(record: *const interop_log_record_t, user_data: *mut c_void)>;

/// Configuration for `interop_log_init`.
///
/// If `callback` is null, records are written to stderr.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct interop_log_config_t {
    pub level: interop_log_level_t,
    pub callback: interop_log_callback_t,
    pub user_data: *mut c_void,
}

struct LoggerConfig {
    level: LevelFilter,
    callback: interop_log_callback_t,
    // Stored as an address so the logger stays Send + Sync.
    user_data: usize,
}

struct InteropLogger {
    config: RwLock<LoggerConfig>,
}

impl InteropLogger {
    fn new() -> Self {
        Self {
            config: RwLock::new(LoggerConfig {
                level: LevelFilter::Warn,
                callback: None,
                user_data: 0,
            }),
        }
    }

    fn update(&self, config: LoggerConfig) {
        let mut guard = self.config.write().unwrap_or_else(|err| err.into_inner());
        *guard = config;
    }

    fn with_config<T>(&self, f: impl FnOnce(&LoggerConfig) -> T) -> T {
        let guard = self.config.read().unwrap_or_else(|err| err.into_inner());
        f(&guard)
    }
}

impl Log for InteropLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.with_config(|config| metadata.level() <= config.level)
    }

    fn log(&self, record: &Record) {
        let (callback, user_data, enabled) = self.with_config(|config| {
            (
                config.callback,
                config.user_data,
                record.level() <= config.level,
            )
        });
        if !enabled {
            return;
        }

        let Some(callback) = callback else {
            eprintln!("{} {}: {}", record.level(), record.target(), record.args());
            return;
        };
        let target = cstring_from_str_lossy(record.target());
        let message = cstring_from_str_lossy(&record.args().to_string());
        let record = interop_log_record_t {
            level: record.level().into(),
            target: target.as_ptr(),
            message: message.as_ptr(),
            line: record.line().unwrap_or(0),
        };
        callback(&record, user_data as *mut c_void);
    }

    fn flush(&self) {}
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn env_level() -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Warn)
}

fn ensure_logger(out_error: *mut *mut interop_error_t) -> bool {
    LOGGER_INIT.call_once(|| {
        let installed = log::set_logger(&*INTEROP_LOGGER).is_ok();
        LOGGER_INSTALLED.store(installed, Ordering::SeqCst);
    });
    if LOGGER_INSTALLED.load(Ordering::SeqCst) {
        true
    } else {
        write_message(out_error, "logging already initialized by another logger");
        false
    }
}

/// Writes default logging configuration values: WARN level, no callback.
#[unsafe(no_mangle)]
pub extern "C" fn interop_log_config_init(config: *mut interop_log_config_t) {
    if config.is_null() {
        return;
    }
    // Safety: caller provided a writable config pointer.
    unsafe {
        *config = interop_log_config_t {
            level: interop_log_level_t::INTEROP_LOG_LEVEL_WARN,
            callback: None,
            user_data: ptr::null_mut(),
        };
    }
}

/// Installs the fixture logger, or reconfigures it when already installed.
///
/// With a null `config`, the level comes from `INTEROP_LOG` and records go to stderr.
#[unsafe(no_mangle)]
pub extern "C" fn interop_log_init(
    config: *const interop_log_config_t,
    out_error: *mut *mut interop_error_t,
) -> bool {
    clear_error(out_error);
    if !ensure_logger(out_error) {
        return false;
    }

    // Safety: caller provides either null or a valid config pointer.
    let config = unsafe { config.as_ref() };
    let logger_config = match config {
        Some(config) => LoggerConfig {
            level: config.level.into(),
            callback: config.callback,
            user_data: config.user_data as usize,
        },
        None => LoggerConfig {
            level: env_level(),
            callback: None,
            user_data: 0,
        },
    };
    let level = logger_config.level;
    INTEROP_LOGGER.update(logger_config);
    log::set_max_level(level);
    log::debug!("fixture logging configured at {level}");
    true
}
