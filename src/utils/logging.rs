//! Logging macros gated by a module-level `ENABLE_LOGS` switch.
//!
//! The sleep pipeline runs once per day in a range, so its per-night
//! diagnostics are noisy. Each module that uses these macros declares:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_debug, log_warn};
//! ```
//! and the macros forward to the `log` facade only when the switch is on.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
