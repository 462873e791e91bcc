//! Logger setup plus per-module switchable logging macros.
//!
//! Chatty modules (the capture ticker, the simulated backend) declare
//! `const ENABLE_LOGS: bool` and log through the macros below, so their
//! output can be silenced without touching the global filter:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn};
//!
//! log_info!("recording {} started", id);
//! ```

use log::LevelFilter;

/// Installs `env_logger`. `RUST_LOG` wins; otherwise `Info`, or `Debug` when
/// `debug` is set.
pub fn init(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Err(err) = builder.try_init() {
        eprintln!("logger already initialised: {err}");
    }
}

/// `log::info!` gated on the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// `log::warn!` gated on the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// `log::error!` gated on the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
