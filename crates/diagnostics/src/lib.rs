// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging facade shared by the filefinder crates
//!
//! Every crate logs through the macros exported here so that a single
//! environment variable controls what reaches the terminal:
//!
//! - `FILEFINDER_LOG=off` (default) - no logs
//! - `FILEFINDER_LOG=warn` - policy warnings (unparsable paths, empty results)
//! - `FILEFINDER_LOG=info` - one line per discovery call
//! - `FILEFINDER_LOG=debug` - every stage of a discovery call

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable read by [`init_diagnostics`]
pub const LOG_ENV: &str = "FILEFINDER_LOG";

static INIT: Once = Once::new();

/// Outcome of interpreting a `FILEFINDER_LOG` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSetting {
    Off,
    Level(emit::Level),
    /// Unrecognised value; treated as `info`
    Unknown,
}

impl LogSetting {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "off" => LogSetting::Off,
            "debug" => LogSetting::Level(emit::Level::Debug),
            "info" => LogSetting::Level(emit::Level::Info),
            "warn" => LogSetting::Level(emit::Level::Warn),
            "error" => LogSetting::Level(emit::Level::Error),
            _ => LogSetting::Unknown,
        }
    }
}

/// Initialize diagnostics based on the `FILEFINDER_LOG` environment variable
///
/// Call once at application startup. Later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let level = match LogSetting::parse(&raw) {
            LogSetting::Off => return,
            LogSetting::Level(level) => level,
            LogSetting::Unknown => {
                // Bootstrap notice: the emitter is not running yet
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("Warning: Unknown {} value '{}', using 'info'", LOG_ENV, raw);
                }
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime must outlive every caller; there is no shutdown hook.
        std::mem::forget(rt);
    });
}

/// Log detailed diagnostics (patterns expanded, per-pattern path counts, etc.)
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log basic operations a user might want to see in normal usage
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log conditions that are tolerated by policy but should be noted
///
/// Examples: "Could not parse path", "Found no files matching criteria"
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that abort an operation
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
