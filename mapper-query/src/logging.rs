//! Logging infrastructure for the Prax mapper.
//!
//! Structured logging controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `MAPPER_DEBUG=true` / `MAPPER_DEBUG=1` - Enable debug logging
//! - `MAPPER_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `MAPPER_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use mapper_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Within the mapper, use the standard tracing macros:
//!
//! ```rust,ignore
//! debug!(model = %model, "Planning selectors");
//! trace!(model = %model, field = %name, "Mapping field");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `MAPPER_DEBUG`.
///
/// Returns `true` if `MAPPER_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("MAPPER_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `MAPPER_LOG_LEVEL`.
///
/// Defaults to "debug" if `MAPPER_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };

    match env::var("MAPPER_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `MAPPER_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("MAPPER_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the mapper logging system.
///
/// Subsequent calls are no-ops. Nothing is installed unless `MAPPER_DEBUG`
/// or `MAPPER_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("MAPPER_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "prax_mapper={},mapper_query={},mapper_schema={},mapper_cli={}",
                level, level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Mapper logging initialized"
            );
        }
    });
}

/// Macro for conditional debug logging.
///
/// Only logs if `MAPPER_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! mapper_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional trace logging.
#[macro_export]
macro_rules! mapper_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
