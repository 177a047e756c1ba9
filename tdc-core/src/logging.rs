//! Logging bootstrap for OpenTDC store services.
//!
//! The store crates only emit `tracing` events. A host application that has
//! no subscriber of its own can install one here, controlled by environment
//! variables:
//!
//! - `TDC_DEBUG=true` / `TDC_DEBUG=1` - Enable debug logging
//! - `TDC_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `TDC_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! ```rust,no_run
//! use tdc_core::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Within the store crates, use the standard tracing macros:
//!
//! ```rust,ignore
//! debug!(collection = %name, offset, limit, count, "list");
//! info!(host = %host, port, "connected");
//! warn!(path = %path.display(), "file does not exist");
//! error!(error = %e, "insert failed");
//! ```

use std::env;
use std::sync::Once;

use tracing::debug;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `TDC_DEBUG`.
///
/// Returns `true` if `TDC_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("TDC_DEBUG")
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Get the configured log level from `TDC_LOG_LEVEL`.
///
/// Defaults to "debug" if `TDC_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("TDC_LOG_LEVEL") {
        Ok(level) => normalize_level(&level).unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn normalize_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Get the configured log format from `TDC_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("TDC_LOG_FORMAT")
        .map(|f| normalize_format(&f))
        .unwrap_or("json")
}

fn normalize_format(format: &str) -> &'static str {
    match format.to_lowercase().as_str() {
        "pretty" => "pretty",
        "compact" => "compact",
        _ => "json",
    }
}

/// Initialize the logging system.
///
/// Call once at application startup; subsequent calls are no-ops. Nothing is
/// installed unless `TDC_DEBUG` or `TDC_LOG_LEVEL` is set, or when the crate
/// is built without the `tracing-subscriber` feature.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("TDC_LOG_LEVEL").is_err() {
            debug!("TDC_DEBUG and TDC_LOG_LEVEL unset, no subscriber installed");
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "opentdc_store={level},tdc_core={level},tdc_mongo={level},tdc_file={level}"
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
                "OpenTDC store logging initialized"
            );
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        debug!("built without the tracing-subscriber feature, no subscriber installed");
    });
}
