//! Environment variable names used by this crate for configuring the
//! interceptor logger of a service.
//!
//! These are purely helpers; the logger types themselves never read the
//! environment.

/// Logger format name, see [`parse_format`](crate::backend::parse_format).
pub const LOG_FORMAT_ENV: &str = "INTERCEPTOR_LOG_FORMAT";

/// Set to `1`/`true` to prepend a timestamp to every line.
pub const LOG_TIMESTAMP_ENV: &str = "INTERCEPTOR_LOG_TIMESTAMP";

/// Minimum level printed by [`init_tracing`](crate::init::init_tracing).
pub const LOG_LEVEL_ENV: &str = "INTERCEPTOR_LOG_LEVEL";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag; `1`, `true`, `yes` and `on` count as set.
pub fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
