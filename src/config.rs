//! Runtime configuration from environment variables

use std::env;

/// Configuration for the chainboard runtime.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite event database (read-only)
    pub db_path: String,

    /// Buffer size for per-client gateway channels (frames)
    pub channel_buffer: usize,

    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,

    /// Query timeout in milliseconds
    pub query_timeout_ms: u64,

    /// Source used when a query names none
    pub default_source: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CHAINBOARD_DB_PATH` (default: /var/lib/chainboard/events.db)
    /// - `GATEWAY_CHANNEL_BUFFER` (default: 64)
    /// - `HEARTBEAT_INTERVAL_SECS` (default: 30)
    /// - `QUERY_TIMEOUT_MS` (default: 10000)
    /// - `CHAINBOARD_DEFAULT_SOURCE` (default: starknet)
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("CHAINBOARD_DB_PATH")
                .unwrap_or_else(|_| "/var/lib/chainboard/events.db".to_string()),

            channel_buffer: env::var("GATEWAY_CHANNEL_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64),

            heartbeat_interval_secs: env::var("HEARTBEAT_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            query_timeout_ms: env::var("QUERY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),

            default_source: env::var("CHAINBOARD_DEFAULT_SOURCE")
                .unwrap_or_else(|_| "starknet".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        env::remove_var("CHAINBOARD_DB_PATH");
        env::remove_var("GATEWAY_CHANNEL_BUFFER");
        env::remove_var("HEARTBEAT_INTERVAL_SECS");
        env::remove_var("QUERY_TIMEOUT_MS");
        env::remove_var("CHAINBOARD_DEFAULT_SOURCE");

        let config = Config::from_env();

        assert_eq!(config.db_path, "/var/lib/chainboard/events.db");
        assert_eq!(config.channel_buffer, 64);
        assert_eq!(config.heartbeat_interval_secs, 30);
        assert_eq!(config.query_timeout_ms, 10_000);
        assert_eq!(config.default_source, "starknet");
    }

    #[test]
    fn test_custom_config() {
        env::set_var("CHAINBOARD_DB_PATH", "/tmp/events.db");
        env::set_var("HEARTBEAT_INTERVAL_SECS", "5");
        env::set_var("CHAINBOARD_DEFAULT_SOURCE", "ethereum");

        let config = Config::from_env();

        assert_eq!(config.db_path, "/tmp/events.db");
        assert_eq!(config.heartbeat_interval_secs, 5);
        assert_eq!(config.default_source, "ethereum");

        env::remove_var("CHAINBOARD_DB_PATH");
        env::remove_var("HEARTBEAT_INTERVAL_SECS");
        env::remove_var("CHAINBOARD_DEFAULT_SOURCE");
    }
}
