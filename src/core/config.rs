//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::{ChannelConfig, TransportConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Message channel tuning shared by every transport.
    pub channel: ChannelConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "sample-tools-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            channel: ChannelConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = parse_flag(&timestamps).unwrap_or(true);
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(max) = std::env::var("MCP_MAX_IO_ERRORS") {
            match max.parse() {
                Ok(max) => config.channel.max_consecutive_io_errors = max,
                Err(_) => warn!("Ignoring invalid MCP_MAX_IO_ERRORS value: {}", max),
            }
        }

        if let Ok(max) = std::env::var("MCP_MAX_FRAME_BYTES") {
            match max.parse() {
                Ok(max) => config.channel.max_frame_bytes = max,
                Err(_) => warn!("Ignoring invalid MCP_MAX_FRAME_BYTES value: {}", max),
            }
        }

        config
    }

    /// Check values that would make the server unusable.
    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(Error::config("server name must not be empty"));
        }
        if self.channel.max_consecutive_io_errors == 0 {
            return Err(Error::config(
                "max_consecutive_io_errors must be at least 1",
            ));
        }
        if self.channel.max_frame_bytes == 0 {
            return Err(Error::config("max_frame_bytes must be at least 1"));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "sample-tools-mcp");
        assert_eq!(config.logging.level, "info");
        #[cfg(feature = "stdio")]
        assert!(config.transport.is_stdio());
        assert_eq!(config.channel.max_consecutive_io_errors, 16);
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "custom-name");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "custom-name");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }

    #[test]
    fn test_log_settings_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "false");
        }
        let config = Config::from_env();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.with_timestamps);
        unsafe {
            std::env::remove_var("MCP_LOG_LEVEL");
            std::env::remove_var("MCP_LOG_TIMESTAMPS");
        }
    }

    #[test]
    fn test_max_io_errors_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_MAX_IO_ERRORS", "3");
        }
        assert_eq!(Config::from_env().channel.max_consecutive_io_errors, 3);

        unsafe {
            std::env::set_var("MCP_MAX_IO_ERRORS", "lots");
        }
        assert_eq!(Config::from_env().channel.max_consecutive_io_errors, 16);
        unsafe {
            std::env::remove_var("MCP_MAX_IO_ERRORS");
        }
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.server.name = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.channel.max_consecutive_io_errors = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.channel.max_frame_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_frame_bytes_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_MAX_FRAME_BYTES", "65536");
        }
        assert_eq!(Config::from_env().channel.max_frame_bytes, 65536);
        unsafe {
            std::env::remove_var("MCP_MAX_FRAME_BYTES");
        }
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
