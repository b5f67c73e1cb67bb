// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SDK logging initialization.
//!
//! The SDK itself only emits `tracing` events; installing a subscriber is
//! the embedding application's choice. [`init_logging`] is a convenience
//! for applications that have not set one up.

use std::io;

use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Configuration for logging initialization.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level if `RUST_LOG` is not set.
    pub default_level: Level,

    /// Whether to include the target module path.
    pub include_target: bool,

    /// Whether to use ANSI colors in output.
    pub ansi_colors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_target: true,
            ansi_colors: true,
        }
    }
}

impl LoggingConfig {
    /// Verbose config used when the SDK debug flag is set.
    pub fn debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            ..Default::default()
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }
}

/// Initialize a compact `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured default level. Call once
/// at application startup; a second call reports the underlying
/// subscriber-already-set error.
pub fn init_logging(config: &LoggingConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}", config.default_level)));

    let fmt_layer = fmt::layer()
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.ansi_colors);
    }

    #[test]
    fn test_logging_config_debug() {
        let config = LoggingConfig::debug();
        assert_eq!(config.default_level, Level::DEBUG);
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default().with_level(Level::WARN);
        assert_eq!(config.default_level, Level::WARN);
    }
}
