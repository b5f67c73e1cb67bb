// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SDK configuration.
//!
//! Configuration is an explicit, shared object rather than hidden global
//! state: [`SharedConfig`] is cloned into every component at construction
//! time. The expected discipline is single-writer-at-init - the embedding
//! application calls [`SharedConfig::configure`] (possibly several times)
//! during startup, and every component only reads snapshots afterwards.
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `PROMPTTRACE_BASE_URL` | Telemetry backend base URL |
//! | `PROMPTTRACE_API_KEY` | Static API key sent with every upload |
//! | `PROMPTTRACE_DEBUG` | Set to `1` or `true` for debug logging |

use std::sync::{Arc, RwLock};

/// Environment variable for the backend base URL.
pub const ENV_BASE_URL: &str = "PROMPTTRACE_BASE_URL";

/// Environment variable for the API key.
pub const ENV_API_KEY: &str = "PROMPTTRACE_API_KEY";

/// Environment variable for the debug flag.
pub const ENV_DEBUG: &str = "PROMPTTRACE_DEBUG";

/// Default telemetry backend base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.prompttrace.dev";

/// Default host whose outbound calls are traced.
pub const DEFAULT_TARGET_HOST: &str = "api.openai.com";

/// Process-wide SDK settings.
///
/// If `api_key` is absent, every upload operation is a logged-warning no-op
/// rather than an error - instrumentation must never fail the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    /// Telemetry backend base URL (no trailing slash required).
    pub base_url: String,

    /// Static API key attached as the `apiKey` header.
    pub api_key: Option<String>,

    /// Enable verbose SDK logging.
    pub debug: bool,

    /// Host whose outbound calls are traced; all other hosts pass through.
    pub target_host: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            debug: false,
            target_host: DEFAULT_TARGET_HOST.to_string(),
        }
    }
}

impl TraceConfig {
    /// Build a config with defaults sourced from the environment.
    pub fn from_env() -> Self {
        let debug = std::env::var(ENV_DEBUG)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            base_url: std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var(ENV_API_KEY).ok(),
            debug,
            target_host: DEFAULT_TARGET_HOST.to_string(),
        }
    }

    /// Base URL with any trailing slash removed, ready for path joining.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Partial override of [`TraceConfig`].
///
/// Only the fields supplied are applied; unspecified fields retain their
/// prior value. Applying several updates merges them, last write winning
/// per field.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub debug: Option<bool>,
    pub target_host: Option<String>,
}

impl ConfigUpdate {
    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Enable or disable debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set the traced target host.
    pub fn target_host(mut self, host: impl Into<String>) -> Self {
        self.target_host = Some(host.into());
        self
    }
}

/// Shared handle to the SDK configuration.
///
/// Cheap to clone; every component holds one. Reads go through
/// [`snapshot`](Self::snapshot) so a component never observes a partially
/// applied update. Writes are expected only at startup (single-writer-at-init
/// convention); after that the config is effectively read-only.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<TraceConfig>>,
}

impl SharedConfig {
    /// Wrap an explicit config.
    pub fn new(config: TraceConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Build from environment-sourced defaults.
    pub fn from_env() -> Self {
        Self::new(TraceConfig::from_env())
    }

    /// Apply a partial override. Unspecified fields keep their prior value;
    /// subsequent reads observe the update immediately.
    pub fn configure(&self, update: ConfigUpdate) {
        let mut config = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(base_url) = update.base_url {
            config.base_url = base_url;
        }
        if let Some(api_key) = update.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(debug) = update.debug {
            config.debug = debug;
        }
        if let Some(target_host) = update.target_host {
            config.target_host = target_host;
        }
    }

    /// Take an owned copy of the current settings.
    pub fn snapshot(&self) -> TraceConfig {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether an API key is currently configured.
    pub fn has_api_key(&self) -> bool {
        self.snapshot().api_key.is_some()
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
