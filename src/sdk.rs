// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SDK entry point: one call wires configuration, dispatcher, and senders.

use std::io;
use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::BackendClient;
use crate::config::{ConfigUpdate, SharedConfig};
use crate::dispatch::{HttpBatchTransport, TraceDispatcher};
use crate::intercept::{install, BoxedSender, HttpSender};
use crate::logging::{self, LoggingConfig};

/// An initialized SDK instance.
///
/// Holds the shared configuration and the upload dispatcher; hand out
/// traced senders with [`wrap`](Self::wrap) or [`http_sender`](Self::http_sender).
pub struct Prompttrace {
    config: SharedConfig,
    dispatcher: Arc<TraceDispatcher>,
}

/// Initialize the SDK.
///
/// Builds the configuration from environment defaults, applies `update` on
/// top, and constructs the upload dispatcher (choosing its runtime backend
/// now, so call this from the context your application will run in). A
/// missing API key is not an error - tracing stays installed but uploads
/// become logged-warning no-ops.
///
/// No global `tracing` subscriber is installed here; call
/// [`Prompttrace::init_logging`] for one that honors the `debug` flag.
///
/// # Example
///
/// ```rust,ignore
/// use prompttrace::{init, ConfigUpdate};
///
/// let sdk = init(ConfigUpdate::default().api_key("pt-key"));
/// let sender = sdk.http_sender();
/// ```
pub fn init(update: ConfigUpdate) -> Prompttrace {
    let config = SharedConfig::from_env();
    config.configure(update);

    let transport = Arc::new(HttpBatchTransport::new(config.clone()));
    let dispatcher = Arc::new(TraceDispatcher::new(config.clone(), transport));

    let snapshot = config.snapshot();
    if snapshot.api_key.is_some() {
        info!(
            base_url = %snapshot.base_url,
            target_host = %snapshot.target_host,
            "prompttrace initialized"
        );
    } else {
        warn!("prompttrace initialized without an API key; uploads are disabled");
    }

    Prompttrace { config, dispatcher }
}

impl Prompttrace {
    /// The shared configuration handle.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The upload dispatcher.
    pub fn dispatcher(&self) -> &Arc<TraceDispatcher> {
        &self.dispatcher
    }

    /// Wrap an arbitrary sender with call tracing (idempotent).
    pub fn wrap(&self, sender: BoxedSender) -> BoxedSender {
        install(sender, self.config.clone(), Arc::clone(&self.dispatcher))
    }

    /// A ready-to-use traced sender over the shared HTTP client.
    pub fn http_sender(&self) -> BoxedSender {
        self.wrap(Box::new(HttpSender::new()))
    }

    /// A client for the backend's lookup endpoints.
    pub fn backend(&self) -> BackendClient {
        BackendClient::new(self.config.clone())
    }

    /// Logging configuration derived from the current `debug` flag.
    ///
    /// Re-reads the shared configuration on every call, so flipping
    /// `debug` via [`SharedConfig::configure`] is reflected here.
    pub fn logging_config(&self) -> LoggingConfig {
        if self.config.snapshot().debug {
            LoggingConfig::debug()
        } else {
            LoggingConfig::default()
        }
    }

    /// Install the SDK's compact `tracing` subscriber, verbose when the
    /// `debug` flag is set. `RUST_LOG` still takes precedence.
    pub fn init_logging(&self) -> io::Result<()> {
        logging::init_logging(&self.logging_config())
    }
}
