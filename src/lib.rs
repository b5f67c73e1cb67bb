// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! prompttrace - client-side tracing for LLM API calls.
//!
//! A lightweight SDK that observes outbound calls to an LLM API host,
//! records each request/response pair with timing, and ships the records to
//! a telemetry backend in the background - off the critical path of the
//! call being observed.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`config`] - Shared SDK configuration with environment defaults
//! - [`error`] - Error types and result aliases
//! - [`trace`] - Trace records and upload batches
//! - [`intercept`] - The `Sender` seam and the tracing wrapper
//! - [`dispatch`] - Fire-and-forget batch delivery to the backend
//! - [`backend`] - Example-override lookup and hallucination check
//! - [`logging`] - Optional `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use prompttrace::{init, ConfigUpdate, HttpRequest};
//!
//! let sdk = init(ConfigUpdate::default().api_key("pt-key"));
//! let sender = sdk.http_sender();
//!
//! // Calls to the target LLM host are traced; everything else passes through
//! let response = sender
//!     .send(HttpRequest::post("https://api.openai.com/v1/completions")?
//!         .header("content-type", "application/json")
//!         .body(r#"{"model":"x","prompt":"hi"}"#))
//!     .await?;
//!
//! // Prompt augmentation from the backend
//! let edits = sdk.backend().get_edits("user question").await?;
//! ```
//!
//! Uploads are fire-and-forget: the instrumented call never waits on them,
//! failures are logged and dropped, and process shutdown may lose in-flight
//! uploads.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod intercept;
pub mod logging;
pub mod sdk;
pub mod shared_client;
pub mod trace;

// Re-export commonly used types at crate root
pub use backend::BackendClient;
pub use config::{ConfigUpdate, SharedConfig, TraceConfig};
pub use dispatch::{BatchTransport, HttpBatchTransport, TraceDispatcher};
pub use error::{BackendError, Result, SendError, UploadError};
pub use intercept::{install, BoxedSender, HttpRequest, HttpResponse, HttpSender, Sender, TracingSender};
pub use logging::{init_logging, LoggingConfig};
pub use sdk::{init, Prompttrace};
pub use trace::{CompletedTrace, FunctionTrace, RequestInfo, ResponseInfo, UploadBatch};

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
