// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interception layer: transparent observation of outbound LLM calls.
//!
//! Instead of patching a shared HTTP client behind the program's back, the
//! SDK puts a seam where the patch would have gone: the minimal [`Sender`]
//! capability. Production code sends through [`HttpSender`]; wrapping it in
//! a [`TracingSender`] (via [`install`]) makes calls to the configured
//! target host produce trace records while every other call passes through
//! untouched. Explicit composition, same observable behavior.
//!
//! ```rust,ignore
//! use prompttrace::intercept::{install, HttpRequest, HttpSender};
//!
//! let sender = install(Box::new(HttpSender::new()), config, dispatcher);
//! let response = sender.send(HttpRequest::post("https://api.openai.com/v1/completions")?).await?;
//! ```

mod http;
mod tracing_sender;

pub use http::HttpSender;
pub use tracing_sender::{TracingSender, DEFAULT_OPERATION_NAME};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};
use tracing::debug;

use crate::config::SharedConfig;
use crate::dispatch::TraceDispatcher;
use crate::error::SendError;
use crate::trace::{RequestInfo, ResponseInfo};

/// An outbound HTTP request as a small owned value.
///
/// Bodies are held in memory so the tracing layer can read them without
/// consuming anything the caller still needs.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request, parsing and validating the URL.
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self, SendError> {
        let url = Url::parse(url.as_ref()).map_err(|e| SendError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            method,
            url,
            headers: BTreeMap::new(),
            body: None,
        })
    }

    /// Shorthand for a GET request.
    pub fn get(url: impl AsRef<str>) -> Result<Self, SendError> {
        Self::new(Method::GET, url)
    }

    /// Shorthand for a POST request.
    pub fn post(url: impl AsRef<str>) -> Result<Self, SendError> {
        Self::new(Method::POST, url)
    }

    /// Attach a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Destination host, if the URL has one.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Capture this request's metadata for a trace record.
    pub fn to_request_info(&self) -> RequestInfo {
        RequestInfo {
            url: self.url.to_string(),
            method: self.method.to_string(),
            headers: self.headers.clone(),
            content: self.body.clone(),
        }
    }
}

/// A fully-buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Capture this response's metadata for a trace record.
    pub fn to_response_info(&self) -> ResponseInfo {
        ResponseInfo {
            status_code: self.status_code,
            headers: self.headers.clone(),
            content: self.body.clone(),
        }
    }
}

/// The minimal send capability the interception layer wraps.
///
/// `is_traced` is the install-once marker: [`install`] refuses to wrap a
/// sender that already reports itself traced, so installing twice yields
/// exactly one wrapping layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sender: Send + Sync {
    /// Perform the outbound call.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError>;

    /// Whether this sender already has a tracing layer.
    fn is_traced(&self) -> bool {
        false
    }
}

/// Owned trait object for composing senders.
pub type BoxedSender = Box<dyn Sender>;

/// Wrap `sender` with call tracing. Idempotent: an already-traced sender is
/// returned unchanged, so repeated installation cannot double-trace.
pub fn install(
    sender: BoxedSender,
    config: SharedConfig,
    dispatcher: Arc<TraceDispatcher>,
) -> BoxedSender {
    if sender.is_traced() {
        debug!("sender already traced; leaving it as-is");
        return sender;
    }
    Box::new(TracingSender::new(sender, config, dispatcher))
}
