// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The tracing wrapper around any [`Sender`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::SharedConfig;
use crate::dispatch::TraceDispatcher;
use crate::error::SendError;
use crate::trace::FunctionTrace;

use super::{BoxedSender, HttpRequest, HttpResponse, Sender};

/// Operation name recorded for intercepted calls.
pub const DEFAULT_OPERATION_NAME: &str = "OpenAI API Call";

/// A [`Sender`] decorator that records calls to the configured target host.
///
/// Matching calls are timed and captured as trace records, which are handed
/// to the dispatcher after the real response is in hand; the response itself
/// is returned unchanged and never waits on the upload. Non-matching calls
/// delegate with zero added behavior, and a failed inner send propagates as
/// such - no trace is recorded for failed calls.
pub struct TracingSender {
    inner: BoxedSender,
    config: SharedConfig,
    dispatcher: Arc<TraceDispatcher>,
    operation_name: String,
}

impl TracingSender {
    /// Wrap `inner` with tracing.
    pub fn new(inner: BoxedSender, config: SharedConfig, dispatcher: Arc<TraceDispatcher>) -> Self {
        Self {
            inner,
            config,
            dispatcher,
            operation_name: DEFAULT_OPERATION_NAME.to_string(),
        }
    }

    /// Override the operation name recorded on trace records.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self
    }

    fn matches_target(&self, request: &HttpRequest) -> bool {
        let target_host = self.config.snapshot().target_host;
        request
            .host()
            .map(|host| host.eq_ignore_ascii_case(&target_host))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Sender for TracingSender {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
        if !self.matches_target(&request) {
            return self.inner.send(request).await;
        }

        let trace = FunctionTrace::begin(self.operation_name.clone(), request.to_request_info());

        // A failed send propagates unchanged; the open trace is dropped
        let response = self.inner.send(request).await?;

        let completed = trace.finish(response.to_response_info());
        debug!(
            function = %completed.function_name,
            duration_seconds = completed.duration_seconds,
            "captured trace record"
        );
        self.dispatcher.schedule_one(completed);

        Ok(response)
    }

    fn is_traced(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigUpdate, TraceConfig};
    use crate::dispatch::{BatchTransport, TraceDispatcher};
    use crate::error::UploadError;
    use crate::intercept::{install, MockSender};
    use crate::trace::UploadBatch;
    use std::collections::BTreeMap;
    use std::time::Duration;

    /// Transport that forwards every delivered batch to the test.
    struct ChannelTransport {
        sent: tokio::sync::mpsc::UnboundedSender<UploadBatch>,
    }

    #[async_trait]
    impl BatchTransport for ChannelTransport {
        async fn post_batch(&self, batch: &UploadBatch) -> Result<(), UploadError> {
            let _ = self.sent.send(batch.clone());
            Ok(())
        }
    }

    fn test_fixture() -> (
        SharedConfig,
        Arc<TraceDispatcher>,
        tokio::sync::mpsc::UnboundedReceiver<UploadBatch>,
    ) {
        let config = SharedConfig::new(TraceConfig::default());
        config.configure(ConfigUpdate::default().api_key("test-key"));
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let dispatcher = Arc::new(TraceDispatcher::new(
            config.clone(),
            Arc::new(ChannelTransport { sent: tx }),
        ));
        (config, dispatcher, rx)
    }

    fn canned_response(body: &str) -> HttpResponse {
        HttpResponse {
            status_code: 200,
            headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: Some(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_matching_call_produces_exactly_one_trace() {
        let (config, dispatcher, mut rx) = test_fixture();

        let mut inner = MockSender::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Ok(canned_response(r#"{"choices":[]}"#)));
        let sender = TracingSender::new(Box::new(inner), config, dispatcher);

        let request = HttpRequest::post("https://api.openai.com/v1/completions")
            .unwrap()
            .body(r#"{"model":"x","prompt":"hi"}"#);
        let response = sender.send(request).await.unwrap();

        // The real response comes back unchanged
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.as_deref(), Some(r#"{"choices":[]}"#));

        let batch = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("trace delivery timed out")
            .expect("channel closed");
        assert_eq!(batch.record_count(), 1);

        let record = &batch.traces[0].function_calls[0];
        assert_eq!(record.function_name, DEFAULT_OPERATION_NAME);
        assert_eq!(
            record.function_inputs.content.as_deref(),
            Some(r#"{"model":"x","prompt":"hi"}"#)
        );
        assert_eq!(
            record.function_outputs.content.as_deref(),
            Some(r#"{"choices":[]}"#)
        );
        assert_eq!(record.function_outputs.status_code, 200);
        assert!(record.duration_seconds >= 0.0);
    }

    #[tokio::test]
    async fn test_non_matching_call_passes_through_untraced() {
        let (config, dispatcher, mut rx) = test_fixture();

        let mut inner = MockSender::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Ok(canned_response("other")));
        let sender = TracingSender::new(Box::new(inner), config, dispatcher);

        let request = HttpRequest::get("https://example.com/healthz").unwrap();
        let response = sender.send(request).await.unwrap();

        assert_eq!(response.body.as_deref(), Some("other"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err(), "no trace may be constructed");
    }

    #[tokio::test]
    async fn test_failed_send_propagates_and_records_nothing() {
        let (config, dispatcher, mut rx) = test_fixture();

        let mut inner = MockSender::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Err(SendError::Network("connection refused".to_string())));
        let sender = TracingSender::new(Box::new(inner), config, dispatcher);

        let request = HttpRequest::post("https://api.openai.com/v1/completions").unwrap();
        let err = sender.send(request).await.unwrap_err();

        assert!(matches!(err, SendError::Network(_)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_install_is_idempotent() {
        let (config, dispatcher, mut rx) = test_fixture();

        let mut inner = MockSender::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Ok(canned_response(r#"{"choices":[]}"#)));
        inner.expect_is_traced().return_const(false);

        let once = install(Box::new(inner), config.clone(), Arc::clone(&dispatcher));
        // Installing again must not add a second wrapping layer
        let twice = install(once, config, dispatcher);
        assert!(twice.is_traced());

        let request = HttpRequest::post("https://api.openai.com/v1/completions")
            .unwrap()
            .body("{}");
        twice.send(request).await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("trace delivery timed out")
            .expect("channel closed");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err(), "a single call produced two traces");
    }

    #[tokio::test]
    async fn test_custom_target_host() {
        let (config, dispatcher, mut rx) = test_fixture();
        config.configure(ConfigUpdate::default().target_host("llm.internal"));

        let mut inner = MockSender::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Ok(canned_response("ok")));
        let sender = TracingSender::new(Box::new(inner), config, dispatcher);

        let request = HttpRequest::post("https://llm.internal/v1/chat").unwrap();
        sender.send(request).await.unwrap();

        let batch = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("trace delivery timed out")
            .expect("channel closed");
        assert_eq!(batch.record_count(), 1);
    }
}
