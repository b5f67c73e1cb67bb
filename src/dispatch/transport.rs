// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Batch delivery transport.
//!
//! [`BatchTransport`] is the seam between the dispatcher's scheduling logic
//! and the wire: production code uses [`HttpBatchTransport`], tests swap in
//! recording or failing transports.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::SharedConfig;
use crate::error::UploadError;
use crate::shared_client::SHARED_CLIENT;
use crate::trace::UploadBatch;

/// Path of the backend's batch-upload endpoint.
pub const UPLOAD_BATCH_PATH: &str = "/api/tracer/upload_batch";

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "apiKey";

/// Delivers one serialized [`UploadBatch`] to the telemetry backend.
#[async_trait]
pub trait BatchTransport: Send + Sync {
    /// Attempt a single delivery. No retries at this layer.
    async fn post_batch(&self, batch: &UploadBatch) -> Result<(), UploadError>;
}

/// Production transport: a single HTTP POST per batch.
pub struct HttpBatchTransport {
    client: reqwest::Client,
    config: SharedConfig,
}

impl HttpBatchTransport {
    /// Create a transport using the shared pooled client.
    pub fn new(config: SharedConfig) -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
            config,
        }
    }

    /// Create a transport with an explicit client (custom timeouts, proxies).
    pub fn with_client(client: reqwest::Client, config: SharedConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl BatchTransport for HttpBatchTransport {
    async fn post_batch(&self, batch: &UploadBatch) -> Result<(), UploadError> {
        let config = self.config.snapshot();
        let api_key = config.api_key.clone().ok_or(UploadError::MissingApiKey)?;
        let url = format!("{}{}", config.base_url_trimmed(), UPLOAD_BATCH_PATH);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &api_key)
            .json(batch)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        // The backend signals acceptance with 200 exactly
        if response.status() != StatusCode::OK {
            return Err(UploadError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}
