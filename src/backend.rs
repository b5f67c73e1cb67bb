// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request/response calls against the telemetry backend.
//!
//! Unlike trace uploads these calls are made on the caller's behalf and
//! their outcome matters to the caller (prompt construction), so errors are
//! returned rather than logged and dropped. No retries, no caching.

use serde_json::{json, Value};
use tracing::debug;

use crate::config::SharedConfig;
use crate::dispatch::API_KEY_HEADER;
use crate::error::BackendError;
use crate::shared_client::SHARED_CLIENT;

/// Path of the example-override lookup endpoint.
pub const GET_EDITS_PATH: &str = "/api/overrides/get_example_overrides";

/// Path of the hallucination-check endpoint.
pub const IS_HALLUCINATED_PATH: &str = "/api/v1/isHallucinated";

/// Client for the backend's lookup endpoints.
pub struct BackendClient {
    client: reqwest::Client,
    config: SharedConfig,
}

impl BackendClient {
    /// Create a client using the shared pooled HTTP client.
    pub fn new(config: SharedConfig) -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
            config,
        }
    }

    /// Create a client with an explicit HTTP client.
    pub fn with_client(client: reqwest::Client, config: SharedConfig) -> Self {
        Self { client, config }
    }

    /// Fetch example-override edits for `input`.
    ///
    /// Returns the backend's parsed JSON body on success. An absent API key
    /// is the missing-configuration error and performs no network I/O.
    pub async fn get_edits(&self, input: &str) -> Result<Value, BackendError> {
        let (base_url, api_key) = self.endpoint_config()?;
        let url = format!("{}{}", base_url, GET_EDITS_PATH);

        debug!(input_len = input.len(), "fetching example overrides");
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &api_key)
            .json(&json!({ "input": input }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::parse_json(response).await
    }

    /// Ask the backend whether `response` hallucinates relative to `prompt`
    /// and the user's input.
    pub async fn is_hallucinated(
        &self,
        prompt: &str,
        response: &str,
        user_input: &str,
    ) -> Result<Value, BackendError> {
        let (base_url, api_key) = self.endpoint_config()?;
        let url = format!("{}{}", base_url, IS_HALLUCINATED_PATH);

        let http_response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &api_key)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "prompt": prompt,
                "response": response,
                "userInput": user_input,
            }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::parse_json(http_response).await
    }

    fn endpoint_config(&self) -> Result<(String, String), BackendError> {
        let config = self.config.snapshot();
        let api_key = config.api_key.clone().ok_or(BackendError::MissingApiKey)?;
        Ok((config.base_url_trimmed().to_string(), api_key))
    }

    async fn parse_json(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}
