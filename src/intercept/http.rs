// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Production [`Sender`] backed by `reqwest`.

use async_trait::async_trait;

use crate::error::SendError;
use crate::shared_client::SHARED_CLIENT;

use super::{HttpRequest, HttpResponse, Sender};

/// Sends requests over a pooled `reqwest::Client`.
pub struct HttpSender {
    client: reqwest::Client,
}

impl HttpSender {
    /// Create a sender using the shared pooled client.
    pub fn new() -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
        }
    }

    /// Create a sender with an explicit client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sender for HttpSender {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Buffer the whole body so tracing can read it without consuming
        // anything the caller still needs. An empty body stays Some("") so
        // traced outputs record exactly what came back.
        let body = response
            .text()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status_code,
            headers,
            body: Some(body),
        })
    }
}
