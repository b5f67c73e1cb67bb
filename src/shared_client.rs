// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared HTTP client for connection pooling.
//!
//! The SDK makes three kinds of HTTP calls (instrumented sends, trace
//! uploads, backend lookups); routing them through one pooled client avoids
//! repeated TLS handshakes when calls run concurrently.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default request timeout in seconds (generous for slow LLM responses).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Shared pooled HTTP client used by every SDK component by default.
pub static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_client_clones_cheaply() {
        // reqwest::Client is an Arc internally; cloning must not rebuild the pool
        let a = SHARED_CLIENT.clone();
        let b = SHARED_CLIENT.clone();
        drop((a, b));
    }
}
