// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Upload dispatcher: fire-and-forget delivery of completed traces.
//!
//! [`TraceDispatcher::schedule`] serializes completed traces into a
//! timestamped [`UploadBatch`] and hands delivery off to a runtime backend,
//! returning to the caller before any network I/O happens. The backend is
//! chosen once, at construction:
//!
//! - **Spawner** - when the dispatcher is built inside a Tokio runtime,
//!   deliveries are spawned as tasks on that runtime, bounded by a
//!   semaphore of in-flight permits.
//! - **Worker** - when no runtime is available, a dedicated thread drives a
//!   current-thread runtime, fed by a bounded queue.
//!
//! Either way the bound is enforced by dropping (with a warning) rather
//! than blocking, and delivery failures are logged and dropped - nothing in
//! this module can fail or delay the instrumented call that produced the
//! trace. Process shutdown may drop in-flight uploads; there is no
//! cancellation handle.

mod transport;

pub use transport::{BatchTransport, HttpBatchTransport, API_KEY_HEADER, UPLOAD_BATCH_PATH};

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::config::SharedConfig;
use crate::error::UploadError;
use crate::trace::{CompletedTrace, UploadBatch};

/// Default bound on queued/in-flight deliveries.
pub const DEFAULT_CAPACITY: usize = 32;

/// Schedules trace batches for background delivery.
pub struct TraceDispatcher {
    config: SharedConfig,
    transport: Arc<dyn BatchTransport>,
    backend: RuntimeBackend,
}

/// Delivery backend, selected once at dispatcher construction.
enum RuntimeBackend {
    /// Spawn deliveries on the ambient Tokio runtime.
    Spawner {
        handle: Handle,
        in_flight: Arc<Semaphore>,
    },
    /// Feed deliveries to a dedicated worker thread.
    Worker { queue: SyncSender<UploadBatch> },
}

impl TraceDispatcher {
    /// Create a dispatcher with the default capacity.
    pub fn new(config: SharedConfig, transport: Arc<dyn BatchTransport>) -> Self {
        Self::with_capacity(config, transport, DEFAULT_CAPACITY)
    }

    /// Create a dispatcher bounding queued/in-flight deliveries to `capacity`.
    pub fn with_capacity(
        config: SharedConfig,
        transport: Arc<dyn BatchTransport>,
        capacity: usize,
    ) -> Self {
        let backend = match Handle::try_current() {
            Ok(handle) => {
                debug!("upload dispatcher using ambient Tokio runtime");
                RuntimeBackend::Spawner {
                    handle,
                    in_flight: Arc::new(Semaphore::new(capacity)),
                }
            }
            Err(_) => {
                debug!("no Tokio runtime available; starting dedicated upload worker");
                RuntimeBackend::Worker {
                    queue: spawn_worker(Arc::clone(&transport), capacity),
                }
            }
        };

        Self {
            config,
            transport,
            backend,
        }
    }

    /// Schedule `records` for delivery and return immediately.
    ///
    /// With no API key configured this logs a warning and performs zero
    /// network calls. When the capacity bound is hit the batch is dropped
    /// with a warning; scheduling never blocks the caller.
    pub fn schedule(&self, records: Vec<CompletedTrace>) {
        if records.is_empty() {
            return;
        }

        let config = self.config.snapshot();
        if config.api_key.is_none() {
            warn!(
                records = records.len(),
                "API key is not configured; dropping trace records"
            );
            return;
        }

        let batch = UploadBatch::new(records);
        match &self.backend {
            RuntimeBackend::Spawner { handle, in_flight } => {
                let permit = match Arc::clone(in_flight).try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("upload capacity exhausted; dropping trace batch");
                        return;
                    }
                };
                let transport = Arc::clone(&self.transport);
                handle.spawn(async move {
                    let _permit = permit;
                    deliver(transport.as_ref(), batch).await;
                });
            }
            RuntimeBackend::Worker { queue } => match queue.try_send(batch) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!("upload queue full; dropping trace batch");
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!("upload worker stopped; dropping trace batch");
                }
            },
        }
    }

    /// Convenience for the single-record case.
    pub fn schedule_one(&self, record: CompletedTrace) {
        self.schedule(vec![record]);
    }
}

/// Run one delivery attempt, logging the outcome. Never returns an error.
async fn deliver(transport: &dyn BatchTransport, batch: UploadBatch) {
    let records = batch.record_count();
    match transport.post_batch(&batch).await {
        Ok(()) => debug!(records, "trace batch uploaded"),
        Err(UploadError::Status { status }) => {
            error!(status, records, "trace upload rejected by backend");
        }
        Err(err) => error!(error = %err, records, "trace upload failed"),
    }
}

/// Start the dedicated upload worker and return its bounded input queue.
fn spawn_worker(transport: Arc<dyn BatchTransport>, capacity: usize) -> SyncSender<UploadBatch> {
    let (tx, rx) = mpsc::sync_channel::<UploadBatch>(capacity);

    std::thread::Builder::new()
        .name("prompttrace-upload".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "failed to build upload runtime; uploads disabled");
                    return;
                }
            };

            // The loop ends when every queue sender has been dropped
            while let Ok(batch) = rx.recv() {
                runtime.block_on(deliver(transport.as_ref(), batch));
            }
        })
        .expect("failed to spawn upload worker thread");

    tx
}
