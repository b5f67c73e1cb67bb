// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Trace records: one instrumented call's request, response, and timing.
//!
//! A [`FunctionTrace`] is created the moment an intercepted call begins and
//! consumed by [`FunctionTrace::finish`] when the call returns, yielding an
//! immutable [`CompletedTrace`]. The consuming signature makes
//! complete-exactly-once a type-level property rather than a runtime check.
//!
//! Completed traces serialize into the backend's wire shape:
//!
//! ```json
//! {
//!   "function_name": "OpenAI API Call",
//!   "start_time": "2026-01-01T00:00:00Z",
//!   "end_time": "2026-01-01T00:00:01Z",
//!   "duration_seconds": 1.0,
//!   "function_inputs": { "url": "...", "method": "POST", "headers": {}, "content": "..." },
//!   "function_outputs": { "status_code": 200, "headers": {}, "content": "..." }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Captured request metadata for one instrumented call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub content: Option<String>,
}

/// Captured response metadata for one instrumented call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub content: Option<String>,
}

/// An open trace: the instrumented call has started but not yet returned.
///
/// Owned exclusively by the interception layer between `begin` and `finish`.
#[derive(Debug)]
pub struct FunctionTrace {
    function_name: String,
    start_time: DateTime<Utc>,
    function_inputs: RequestInfo,
}

impl FunctionTrace {
    /// Start a trace, stamping the wall-clock start time.
    pub fn begin(function_name: impl Into<String>, function_inputs: RequestInfo) -> Self {
        Self {
            function_name: function_name.into(),
            start_time: Utc::now(),
            function_inputs,
        }
    }

    /// The operation name this trace was opened with.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Close the trace with the call's outputs.
    ///
    /// Consumes the open trace, so a trace can be completed exactly once.
    /// The duration clamps to zero if the clock stepped backwards.
    pub fn finish(self, function_outputs: ResponseInfo) -> CompletedTrace {
        let end_time = Utc::now();
        let duration_seconds = (end_time - self.start_time)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        CompletedTrace {
            function_name: self.function_name,
            start_time: self.start_time,
            end_time,
            duration_seconds,
            function_inputs: self.function_inputs,
            function_outputs,
        }
    }
}

/// A closed, immutable trace record ready for upload.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedTrace {
    pub function_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub function_inputs: RequestInfo,
    pub function_outputs: ResponseInfo,
}

/// One delivery's payload: a timestamped group of completed traces.
///
/// Constructed fresh per delivery attempt and not persisted if the delivery
/// fails.
#[derive(Debug, Clone, Serialize)]
pub struct UploadBatch {
    pub traces: Vec<TraceGroup>,
}

/// A group of trace records stamped with the batch construction time.
#[derive(Debug, Clone, Serialize)]
pub struct TraceGroup {
    pub function_calls: Vec<CompletedTrace>,
    pub timestamp: DateTime<Utc>,
}

impl UploadBatch {
    /// Build a batch around `records`, stamped with the current time.
    pub fn new(records: Vec<CompletedTrace>) -> Self {
        Self {
            traces: vec![TraceGroup {
                function_calls: records,
                timestamp: Utc::now(),
            }],
        }
    }

    /// Total number of trace records across all groups.
    pub fn record_count(&self) -> usize {
        self.traces.iter().map(|g| g.function_calls.len()).sum()
    }
}
