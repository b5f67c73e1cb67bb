// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Benchmarks for trace record construction and batch serialization.
//!
//! Run with: `cargo bench --bench trace`

use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use prompttrace::{FunctionTrace, RequestInfo, ResponseInfo, UploadBatch};

fn sample_request() -> RequestInfo {
    RequestInfo {
        url: "https://api.openai.com/v1/completions".to_string(),
        method: "POST".to_string(),
        headers: BTreeMap::from([
            ("content-type".to_string(), "application/json".to_string()),
            ("authorization".to_string(), "Bearer sk-test".to_string()),
        ]),
        content: Some(r#"{"model":"gpt-4o","prompt":"Say this is a test","max_tokens":7}"#.to_string()),
    }
}

fn sample_response() -> ResponseInfo {
    ResponseInfo {
        status_code: 200,
        headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
        content: Some(r#"{"choices":[{"text":"This is a test"}]}"#.to_string()),
    }
}

/// Benchmark opening and closing a trace record.
fn bench_trace_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_lifecycle");
    group.throughput(Throughput::Elements(1));

    group.bench_function("begin_finish", |b| {
        b.iter(|| {
            let trace = FunctionTrace::begin(black_box("OpenAI API Call"), sample_request());
            black_box(trace.finish(sample_response()))
        });
    });

    group.finish();
}

/// Benchmark serializing an upload batch to the wire format.
fn bench_batch_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_serialization");

    for records in [1usize, 16, 64] {
        let batch = UploadBatch::new(
            (0..records)
                .map(|_| {
                    FunctionTrace::begin("OpenAI API Call", sample_request())
                        .finish(sample_response())
                })
                .collect(),
        );

        group.throughput(Throughput::Elements(records as u64));
        group.bench_function(format!("serialize_{}_records", records), |b| {
            b.iter(|| serde_json::to_string(black_box(&batch)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_trace_lifecycle, bench_batch_serialization);
criterion_main!(benches);
