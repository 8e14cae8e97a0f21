// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for solr-kit.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter
//! (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `solr_client_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `handler`: select, update, schema, admin
//! - `status`: success, error

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a request to a Solr handler
pub fn record_request(handler: &str, status: &str) {
    counter!(
        "solr_client_requests_total",
        "handler" => handler.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record request latency
pub fn record_request_latency(handler: &str, duration: Duration) {
    histogram!(
        "solr_client_request_seconds",
        "handler" => handler.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a search query execution
pub fn record_query(status: &str) {
    counter!(
        "solr_client_queries_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record search result count
pub fn record_query_results(count: usize) {
    histogram!("solr_client_query_results").record(count as f64);
}

/// Record a schema API operation (add-field, replace-field, ...)
pub fn record_schema_operation(operation: &str, status: &str) {
    counter!(
        "solr_client_schema_operations_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record documents sent to the update handler
pub fn record_indexed_items(count: usize) {
    counter!("solr_client_indexed_items_total").increment(count as u64);
}

/// Record an indexing batch size
pub fn record_index_batch(count: usize) {
    histogram!("solr_client_index_batch_size").record(count as f64);
}

/// Record documents removed from the index
pub fn record_removed_items(count: usize) {
    counter!("solr_client_removed_items_total").increment(count as u64);
}

/// Record a transport-level error
pub fn record_transport_error(handler: &str) {
    counter!(
        "solr_client_transport_errors_total",
        "handler" => handler.to_string()
    )
    .increment(1);
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    handler: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(handler: &'static str) -> Self {
        Self {
            handler,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_request_latency(self.handler, self.start.elapsed());
    }
}
