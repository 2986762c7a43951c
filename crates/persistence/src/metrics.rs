//! Store metrics collection.
//!
//! Provides functions for recording snapshot store metrics.

use metrics::{counter, histogram};
use std::time::Instant;

/// Record how long a snapshot operation took.
pub fn record_operation_duration(operation: &'static str, key: &str, duration_secs: f64) {
    histogram!(
        "store_operation_duration_seconds",
        "operation" => operation,
        "key" => key.to_string()
    )
    .record(duration_secs);
}

/// Count a whole-snapshot write.
pub fn record_write(key: &str, bytes: usize) {
    counter!("store_writes_total", "key" => key.to_string()).increment(1);
    histogram!("store_snapshot_bytes", "key" => key.to_string()).record(bytes as f64);
}

/// Count a snapshot that failed to parse and was treated as absent.
pub fn record_malformed(key: &str) {
    counter!("store_malformed_snapshots_total", "key" => key.to_string()).increment(1);
}

/// Times one store operation.
///
/// Usage:
/// ```ignore
/// let timer = OperationTimer::new("read", key.as_str());
/// let raw = backend.get(key.as_str()).await;
/// timer.record();
/// ```
pub struct OperationTimer {
    operation: &'static str,
    key: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &'static str, key: impl Into<String>) -> Self {
        Self {
            operation,
            key: key.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_operation_duration(self.operation, &self.key, duration);
    }
}
