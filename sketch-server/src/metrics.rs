//! Prometheus metrics for the history server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// Metric names as constants for consistency
const HISTORY_SAVES_TOTAL: &str = "sketch_history_saves_total";
const HISTORY_FETCHES_TOTAL: &str = "sketch_history_fetches_total";
const VALIDATION_FAILURES_TOTAL: &str = "sketch_validation_failures_total";
const ARTIFACT_BYTES: &str = "sketch_artifact_bytes";

/// Outcome label values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Request served.
    Success,
    /// Rejected by validation.
    Invalid,
    /// Store failure.
    Error,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Invalid => "invalid",
            Self::Error => "error",
        }
    }
}

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a save request.
pub fn record_save(outcome: Outcome) {
    counter!(HISTORY_SAVES_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Record a fetch request.
pub fn record_fetch(outcome: Outcome) {
    counter!(HISTORY_FETCHES_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Record an input validation failure.
///
/// # Arguments
///
/// * `validation_type` - Field that failed validation (`owner_id`, `image`, `body`)
pub fn record_validation_failure(validation_type: &'static str) {
    counter!(VALIDATION_FAILURES_TOTAL, "type" => validation_type).increment(1);
}

/// Record the size of a stored artifact.
#[allow(clippy::cast_precision_loss)]
pub fn record_artifact_bytes(len: usize) {
    histogram!(ARTIFACT_BYTES).record(len as f64);
}
