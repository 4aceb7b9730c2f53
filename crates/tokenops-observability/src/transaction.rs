use std::time::Duration;

use metrics::{counter, histogram};

/// Outcome of a write request: `submitted`, `rejected` (simulation) or
/// `submission_failed`.
pub fn record_write_outcome(function: &str, outcome: &str, duration: Duration) {
    counter!(
        "tokenops_write_total",
        "function" => function.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!(
        "tokenops_write_duration_seconds",
        "function" => function.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Terminal status written by a confirmation monitor.
pub fn record_confirmation(status: &str, duration: Duration) {
    counter!(
        "tokenops_confirmation_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "tokenops_confirmation_wait_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_deployment(status: &str, duration: Duration) {
    counter!(
        "tokenops_deployment_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "tokenops_deployment_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}
