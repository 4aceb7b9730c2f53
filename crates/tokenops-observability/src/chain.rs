use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_chain_rpc_call(chain_id: u64, operation: &str, status: &str, duration: Duration) {
    counter!(
        "tokenops_chain_rpc_total",
        "chain_id" => chain_id.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "tokenops_chain_rpc_duration_seconds",
        "chain_id" => chain_id.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_chain_rpc_retry(chain_id: u64, operation: &str) {
    counter!(
        "tokenops_chain_rpc_retries_total",
        "chain_id" => chain_id.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

pub fn record_transfer_log_scan(
    chain_id: u64,
    status: &str,
    duration: Duration,
    block_span: u64,
    logs: usize,
) {
    counter!(
        "tokenops_transfer_log_scan_total",
        "chain_id" => chain_id.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "tokenops_transfer_log_scan_duration_seconds",
        "chain_id" => chain_id.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
    histogram!(
        "tokenops_transfer_log_scan_blocks",
        "chain_id" => chain_id.to_string(),
        "status" => status.to_string()
    )
    .record(block_span as f64);
    histogram!(
        "tokenops_transfer_log_scan_events",
        "chain_id" => chain_id.to_string(),
        "status" => status.to_string()
    )
    .record(logs as f64);
}
