use std::time::Duration;

use metrics::{counter, histogram};

pub(crate) fn record_repository_query(
    repository: &str,
    method: &str,
    status: &str,
    duration: Duration,
    rows: Option<usize>,
) {
    counter!(
        "tokenops_repository_query_total",
        "repository" => repository.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "tokenops_repository_query_duration_seconds",
        "repository" => repository.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    if let Some(rows) = rows {
        histogram!(
            "tokenops_repository_query_rows",
            "repository" => repository.to_string(),
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .record(rows as f64);
    }
}

/// Records a query outcome, counting rows via `rows` on success.
pub(crate) fn observe<T, E>(
    repository: &str,
    method: &str,
    started: std::time::Instant,
    result: &Result<T, E>,
    rows: impl FnOnce(&T) -> usize,
) {
    match result {
        Ok(value) => record_repository_query(
            repository,
            method,
            "ok",
            started.elapsed(),
            Some(rows(value)),
        ),
        Err(_) => record_repository_query(repository, method, "error", started.elapsed(), None),
    }
}
