use std::time::Duration;

use tokio::task::JoinHandle;

/// Covers in-flight requests; a deploy waits on its receipt inside the request.
const HTTP_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

pub(super) struct ShutdownContext {
    pub(super) http_shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub(super) handle_http_events_task: JoinHandle<()>,
}

pub(super) async fn graceful_shutdown(context: ShutdownContext) {
    // 1. Stop accepting new requests.
    // 2. Wait for in-flight requests to finish.
    //
    // Confirmation monitors still waiting on receipts are dropped with the
    // runtime; their ledger rows stay `pending`.
    let ShutdownContext {
        http_shutdown_tx,
        mut handle_http_events_task,
    } = context;

    tracing::info!("Shutting down gracefully...");

    let _ = http_shutdown_tx.send(());

    wait_for_shutdown_task(
        "http_server",
        HTTP_SHUTDOWN_TIMEOUT,
        &mut handle_http_events_task,
    )
    .await;

    tracing::info!("Shutdown complete");
}

async fn wait_for_shutdown_task(
    task: &str,
    timeout: Duration,
    handle: &mut JoinHandle<()>,
) {
    match tokio::time::timeout(timeout, &mut *handle).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::error!(
            task,
            error = ?error,
            "Shutdown task panicked"
        ),
        Err(_) => {
            tracing::warn!(
                task,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout reached, aborting task"
            );
            handle.abort();
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stuck_task_is_aborted_after_the_timeout() {
        let mut handle = tokio::spawn(std::future::pending::<()>());

        wait_for_shutdown_task("stuck", Duration::from_millis(10), &mut handle).await;

        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn finished_task_is_awaited() {
        let mut handle = tokio::spawn(async {});

        wait_for_shutdown_task("done", Duration::from_secs(1), &mut handle).await;

        assert!(handle.is_finished());
    }
}
