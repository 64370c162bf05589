//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Shuts down the background tasks of a run.
///
/// Stops the progress logger and waits for it. Results are written by the
/// collector as they arrive, so there is nothing left to flush here.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
) {
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_stops_logging_task() {
        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let task = tokio::spawn(async move {
            child.cancelled().await;
        });

        shutdown_gracefully(cancel.clone(), Some(task)).await;
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_shutdown_without_logging_task() {
        let cancel = CancellationToken::new();
        shutdown_gracefully(cancel.clone(), None).await;
        assert!(cancel.is_cancelled());
    }
}
