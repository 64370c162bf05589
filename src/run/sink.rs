//! Single-consumer result sink.
//!
//! Every task sends its `TargetOutcome` over a channel to one collector,
//! which is the only writer of the output stream and the persistence buffer.
//! Output is written asynchronously, so a stalled reader on the other end of
//! a pipe parks the collector without holding a runtime worker.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::error_handling::{ProcessingStats, SkipReason};
use crate::models::TargetOutcome;

/// Writes reported results as JSON lines and keeps them for persistence.
pub(crate) struct ResultSink {
    out: Box<dyn AsyncWrite + Send + Unpin>,
    buffer: String,
    stats: Arc<ProcessingStats>,
    write_error: Option<std::io::Error>,
}

impl ResultSink {
    pub(crate) fn new(out: Box<dyn AsyncWrite + Send + Unpin>, stats: Arc<ProcessingStats>) -> Self {
        ResultSink {
            out,
            buffer: String::new(),
            stats,
            write_error: None,
        }
    }

    /// Reports one outcome: prints and buffers a result, logs a skip.
    pub(crate) async fn record(&mut self, outcome: TargetOutcome) {
        match outcome {
            TargetOutcome::Reported(result) => match serde_json::to_string(&result) {
                Ok(mut line) => {
                    line.push('\n');
                    self.emit(&line).await;
                    self.buffer.push_str(&line);
                    self.stats.increment_reported();
                }
                Err(e) => self.skip(&result.base_info.url, SkipReason::SerializationFailed, &e),
            },
            TargetOutcome::Skipped {
                url,
                reason,
                detail,
            } => self.skip(&url, reason, &detail),
        }
    }

    fn skip(&self, url: &str, reason: SkipReason, detail: &dyn std::fmt::Display) {
        warn!("Skipping {url}: {reason} ({detail})");
        self.stats.increment_skip(reason);
    }

    async fn emit(&mut self, line: &str) {
        if self.write_error.is_some() {
            return;
        }
        let written = match self.out.write_all(line.as_bytes()).await {
            Ok(()) => self.out.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!("Failed to write result to output: {e}");
            self.write_error = Some(e);
        }
    }

    /// Consumes the sink, returning the buffered JSON lines or the first
    /// output error.
    pub(crate) fn finish(self) -> Result<String> {
        match self.write_error {
            Some(e) => Err(e).context("Failed to write results to output"),
            None => Ok(self.buffer),
        }
    }
}

/// Drains `rx` into `sink` until every sender is dropped.
pub(crate) async fn collect_results(
    mut sink: ResultSink,
    mut rx: mpsc::Receiver<TargetOutcome>,
) -> ResultSink {
    while let Some(outcome) = rx.recv().await {
        sink.record(outcome).await;
    }
    sink
}

/// Writes the buffered lines to `path`, truncating existing content.
pub(crate) async fn persist_results(path: &Path, buffer: &str) -> Result<()> {
    tokio::fs::write(path, buffer)
        .await
        .with_context(|| format!("Failed to write result file {}", path.display()))
}
