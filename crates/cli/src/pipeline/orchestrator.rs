//! Pipeline orchestrator - wires reader, batcher, dispatcher and error handler.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::NotifyConfig;
use dispatcher::Notifier;
use ingestion::{Batcher, BatcherConfig, LineReader};
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{drain_errors, RunStats};

/// Cancellation handles for a run
///
/// `ingest` stops reading and batching; messages already handed to the
/// dispatcher are still delivered. `dispatch` additionally abandons queued
/// and in-flight deliveries.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    pub ingest: CancellationToken,
    pub dispatch: CancellationToken,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: NotifyConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Run until the input ends or `shutdown.ingest` fires
    pub async fn run<R>(self, input: R, shutdown: Shutdown) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let started = Instant::now();
        let batcher_config = BatcherConfig::from(&self.config);

        let mut notifier = Notifier::with_cancellation(self.config, shutdown.dispatch.clone())
            .context("Failed to create notifier")?;

        let error_task = tokio::spawn(drain_errors(notifier.error_channel()));

        notifier.start().context("Failed to start delivery workers")?;
        info!(
            url = %notifier.config().url,
            workers = notifier.config().num_workers,
            interval_ms = batcher_config.period().as_millis() as u64,
            "Notifier started"
        );

        let (line_tx, line_rx) = async_channel::bounded(batcher_config.input_capacity);
        let reader_task = tokio::spawn(LineReader::new(input, shutdown.ingest.clone()).run(line_tx));

        let batched = Batcher::new(notifier, batcher_config, shutdown.ingest.clone())
            .run(line_rx)
            .await;
        if batched.is_err() {
            // Unblocks a reader still waiting on input.
            shutdown.ingest.cancel();
        }

        // The batcher stops the notifier on every path, so the error queue is
        // closed by now and the drain task finishes.
        let read = reader_task.await.context("Line reader task panicked")?;
        let errors = error_task.await.context("Error handler task panicked")?;

        let report = batched.context("Batcher failed")?;
        let lines_read = read.context("Failed to read input")?;

        Ok(RunStats {
            lines_read,
            batches: report.batches,
            messages_flushed: report.messages_flushed,
            unsent: report.unsent.len(),
            cancelled: report.cancelled,
            batch_sizes: report.batch_sizes,
            shutdown: report.shutdown,
            errors,
            duration: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: String) -> NotifyConfig {
        let mut config = NotifyConfig::new(url);
        config.num_workers = 3;
        config.send_interval_ms = 20;
        config
    }

    #[tokio::test]
    async fn test_delivers_every_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .respond_with(ResponseTemplate::new(200))
            .expect(5)
            .mount(&server)
            .await;

        let input: &'static [u8] = b"one\ntwo\n\nthree\nfour\nfive\n";
        let stats = Pipeline::new(config(format!("{}/notify", server.uri())))
            .run(input, Shutdown::default())
            .await
            .unwrap();

        assert_eq!(stats.lines_read, 5);
        assert_eq!(stats.messages_flushed, 5);
        assert_eq!(stats.shutdown.delivered, 5);
        assert_eq!(stats.shutdown.failed, 0);
        assert!(!stats.cancelled);
    }

    #[tokio::test]
    async fn test_failed_deliveries_are_counted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let input: &'static [u8] = b"a\nb\n";
        let stats = Pipeline::new(config(server.uri()))
            .run(input, Shutdown::default())
            .await
            .unwrap();

        assert_eq!(stats.shutdown.delivered, 0);
        assert_eq!(stats.shutdown.failed, 2);
        assert_eq!(stats.errors.failed + stats.shutdown.discarded_errors, 2);
    }

    #[tokio::test]
    async fn test_missing_url_is_rejected() {
        let input: &'static [u8] = b"a\n";
        let result = Pipeline::new(NotifyConfig::new(""))
            .run(input, Shutdown::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancel_reports_every_unflushed_line() {
        use tokio::io::{AsyncWriteExt, BufReader};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config(server.uri());
        config.send_interval_ms = 60_000;
        config.send_interval_buffer_capacity = 2;

        // Writer stays open, so input never reaches EOF.
        let (mut writer, reader) = tokio::io::duplex(1024);
        writer.write_all(b"a\nb\nc\nd\ne\n").await.unwrap();

        let shutdown = Shutdown::default();
        let run = tokio::spawn(Pipeline::new(config).run(BufReader::new(reader), shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.ingest.cancel();

        let stats = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("run did not return after cancellation")
            .unwrap()
            .unwrap();

        assert!(stats.cancelled);
        assert_eq!(stats.lines_read, 5);
        assert_eq!(stats.messages_flushed, 0);
        assert_eq!(stats.unsent, 5);
        drop(writer);
    }
}
