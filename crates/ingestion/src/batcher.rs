//! Time-windowed batching in front of the dispatcher

use std::mem;

use async_channel::Receiver;
use contracts::{Message, MessageDispatch, ShutdownSummary};
use observability::{RunningStats, StatsSummary};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::BatcherConfig;
use crate::error::Result;

/// Outcome of a batcher run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Non-empty batches handed to the dispatcher
    pub batches: u64,
    /// Messages across all flushed batches
    pub messages_flushed: u64,
    /// Buffered messages that were never flushed because of cancellation
    pub unsent: Vec<Message>,
    /// Whether the run ended on cancellation rather than end of input
    pub cancelled: bool,
    /// Batch size distribution
    pub batch_sizes: StatsSummary,
    /// What the dispatcher reported on stop
    pub shutdown: ShutdownSummary,
}

/// Buffers messages for one send interval, then flushes them as a single batch
///
/// The buffer holds at most `buffer_capacity` messages; while it is full the
/// input channel is not read, so producers block on it.
pub struct Batcher<D> {
    dispatch: D,
    config: BatcherConfig,
    cancel: CancellationToken,
}

impl<D> Batcher<D>
where
    D: MessageDispatch + Send + Sync,
{
    pub fn new(dispatch: D, config: BatcherConfig, cancel: CancellationToken) -> Self {
        Self {
            dispatch,
            config,
            cancel,
        }
    }

    /// Run until the input closes or the token is cancelled, then stop the dispatcher
    ///
    /// End of input flushes whatever is buffered right away instead of waiting
    /// for the next tick. Cancellation flushes nothing; the buffer and
    /// whatever is still queued on `input` are returned in
    /// `BatchReport::unsent`.
    ///
    /// The dispatcher is stopped on every exit path, including a failed
    /// flush; the first error is returned after it has stopped.
    #[instrument(
        name = "batcher_run",
        skip(self, input),
        fields(
            interval_ms = self.config.period().as_millis() as u64,
            capacity = self.config.buffer_capacity
        )
    )]
    pub async fn run(mut self, input: Receiver<Message>) -> Result<BatchReport> {
        let capacity = self.config.buffer_capacity.max(1);
        let period = self.config.period();

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut buffer: Vec<Message> = Vec::with_capacity(capacity);
        let mut sizes = RunningStats::default();
        let mut report = BatchReport::default();
        let mut failure = None;

        info!("batcher started");

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    warn!(buffered = buffer.len(), "batcher cancelled");
                    report.cancelled = true;
                    report.unsent = mem::take(&mut buffer);
                    input.close();
                    while let Ok(message) = input.try_recv() {
                        report.unsent.push(message);
                    }
                    break;
                }

                _ = ticker.tick() => {
                    if !buffer.is_empty() {
                        let batch = mem::replace(&mut buffer, Vec::with_capacity(capacity));
                        if let Err(e) = self.flush(batch, &mut sizes, &mut report).await {
                            failure = Some(e);
                            break;
                        }
                    }
                }

                received = input.recv(), if buffer.len() < capacity => {
                    match received {
                        Ok(message) => buffer.push(message),
                        Err(_) => {
                            debug!(buffered = buffer.len(), "input closed");
                            if !buffer.is_empty() {
                                let batch = mem::take(&mut buffer);
                                if let Err(e) = self.flush(batch, &mut sizes, &mut report).await {
                                    failure = Some(e);
                                }
                            }
                            break;
                        }
                    }
                }
            }
        }

        report.batch_sizes = StatsSummary::from(&sizes);
        let stopped = self.dispatch.stop().await;

        if let Some(e) = failure {
            if let Err(stop_error) = stopped {
                error!(error = %stop_error, "dispatcher stop failed after flush error");
            }
            return Err(e);
        }
        report.shutdown = stopped?;

        info!(
            batches = report.batches,
            flushed = report.messages_flushed,
            unsent = report.unsent.len(),
            cancelled = report.cancelled,
            "batcher finished"
        );

        Ok(report)
    }

    async fn flush(
        &self,
        batch: Vec<Message>,
        sizes: &mut RunningStats,
        report: &mut BatchReport,
    ) -> Result<()> {
        let size = batch.len();
        debug!(size, "flushing batch");

        self.dispatch.send(batch).await?;

        observability::record_batch_flushed(size);
        sizes.push(size as f64);
        report.batches += 1;
        report.messages_flushed += size as u64;
        Ok(())
    }
}
