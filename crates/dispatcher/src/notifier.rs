//! Notifier - owns the worker pool and both queues
//!
//! ```text
//! send(batch) ──▶ intake queue ──▶ worker × N ──▶ POST url
//!                                     │
//!                                     └─ failure ──▶ error queue ──▶ error_channel()
//! ```
//!
//! `stop` closes intake, lets every worker finish what is queued, joins the
//! pool, then closes the error queue and discards what is left on it.

use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use contracts::{Message, MessageDispatch, NotifierError, NotifyConfig, ShutdownSummary, Transport};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::client::HttpTransport;
use crate::metrics::NotifierMetrics;
use crate::worker::Worker;

/// Lifecycle of a notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    /// Queues allocated, no workers
    Created,
    /// Workers running, accepting sends
    Started,
    /// Intake closed, waiting for workers
    Stopping,
    /// Workers joined, error queue closed
    Stopped,
}

/// Worker-pool dispatcher
pub struct Notifier {
    config: NotifyConfig,
    state: NotifierState,
    intake_tx: Sender<Message>,
    intake_rx: Receiver<Message>,
    error_tx: Sender<Message>,
    error_rx: Receiver<Message>,
    workers: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
    metrics: Arc<NotifierMetrics>,
}

impl Notifier {
    /// Create a notifier whose workers always drain fully
    ///
    /// The cancellation token is private and never cancelled.
    ///
    /// # Errors
    /// `ConfigValidation` if `url` is empty
    pub fn new(config: NotifyConfig) -> Result<Self, NotifierError> {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Create a notifier whose workers observe a caller-owned cancellation token
    ///
    /// # Errors
    /// `ConfigValidation` if `url` is empty
    #[instrument(name = "notifier_new", skip(config, cancel), fields(url = %config.url))]
    pub fn with_cancellation(
        config: NotifyConfig,
        cancel: CancellationToken,
    ) -> Result<Self, NotifierError> {
        config.ensure_url()?;
        let config = config.with_defaults();

        let (intake_tx, intake_rx) = bounded(config.intake_queue_capacity);
        let (error_tx, error_rx) = bounded(config.error_queue_capacity);

        debug!(
            workers = config.num_workers,
            intake_capacity = config.intake_queue_capacity,
            error_capacity = config.error_queue_capacity,
            "Notifier created"
        );

        Ok(Self {
            config,
            state: NotifierState::Created,
            intake_tx,
            intake_rx,
            error_tx,
            error_rx,
            workers: Vec::new(),
            cancel,
            metrics: Arc::new(NotifierMetrics::new()),
        })
    }

    /// Resolved configuration (defaults applied)
    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    pub fn state(&self) -> NotifierState {
        self.state
    }

    pub fn metrics(&self) -> &Arc<NotifierMetrics> {
        &self.metrics
    }

    /// Receiving end of the error queue
    ///
    /// Must be drained concurrently while the notifier runs: once the queue
    /// is full, workers block on reporting failures and delivery stalls.
    pub fn error_channel(&self) -> Receiver<Message> {
        self.error_rx.clone()
    }

    /// Spawn `num_workers` workers, each with its own HTTP client
    ///
    /// # Errors
    /// - `AlreadyStarted` / `Stopped` on lifecycle misuse
    /// - `ClientBuild` if a client cannot be built
    pub fn start(&mut self) -> Result<(), NotifierError> {
        let url = self.config.url.clone();
        let client = self.config.client.clone();
        self.start_with(|_| HttpTransport::new(url.clone(), &client))
    }

    /// Spawn `num_workers` workers with transports from `make_transport`
    ///
    /// The factory is called once per worker with the worker index. All
    /// transports are built before any worker is spawned, so a failing
    /// factory leaves the notifier in `Created`.
    ///
    /// # Errors
    /// - `AlreadyStarted` / `Stopped` on lifecycle misuse
    /// - whatever `make_transport` returns
    #[instrument(name = "notifier_start", skip(self, make_transport), fields(workers = self.config.num_workers))]
    pub fn start_with<T, F>(&mut self, make_transport: F) -> Result<(), NotifierError>
    where
        T: Transport + Sync + 'static,
        F: FnMut(usize) -> Result<T, NotifierError>,
    {
        match self.state {
            NotifierState::Created => {}
            NotifierState::Started => return Err(NotifierError::AlreadyStarted),
            NotifierState::Stopping | NotifierState::Stopped => return Err(NotifierError::Stopped),
        }

        let transports = (0..self.config.num_workers)
            .map(make_transport)
            .collect::<Result<Vec<T>, NotifierError>>()?;

        for (id, transport) in transports.into_iter().enumerate() {
            let worker = Worker::new(
                id,
                transport,
                self.intake_rx.clone(),
                self.error_tx.clone(),
                self.cancel.clone(),
                Arc::clone(&self.metrics),
            );
            self.workers.push(tokio::spawn(worker.run()));
        }

        self.state = NotifierState::Started;
        info!(
            workers = self.workers.len(),
            url = %self.config.url,
            "Notifier started"
        );
        Ok(())
    }

    /// Enqueue messages in order
    ///
    /// Waits whenever the intake queue is full; this is the pipeline's only
    /// backpressure. Returns once every message is enqueued. Delivery
    /// outcomes only surface through the error queue.
    ///
    /// # Errors
    /// `NotStarted` / `Stopped` when the notifier is not accepting sends
    #[instrument(name = "notifier_send", skip(self, messages), fields(count = messages.len()))]
    pub async fn send(&self, messages: Vec<Message>) -> Result<(), NotifierError> {
        match self.state {
            NotifierState::Started => {}
            NotifierState::Created => return Err(NotifierError::NotStarted),
            NotifierState::Stopping | NotifierState::Stopped => return Err(NotifierError::Stopped),
        }

        debug!(count = messages.len(), "Received messages");

        for message in messages {
            self.intake_tx
                .send(message)
                .await
                .map_err(|_| NotifierError::Stopped)?;
            observability::record_intake_depth(self.intake_tx.len());
        }

        debug!("All messages handed to workers");
        Ok(())
    }

    /// Close intake, wait for every worker, close and clear the error queue
    ///
    /// Does not cancel workers: everything already queued is delivered.
    /// Messages still on the error queue once the pool has exited are
    /// discarded and counted in the summary.
    ///
    /// # Errors
    /// `Stopped` if called a second time
    #[instrument(name = "notifier_stop", skip(self))]
    pub async fn stop(&mut self) -> Result<ShutdownSummary, NotifierError> {
        match self.state {
            NotifierState::Created | NotifierState::Started => {}
            NotifierState::Stopping | NotifierState::Stopped => return Err(NotifierError::Stopped),
        }
        self.state = NotifierState::Stopping;

        // No more new messages; queued ones stay receivable.
        self.intake_tx.close();

        info!(workers = self.workers.len(), "Waiting for all workers");
        for handle in self.workers.drain(..) {
            if let Err(e) = handle.await {
                error!(error = ?e, "Worker task panicked");
            }
        }

        // No more new errors.
        self.error_tx.close();
        let mut discarded = 0u64;
        while self.error_rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            warn!(discarded, "Dropped unread messages from the error queue");
        }
        self.metrics.add_discarded_errors(discarded);
        observability::record_errors_discarded(discarded);

        self.state = NotifierState::Stopped;

        let snapshot = self.metrics.snapshot();
        let summary = ShutdownSummary {
            delivered: snapshot.delivered_count,
            failed: snapshot.failed_count,
            cancelled: snapshot.cancelled_count,
            discarded_errors: snapshot.discarded_errors,
        };
        info!(
            delivered = summary.delivered,
            failed = summary.failed,
            cancelled = summary.cancelled,
            discarded_errors = summary.discarded_errors,
            "Notifier stopped"
        );
        Ok(summary)
    }
}

impl MessageDispatch for Notifier {
    async fn send(&self, messages: Vec<Message>) -> Result<(), NotifierError> {
        Notifier::send(self, messages).await
    }

    async fn stop(&mut self) -> Result<ShutdownSummary, NotifierError> {
        Notifier::stop(self).await
    }
}
