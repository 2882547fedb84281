//! Worker - one delivery loop bound to one transport
//!
//! States: `Idle` (waiting for intake) -> `Sending` (one delivery) -> back to
//! `Idle`, or `Draining` on cancellation, then `Exited`.

use std::sync::Arc;
use std::time::Instant;

use async_channel::{Receiver, Sender, TrySendError};
use contracts::{Message, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::metrics::NotifierMetrics;

enum WorkerState {
    Idle,
    Sending(Message),
    Draining(Option<Message>),
    Exited,
}

pub(crate) struct Worker<T> {
    id: usize,
    transport: T,
    intake: Receiver<Message>,
    errors: Sender<Message>,
    cancel: CancellationToken,
    metrics: Arc<NotifierMetrics>,
}

impl<T: Transport + Sync> Worker<T> {
    pub(crate) fn new(
        id: usize,
        transport: T,
        intake: Receiver<Message>,
        errors: Sender<Message>,
        cancel: CancellationToken,
        metrics: Arc<NotifierMetrics>,
    ) -> Self {
        Self {
            id,
            transport,
            intake,
            errors,
            cancel,
            metrics,
        }
    }

    /// Run until the intake queue is closed and empty, or cancellation
    /// has been handled.
    #[instrument(name = "notifier_worker_loop", skip(self), fields(worker = self.id, url = %self.transport.endpoint()))]
    pub(crate) async fn run(self) {
        debug!(worker = self.id, "Worker started");

        let mut state = WorkerState::Idle;
        loop {
            state = match state {
                WorkerState::Idle => self.next().await,
                WorkerState::Sending(message) => self.deliver(message).await,
                WorkerState::Draining(in_hand) => {
                    self.drain(in_hand).await;
                    WorkerState::Exited
                }
                WorkerState::Exited => break,
            };
        }

        debug!(worker = self.id, "Worker stopped");
    }

    async fn next(&self) -> WorkerState {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!(worker = self.id, "Received stop signal while idle");
                WorkerState::Draining(None)
            }
            received = self.intake.recv() => match received {
                Ok(message) if self.cancel.is_cancelled() => WorkerState::Draining(Some(message)),
                Ok(message) => {
                    observability::record_intake_depth(self.intake.len());
                    WorkerState::Sending(message)
                }
                // closed and empty
                Err(_) => WorkerState::Exited,
            },
        }
    }

    async fn deliver(&self, mut message: Message) -> WorkerState {
        let started = Instant::now();
        let outcome = self.transport.deliver(&message.body).await;
        observability::record_delivery(outcome.is_ok(), started.elapsed());

        match outcome {
            Ok(()) => self.metrics.inc_delivered_count(),
            Err(error) => {
                self.metrics.inc_failed_count();
                debug!(worker = self.id, error = %error, "Delivery failed");
                message.error = Some(error);
                // Blocks while the error queue is full.
                if self.errors.send(message).await.is_err() {
                    warn!(worker = self.id, "Error queue closed, failure not reported");
                }
            }
        }

        WorkerState::Idle
    }

    /// Cancellation exit path.
    async fn drain(&self, in_hand: Option<Message>) {
        let mut abandoned = 0u64;

        // The one lossy point in the pool: the in-hand message goes back
        // without an error attached, and is dropped if the error queue is
        // full at this instant.
        if let Some(message) = in_hand {
            abandoned += 1;
            match self.errors.try_send(message) {
                Ok(()) => debug!(worker = self.id, "Returned last message to error queue"),
                Err(TrySendError::Full(message)) | Err(TrySendError::Closed(message)) => {
                    warn!(worker = self.id, body = %message.body, "Error queue unavailable, last message dropped");
                }
            }
        }

        // Keep consuming until intake is closed so `send` cannot wedge on a
        // pool with no live consumers.
        while self.intake.recv().await.is_ok() {
            abandoned += 1;
        }

        self.metrics.add_cancelled_count(abandoned);
        observability::record_messages_cancelled(abandoned);
        debug!(worker = self.id, abandoned, "Worker drained after cancellation");
    }
}
