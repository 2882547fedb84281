//! MessageDispatch trait - batcher output interface

use crate::{Message, NotifierError};

/// Downstream of the batcher
///
/// Implemented by the worker-pool dispatcher; the batcher only sees this.
#[trait_variant::make(MessageDispatch: Send)]
pub trait LocalMessageDispatch {
    /// Enqueue a batch in order, waiting while the intake queue is full
    ///
    /// Returns once every message is enqueued, not once it is delivered.
    async fn send(&self, messages: Vec<Message>) -> Result<(), NotifierError>;

    /// Close intake, wait for in-flight work, tear down
    async fn stop(&mut self) -> Result<ShutdownSummary, NotifierError>;
}

/// Outcome counters reported by `stop`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Messages answered with HTTP 200
    pub delivered: u64,
    /// Messages pushed to the error queue with an error
    pub failed: u64,
    /// Messages abandoned because of cancellation
    pub cancelled: u64,
    /// Messages still on the error queue when it was closed
    pub discarded_errors: u64,
}
