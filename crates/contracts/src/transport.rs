//! Transport trait - worker output interface
//!
//! Defines how a single message body leaves the process.

use crate::DeliveryError;

/// Message delivery trait
///
/// Each worker owns one transport instance; implementations are never
/// shared between workers.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Target the transport delivers to (used for logging)
    fn endpoint(&self) -> &str;

    /// Deliver one message body
    ///
    /// # Errors
    /// Any non-success outcome, already classified
    async fn deliver(&self, body: &str) -> Result<(), DeliveryError>;
}
