//! # Dispatcher
//!
//! Worker-pool delivery of text notifications.
//!
//! Responsibilities:
//! - Own the bounded intake and error queues
//! - Fan messages out to a fixed pool of workers, one HTTP POST per message
//! - Route failures back to the caller through the error queue
//! - Drain and tear down in order on `stop`

pub mod client;
pub mod metrics;
pub mod notifier;
mod worker;

pub use client::HttpTransport;
pub use contracts::{Message, MessageDispatch, ShutdownSummary, Transport};
pub use metrics::{MetricsSnapshot, NotifierMetrics};
pub use notifier::{Notifier, NotifierState};
