//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data flow
//! - A producer wraps each text line in a [`Message`]
//! - The batcher hands batches to a [`MessageDispatch`] implementation
//! - Workers push each body through a [`Transport`]
//! - Failures come back as the same [`Message`] with a [`DeliveryError`] attached

mod config;
mod dispatch;
mod error;
mod message;
mod transport;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use message::Message;
pub use transport::{LocalTransport, Transport};
