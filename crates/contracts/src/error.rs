//! Layered error definitions
//!
//! Split by how they travel: [`NotifierError`] is returned to the caller,
//! [`DeliveryError`] rides on a failed [`crate::Message`] as data.

use thiserror::Error;

/// Unified error type for construction and lifecycle operations
#[derive(Debug, Error)]
pub enum NotifierError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Client Errors =====
    /// HTTP client could not be built
    #[error("failed to build delivery client: {message}")]
    ClientBuild { message: String },

    // ===== Lifecycle Errors =====
    /// Operation requires a started dispatcher
    #[error("notifier is not started")]
    NotStarted,

    /// `start` was called twice
    #[error("notifier is already started")]
    AlreadyStarted,

    /// Operation after `stop`
    #[error("notifier is stopped")]
    Stopped,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotifierError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create client build error
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }
}

/// Per-message delivery failure
///
/// Never returned from `send`; attached to the message and routed to the
/// error queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Remote answered with anything but 200
    #[error("response status code: {status}")]
    Status { status: u16 },

    /// Request exceeded the client timeout
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// TCP connect or TLS handshake failed
    #[error("connection failed: {message}")]
    Connect { message: String },

    /// Any other transport-level failure
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl DeliveryError {
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
