//! NotifyConfig - runtime configuration of the delivery pipeline
//!
//! Every numeric field treats zero as "use the default", so a config that
//! only names `url` is complete.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::NotifierError;

/// Default number of delivery workers
pub const DEFAULT_NUM_WORKERS: usize = 20;
/// Intake queue slots per worker
pub const INTAKE_SLOTS_PER_WORKER: usize = 5;
/// Error queue slots per worker
pub const ERROR_SLOTS_PER_WORKER: usize = 10;
/// Default batching interval
pub const DEFAULT_SEND_INTERVAL_MS: u64 = 5_000;
/// Default capacity of the batcher's local window
pub const DEFAULT_SEND_INTERVAL_BUFFER_CAPACITY: usize = 200;
/// Default capacity of the producer -> batcher queue
pub const DEFAULT_LINE_QUEUE_CAPACITY: usize = 400;

/// Default overall request timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Default TLS handshake timeout
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT_MS: u64 = 5_000;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Target URL, required
    pub url: String,

    /// Number of delivery workers
    #[serde(default)]
    pub num_workers: usize,

    /// Intake queue capacity (default `num_workers * 5`)
    #[serde(default)]
    pub intake_queue_capacity: usize,

    /// Error queue capacity (default `num_workers * 10`)
    #[serde(default)]
    pub error_queue_capacity: usize,

    /// Batching interval in milliseconds
    #[serde(default)]
    pub send_interval_ms: u64,

    /// Batcher local window capacity
    #[serde(default)]
    pub send_interval_buffer_capacity: usize,

    /// Producer -> batcher queue capacity
    #[serde(default)]
    pub line_queue_capacity: usize,

    /// Delivery client settings
    #[serde(default)]
    pub client: ClientConfig,
}

impl NotifyConfig {
    /// Create a config with only the URL set
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            num_workers: 0,
            intake_queue_capacity: 0,
            error_queue_capacity: 0,
            send_interval_ms: 0,
            send_interval_buffer_capacity: 0,
            line_queue_capacity: 0,
            client: ClientConfig::default(),
        }
    }

    /// Replace zero-valued fields with their defaults
    ///
    /// Queue capacities are derived from the resolved worker count.
    pub fn with_defaults(mut self) -> Self {
        if self.num_workers == 0 {
            self.num_workers = DEFAULT_NUM_WORKERS;
        }
        if self.intake_queue_capacity == 0 {
            self.intake_queue_capacity = self.num_workers * INTAKE_SLOTS_PER_WORKER;
        }
        if self.error_queue_capacity == 0 {
            self.error_queue_capacity = self.num_workers * ERROR_SLOTS_PER_WORKER;
        }
        if self.send_interval_ms == 0 {
            self.send_interval_ms = DEFAULT_SEND_INTERVAL_MS;
        }
        if self.send_interval_buffer_capacity == 0 {
            self.send_interval_buffer_capacity = DEFAULT_SEND_INTERVAL_BUFFER_CAPACITY;
        }
        if self.line_queue_capacity == 0 {
            self.line_queue_capacity = DEFAULT_LINE_QUEUE_CAPACITY;
        }
        self.client = self.client.with_defaults();
        self
    }

    /// Reject a config without a target URL
    ///
    /// # Errors
    /// `ConfigValidation` on `url` when it is empty or whitespace
    pub fn ensure_url(&self) -> Result<(), NotifierError> {
        if self.url.trim().is_empty() {
            return Err(NotifierError::config_validation("url", "url is required"));
        }
        Ok(())
    }

    /// Batching interval
    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }
}

/// Delivery client settings
///
/// One client is built per worker from these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Overall request timeout (ms)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// TCP connect timeout (ms)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// TLS handshake timeout (ms)
    #[serde(default = "default_tls_handshake_timeout_ms")]
    pub tls_handshake_timeout_ms: u64,

    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_tls_handshake_timeout_ms() -> u64 {
    DEFAULT_TLS_HANDSHAKE_TIMEOUT_MS
}

fn default_user_agent() -> String {
    concat!("notify/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            tls_handshake_timeout_ms: default_tls_handshake_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Replace zero-valued timeouts with their defaults
    pub fn with_defaults(mut self) -> Self {
        if self.request_timeout_ms == 0 {
            self.request_timeout_ms = DEFAULT_REQUEST_TIMEOUT_MS;
        }
        if self.connect_timeout_ms == 0 {
            self.connect_timeout_ms = DEFAULT_CONNECT_TIMEOUT_MS;
        }
        if self.tls_handshake_timeout_ms == 0 {
            self.tls_handshake_timeout_ms = DEFAULT_TLS_HANDSHAKE_TIMEOUT_MS;
        }
        if self.user_agent.is_empty() {
            self.user_agent = default_user_agent();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn tls_handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.tls_handshake_timeout_ms)
    }
}
