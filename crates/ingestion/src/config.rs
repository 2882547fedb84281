//! Batching configuration

use std::time::Duration;

use contracts::{
    NotifyConfig, DEFAULT_LINE_QUEUE_CAPACITY, DEFAULT_SEND_INTERVAL_BUFFER_CAPACITY,
    DEFAULT_SEND_INTERVAL_MS,
};

/// Batcher configuration
#[derive(Debug, Clone)]
pub struct BatcherConfig {
    /// Flush interval
    pub send_interval: Duration,

    /// Local window capacity; input is not read while it is full
    pub buffer_capacity: usize,

    /// Producer -> batcher queue capacity
    pub input_capacity: usize,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_millis(DEFAULT_SEND_INTERVAL_MS),
            buffer_capacity: DEFAULT_SEND_INTERVAL_BUFFER_CAPACITY,
            input_capacity: DEFAULT_LINE_QUEUE_CAPACITY,
        }
    }
}

impl BatcherConfig {
    /// Create new batcher configuration
    pub fn new(send_interval: Duration, buffer_capacity: usize) -> Self {
        Self {
            send_interval,
            buffer_capacity,
            ..Default::default()
        }
    }

    /// Flush period; a zero interval falls back to the default
    pub fn period(&self) -> Duration {
        if self.send_interval.is_zero() {
            Duration::from_millis(DEFAULT_SEND_INTERVAL_MS)
        } else {
            self.send_interval
        }
    }
}

impl From<&NotifyConfig> for BatcherConfig {
    fn from(config: &NotifyConfig) -> Self {
        let config = config.clone().with_defaults();
        Self {
            send_interval: config.send_interval(),
            buffer_capacity: config.send_interval_buffer_capacity,
            input_capacity: config.line_queue_capacity,
        }
    }
}
