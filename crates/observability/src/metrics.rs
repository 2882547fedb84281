//! Pipeline metric recorders
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! they are no-ops.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Record one delivery attempt
pub fn record_delivery(success: bool, latency: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!("notify_messages_total", "status" => status).increment(1);
    histogram!("notify_delivery_latency_ms").record(latency.as_secs_f64() * 1000.0);
}

/// Record messages abandoned because of cancellation
pub fn record_messages_cancelled(count: u64) {
    if count > 0 {
        counter!("notify_messages_cancelled_total").increment(count);
    }
}

/// Record a batch handed to the dispatcher
pub fn record_batch_flushed(size: usize) {
    counter!("notify_batches_flushed_total").increment(1);
    histogram!("notify_batch_size").record(size as f64);
}

/// Record intake queue depth
pub fn record_intake_depth(depth: usize) {
    gauge!("notify_intake_queue_depth").set(depth as f64);
}

/// Record messages left on the error queue at shutdown
pub fn record_errors_discarded(count: u64) {
    if count > 0 {
        counter!("notify_errors_discarded_total").increment(count);
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
