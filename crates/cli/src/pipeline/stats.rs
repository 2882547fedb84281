//! Run statistics.

use std::time::Duration;

use contracts::ShutdownSummary;
use observability::StatsSummary;

use super::ErrorCounts;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Non-empty lines read from the input
    pub lines_read: u64,

    /// Batches handed to the dispatcher
    pub batches: u64,

    /// Messages handed to the dispatcher
    pub messages_flushed: u64,

    /// Buffered messages dropped on cancellation
    pub unsent: usize,

    /// Whether the run was interrupted
    pub cancelled: bool,

    /// Batch size distribution
    pub batch_sizes: StatsSummary,

    /// Dispatcher outcome counters
    pub shutdown: ShutdownSummary,

    /// What the error handler saw
    pub errors: ErrorCounts,

    /// Total duration of the run
    pub duration: Duration,
}

impl RunStats {
    /// Delivered messages per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.shutdown.delivered as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Notify Summary ===\n");

        println!("Input");
        println!("  Lines read: {}", self.lines_read);
        println!("  Batches: {}", self.batches);
        println!("  Batch sizes: {}", self.batch_sizes);
        println!("  Flushed: {}", self.messages_flushed);
        if self.cancelled {
            println!("  Not sent (interrupted): {}", self.unsent);
        }

        println!("\nDelivery");
        println!("  Delivered: {}", self.shutdown.delivered);
        println!("  Failed: {}", self.shutdown.failed);
        println!("  Cancelled: {}", self.shutdown.cancelled);
        println!(
            "  Error queue: {} logged, {} dropped",
            self.errors.failed + self.errors.cancelled,
            self.shutdown.discarded_errors
        );

        println!("\nDuration: {:.2}s ({:.2} msg/s)", self.duration.as_secs_f64(), self.throughput());
        println!();
    }
}
