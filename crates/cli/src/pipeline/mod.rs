//! Pipeline orchestration module.

mod errors;
mod orchestrator;
mod stats;

pub use errors::{drain_errors, ErrorCounts};
pub use orchestrator::{Pipeline, Shutdown};
pub use stats::RunStats;
