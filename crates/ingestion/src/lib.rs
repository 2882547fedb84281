//! # Ingestion
//!
//! Upstream half of the pipeline.
//!
//! Responsibilities:
//! - Turn an input stream into `Message`s (`LineReader`)
//! - Buffer messages over a time window and hand batches to the dispatcher (`Batcher`)
//! - Backpressure: stop reading input while the local window is full
//!
//! ## Usage
//!
//! ```ignore
//! use ingestion::{Batcher, BatcherConfig, LineReader};
//!
//! let config = BatcherConfig::from(&notify_config);
//! let (tx, rx) = async_channel::bounded(config.input_capacity);
//!
//! tokio::spawn(LineReader::new(stdin, cancel.clone()).run(tx));
//! let report = Batcher::new(notifier, config, cancel).run(rx).await?;
//! ```

mod batcher;
mod config;
mod error;
mod reader;

pub use batcher::{BatchReport, Batcher};
pub use config::BatcherConfig;
pub use contracts::Message;
pub use error::{IngestionError, Result};
pub use reader::LineReader;
