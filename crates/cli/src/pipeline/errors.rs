//! Error queue consumer.

use async_channel::Receiver;
use contracts::Message;
use tracing::{debug, warn};

/// Messages seen on the error queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorCounts {
    /// Messages whose delivery failed
    pub failed: u64,
    /// Messages abandoned on cancellation
    pub cancelled: u64,
}

/// Log every message on the error queue until it closes
pub async fn drain_errors(errors: Receiver<Message>) -> ErrorCounts {
    let mut counts = ErrorCounts::default();

    while let Ok(message) = errors.recv().await {
        match &message.error {
            Some(error) => {
                counts.failed += 1;
                warn!(body = %message.body, error = %error, "failed message");
            }
            None => {
                counts.cancelled += 1;
                warn!(body = %message.body, "cancelled message");
            }
        }
    }

    debug!(
        failed = counts.failed,
        cancelled = counts.cancelled,
        "error queue closed"
    );
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DeliveryError;

    #[tokio::test]
    async fn test_counts_failed_and_cancelled_separately() {
        let (tx, rx) = async_channel::bounded(4);
        tx.send(Message::new("a").with_error(DeliveryError::status(503)))
            .await
            .unwrap();
        tx.send(Message::new("b")).await.unwrap();
        tx.send(Message::new("c").with_error(DeliveryError::timeout("deadline")))
            .await
            .unwrap();
        tx.close();

        let counts = drain_errors(rx).await;
        assert_eq!(
            counts,
            ErrorCounts {
                failed: 2,
                cancelled: 1
            }
        );
    }
}
