//! Line-oriented input source

use async_channel::Sender;
use contracts::Message;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace};

use crate::error::Result;

/// Reads lines from an async reader and emits one `Message` per non-empty line
///
/// The output channel is closed when the reader finishes, which is how the
/// batcher learns that input has ended.
pub struct LineReader<R> {
    reader: R,
    cancel: CancellationToken,
}

impl<R> LineReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R, cancel: CancellationToken) -> Self {
        Self { reader, cancel }
    }

    /// Read until EOF, cancellation, or a closed output; returns the number of messages emitted
    #[instrument(name = "line_reader_run", skip_all)]
    pub async fn run(self, out: Sender<Message>) -> Result<u64> {
        let mut lines = self.reader.lines();
        let mut emitted = 0u64;

        let outcome: Result<()> = loop {
            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("line reader cancelled");
                    break Ok(());
                }
                line = lines.next_line() => line,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e.into()),
            };

            if line.is_empty() {
                continue;
            }

            trace!(len = line.len(), "read line");

            let sent = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break Ok(()),
                sent = out.send(Message::new(line)) => sent,
            };
            if sent.is_err() {
                debug!("output closed, stopping reader");
                break Ok(());
            }
            emitted += 1;
        };

        out.close();
        info!(emitted, "line reader finished");

        outcome.map(|()| emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::BufReader;

    async fn collect(rx: async_channel::Receiver<Message>) -> Vec<String> {
        let mut bodies = Vec::new();
        while let Ok(message) = rx.recv().await {
            bodies.push(message.body);
        }
        bodies
    }

    #[tokio::test]
    async fn test_reads_lines_and_skips_blank() {
        let input: &[u8] = b"first\n\nsecond\r\n\nthird";
        let (tx, rx) = async_channel::bounded(8);

        let emitted = LineReader::new(input, CancellationToken::new())
            .run(tx)
            .await
            .unwrap();

        assert_eq!(emitted, 3);
        assert_eq!(collect(rx).await, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_closes_output_on_eof() {
        let input: &[u8] = b"";
        let (tx, rx) = async_channel::bounded(1);

        let emitted = LineReader::new(input, CancellationToken::new())
            .run(tx)
            .await
            .unwrap();

        assert_eq!(emitted, 0);
        assert!(rx.is_closed());
        assert!(rx.recv().await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_while_blocked_on_full_output() {
        let input = BufReader::new(&b"a\nb\nc\n"[..]);
        let cancel = CancellationToken::new();
        let (tx, rx) = async_channel::bounded(1);

        let handle = tokio::spawn(LineReader::new(input, cancel.clone()).run(tx));

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let emitted = handle.await.unwrap().unwrap();
        assert_eq!(emitted, 1);
        assert_eq!(collect(rx).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_stops_when_output_closed() {
        let input: &[u8] = b"a\nb\n";
        let (tx, rx) = async_channel::bounded(4);
        rx.close();

        let emitted = LineReader::new(input, CancellationToken::new())
            .run(tx)
            .await
            .unwrap();

        assert_eq!(emitted, 0);
    }
}
