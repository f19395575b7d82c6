//! Line-delimited transport over byte streams
//!
//! Lets a separate process act as the identity service: inbound identity
//! changes arrive one JSON payload per line, outbound messages leave as one
//! `{"topic": ..., "payload": ...}` envelope per line. `serve` wires these to
//! stdin and stdout.

use artbridge_core::{ArtistError, Message, Publisher, Subscriber};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One outbound line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub topic: String,
    pub payload: String,
}

/// Reads one payload per line for a single topic
///
/// Blank lines are ignored. The subscription ends at end-of-input or on the
/// first read error.
#[derive(Debug)]
pub struct LineSubscriber<R> {
    topic: String,
    lines: Lines<R>,
}

impl<R> LineSubscriber<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(topic: impl Into<String>, reader: R) -> Self {
        Self {
            topic: topic.into(),
            lines: reader.lines(),
        }
    }
}

impl LineSubscriber<BufReader<tokio::io::Stdin>> {
    /// Identity changes piped into this process
    pub fn stdin(topic: impl Into<String>) -> Self {
        Self::new(topic, BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> Subscriber for LineSubscriber<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn next_message(&mut self) -> Option<Message> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => return Some(Message::new(self.topic.clone(), line)),
                Ok(None) => return None,
                Err(e) => {
                    warn!("Reading {} failed, closing subscription: {}", self.topic, e);
                    return None;
                }
            }
        }
    }
}

/// Writes every published message as an [`Envelope`] line and flushes it
#[derive(Debug)]
pub struct LinePublisher<W> {
    writer: Mutex<W>,
}

impl<W> LinePublisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl LinePublisher<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> Publisher for LinePublisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn publish(&self, topic: &str, payload: String) -> artbridge_core::Result<()> {
        let mut line = serde_json::to_string(&Envelope {
            topic: topic.to_string(),
            payload,
        })?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ArtistError::Delivery(format!("writing to {topic}: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| ArtistError::Delivery(format!("flushing {topic}: {e}")))?;

        debug!("Wrote line to {}", topic);
        Ok(())
    }
}
