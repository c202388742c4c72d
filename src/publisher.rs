//! Hand-off of status snapshots from the engine to its consumers.
//!
//! Every subscriber receives its own copy of each snapshot, so producer and
//! readers never share mutable state. The most recent snapshot is also kept in
//! a watch slot for consumers that only care about the current value.

use crate::codec::{self, CodecError};
use crate::config::PublisherConfig;
use crate::status::{PrinterStatus, StatusError};
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, broadcast, watch};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Rejected status: {0}")]
    Invalid(#[from] StatusError),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Anything a snapshot can be delivered to: a UI, a pipe, a network client.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn send_status(&self, status: &PrinterStatus) -> Result<(), PublishError>;
}

pub struct StatusPublisher {
    sender: broadcast::Sender<PrinterStatus>,
    latest: watch::Sender<PrinterStatus>,
    strict: bool,
}

impl StatusPublisher {
    pub fn new(config: &PublisherConfig) -> Self {
        let (sender, _) = broadcast::channel(config.capacity.max(1));
        let (latest, _) = watch::channel(PrinterStatus::default());
        Self {
            sender,
            latest,
            strict: config.strict,
        }
    }

    /// Validates and publishes a snapshot, returning how many subscribers received it.
    ///
    /// Expects a single producer: the latest-value slot and the broadcast are
    /// updated one after the other, so concurrent callers can leave `latest()`
    /// holding a different snapshot from the one broadcast last.
    pub fn publish(&self, status: PrinterStatus) -> Result<usize, PublishError> {
        if self.strict {
            status.validate_strict()?;
        } else {
            status.validate()?;
        }
        if status.is_transition() {
            tracing::info!(
                state = status.state_label(),
                change = %status.change,
                "Printer state change"
            );
        } else {
            tracing::debug!(
                state = status.state_label(),
                layer = status.current_layer,
                total_layers = status.num_layers,
                "Printer status"
            );
        }
        if status.is_error {
            tracing::warn!(code = status.error_code, "Printer error: {}", status.error_message);
        }
        self.latest.send_replace(status.clone());
        match self.sender.send(status) {
            Ok(count) => Ok(count),
            Err(_) => {
                tracing::trace!("No status subscribers");
                Ok(0)
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PrinterStatus> {
        self.sender.subscribe()
    }

    pub fn watch(&self) -> watch::Receiver<PrinterStatus> {
        self.latest.subscribe()
    }

    pub fn latest(&self) -> PrinterStatus {
        self.latest.borrow().clone()
    }
}

#[async_trait]
impl StatusSink for StatusPublisher {
    async fn send_status(&self, status: &PrinterStatus) -> Result<(), PublishError> {
        self.publish(status.clone()).map(|_| ())
    }
}

/// Writes each snapshot as one JSON line and flushes it.
pub struct JsonLineSink<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> StatusSink for JsonLineSink<W> {
    async fn send_status(&self, status: &PrinterStatus) -> Result<(), PublishError> {
        let line = codec::encode_line(status)?;
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await.map_err(CodecError::from)?;
        writer.flush().await.map_err(CodecError::from)?;
        Ok(())
    }
}

/// Pumps a subscription into `sink` until the publisher goes away.
/// Returns the number of snapshots delivered.
pub async fn forward<S: StatusSink + ?Sized>(
    mut receiver: broadcast::Receiver<PrinterStatus>,
    sink: &S,
) -> Result<usize, PublishError> {
    let mut forwarded = 0;
    loop {
        match receiver.recv().await {
            Ok(status) => {
                sink.send_status(&status).await?;
                forwarded += 1;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Status subscriber lagged, skipped {} snapshots", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PrinterState;

    fn publisher(strict: bool) -> StatusPublisher {
        StatusPublisher::new(&PublisherConfig { capacity: 8, strict })
    }

    #[tokio::test]
    async fn test_subscribers_get_independent_copies() {
        let publisher = publisher(false);
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();
        let status = PrinterStatus::steady(PrinterState::Printing).with_progress(1, 10);
        assert_eq!(publisher.publish(status.clone()).unwrap(), 2);
        let mut copy = first.recv().await.unwrap();
        copy.current_layer = 9;
        assert_ne!(copy, status);
        assert_eq!(second.recv().await.unwrap(), status);
        assert_eq!(publisher.latest(), status);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let publisher = publisher(false);
        assert_eq!(publisher.publish(PrinterStatus::steady(PrinterState::Idle)).unwrap(), 0);
        assert_eq!(publisher.latest().state, Some(PrinterState::Idle));
    }

    #[test]
    fn test_invalid_status_is_not_published() {
        let publisher = publisher(false);
        let mut rx = publisher.subscribe();
        let bad = PrinterStatus::steady(PrinterState::Exposing).with_progress(11, 10);
        assert!(matches!(publisher.publish(bad), Err(PublishError::Invalid(_))));
        assert!(rx.try_recv().is_err());
        assert_eq!(publisher.latest(), PrinterStatus::default());
    }

    #[test]
    fn test_strict_publisher_rejects_stray_error_details() {
        let mut status = PrinterStatus::steady(PrinterState::Idle);
        status.error_message = "leftover".to_string();
        assert!(publisher(false).publish(status.clone()).is_ok());
        assert!(matches!(
            publisher(true).publish(status),
            Err(PublishError::Invalid(StatusError::StrayErrorDetails { .. }))
        ));
    }

    #[tokio::test]
    async fn test_latest_matches_last_broadcast_for_one_producer() {
        let publisher = publisher(false);
        let mut rx = publisher.subscribe();
        for layer in 1..=5 {
            let status = PrinterStatus::steady(PrinterState::Printing).with_progress(layer, 5);
            publisher.publish(status).unwrap();
        }
        let mut last = None;
        while let Ok(status) = rx.try_recv() {
            last = Some(status);
        }
        assert_eq!(last, Some(publisher.latest()));
        assert_eq!(publisher.latest().current_layer, 5);
    }

    #[tokio::test]
    async fn test_watch_sees_latest_only() {
        let publisher = publisher(false);
        let mut watcher = publisher.watch();
        publisher.publish(PrinterStatus::leaving(PrinterState::Idle)).unwrap();
        publisher.publish(PrinterStatus::entering(PrinterState::PrintSetup)).unwrap();
        watcher.changed().await.unwrap();
        assert_eq!(*watcher.borrow(), PrinterStatus::entering(PrinterState::PrintSetup));
    }
}
