//! Close handshake between the host window and the presentation layer
//!
//! Closing is two-phase: the coordinator hands a [`SaveRequest`] to the
//! presentation listener and waits, bounded by a timeout, for it to be
//! acknowledged once unsaved state has been flushed. Closing is terminal,
//! so later requests report [`CloseOutcome::AlreadyClosing`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Default time the presentation layer gets to confirm its save
pub const DEFAULT_SAVE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Request delivered to the presentation layer before the window closes
#[derive(Debug)]
pub struct SaveRequest {
    ack: oneshot::Sender<()>,
}

impl SaveRequest {
    /// Confirm that pending data has been saved
    pub fn acknowledge(self) {
        let _ = self.ack.send(());
    }
}

/// How a close request was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The listener confirmed its save
    Acknowledged,
    /// No confirmation arrived in time; closing anyway
    TimedOut,
    /// Nobody was listening, or the request was dropped unanswered
    NoListener,
    /// A close is already under way
    AlreadyClosing,
}

impl CloseOutcome {
    /// Whether the host should proceed with closing
    pub fn should_close(self) -> bool {
        !matches!(self, CloseOutcome::AlreadyClosing)
    }
}

/// Receiving half held by the presentation layer
#[derive(Debug)]
pub struct SaveListener {
    receiver: mpsc::Receiver<SaveRequest>,
}

impl SaveListener {
    /// Wait for the next save request; `None` once the coordinator is gone
    pub async fn recv(&mut self) -> Option<SaveRequest> {
        self.receiver.recv().await
    }
}

/// Drives the close handshake
#[derive(Debug)]
pub struct CloseCoordinator {
    sender: mpsc::Sender<SaveRequest>,
    closing: AtomicBool,
    timeout: Duration,
}

impl CloseCoordinator {
    pub fn new(timeout: Duration) -> (Self, SaveListener) {
        let (sender, receiver) = mpsc::channel(1);
        (
            Self {
                sender,
                closing: AtomicBool::new(false),
                timeout,
            },
            SaveListener { receiver },
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Ask the presentation layer to save, then resolve the close
    pub async fn request_close(&self) -> CloseOutcome {
        if self.closing.swap(true, Ordering::SeqCst) {
            return CloseOutcome::AlreadyClosing;
        }

        info!("Window close intercepted, requesting save");
        let (ack, confirmed) = oneshot::channel();
        if self.sender.try_send(SaveRequest { ack }).is_err() {
            warn!("No save listener, closing without confirmation");
            return CloseOutcome::NoListener;
        }

        match tokio::time::timeout(self.timeout, confirmed).await {
            Ok(Ok(())) => {
                info!("Data saved, proceeding to close");
                CloseOutcome::Acknowledged
            }
            Ok(Err(_)) => {
                warn!("Save request dropped without confirmation, closing");
                CloseOutcome::NoListener
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Save was not confirmed in time, forcing close");
                CloseOutcome::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_acknowledged_close() {
        let (coordinator, mut listener) = CloseCoordinator::new(DEFAULT_SAVE_TIMEOUT);
        let renderer = tokio::spawn(async move {
            let request = listener.recv().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            request.acknowledge();
        });

        assert_eq!(coordinator.request_close().await, CloseOutcome::Acknowledged);
        renderer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_request_times_out() {
        let (coordinator, mut listener) = CloseCoordinator::new(DEFAULT_SAVE_TIMEOUT);
        let renderer = tokio::spawn(async move {
            let request = listener.recv().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            request.acknowledge();
        });

        let started = tokio::time::Instant::now();
        assert_eq!(coordinator.request_close().await, CloseOutcome::TimedOut);
        assert!(started.elapsed() >= DEFAULT_SAVE_TIMEOUT);
        renderer.abort();
    }

    #[tokio::test]
    async fn test_no_listener() {
        let (coordinator, listener) = CloseCoordinator::new(DEFAULT_SAVE_TIMEOUT);
        drop(listener);
        assert_eq!(coordinator.request_close().await, CloseOutcome::NoListener);
    }

    #[tokio::test]
    async fn test_dropped_request_is_no_listener() {
        let (coordinator, mut listener) = CloseCoordinator::new(DEFAULT_SAVE_TIMEOUT);
        tokio::spawn(async move {
            let _ = listener.recv().await;
        });
        assert_eq!(coordinator.request_close().await, CloseOutcome::NoListener);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_is_already_closing() {
        let (coordinator, mut listener) = CloseCoordinator::new(DEFAULT_SAVE_TIMEOUT);
        let coordinator = Arc::new(coordinator);

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.request_close().await })
        };
        let request = listener.recv().await.unwrap();

        assert!(coordinator.is_closing());
        assert_eq!(coordinator.request_close().await, CloseOutcome::AlreadyClosing);
        assert!(!CloseOutcome::AlreadyClosing.should_close());

        request.acknowledge();
        assert_eq!(first.await.unwrap(), CloseOutcome::Acknowledged);
        assert_eq!(coordinator.request_close().await, CloseOutcome::AlreadyClosing);
    }
}
