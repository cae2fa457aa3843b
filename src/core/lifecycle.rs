//! Connection lifecycle signal
//!
//! Shared between the gateway event handler, `main`, and background tasks that
//! should only run while the bot is connected.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Ready,
    Closed,
}

#[derive(Clone)]
pub struct Lifecycle {
    tx: std::sync::Arc<watch::Sender<ConnectionState>>,
    rx: watch::Receiver<ConnectionState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(ConnectionState::Connecting);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.rx.borrow()
    }

    /// Mark the client ready. Has no effect once closed.
    pub fn mark_ready(&self) {
        self.tx.send_if_modified(|state| {
            if *state == ConnectionState::Connecting {
                *state = ConnectionState::Ready;
                true
            } else {
                false
            }
        });
    }

    pub fn mark_closed(&self) {
        self.tx.send_replace(ConnectionState::Closed);
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ConnectionState::Closed
    }

    /// Wait for the ready signal. Returns false if the connection closed first.
    pub async fn wait_until_ready(&self) -> bool {
        let mut rx = self.rx.clone();
        let ready = rx
            .wait_for(|state| *state != ConnectionState::Connecting)
            .await
            .map(|state| *state == ConnectionState::Ready)
            .unwrap_or(false);
        ready
    }

    /// Resolves once the connection is closed
    pub async fn closed(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|state| *state == ConnectionState::Closed).await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_starts_connecting() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), ConnectionState::Connecting);
        assert!(!lifecycle.is_ready());
        assert!(!lifecycle.is_closed());
    }

    #[tokio::test]
    async fn test_wait_until_ready_wakes_on_ready() {
        let lifecycle = Lifecycle::new();
        let waiter = lifecycle.clone();
        let task = tokio::spawn(async move { waiter.wait_until_ready().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        lifecycle.mark_ready();

        assert!(task.await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_until_ready_false_when_closed_first() {
        let lifecycle = Lifecycle::new();
        lifecycle.mark_closed();
        assert!(!lifecycle.wait_until_ready().await);
    }

    #[tokio::test]
    async fn test_ready_after_close_is_ignored() {
        let lifecycle = Lifecycle::new();
        lifecycle.mark_closed();
        lifecycle.mark_ready();
        assert!(lifecycle.is_closed());
    }

    #[tokio::test]
    async fn test_closed_resolves() {
        let lifecycle = Lifecycle::new();
        lifecycle.mark_ready();
        let closer = lifecycle.clone();
        tokio::spawn(async move { closer.mark_closed() });

        tokio::time::timeout(Duration::from_secs(1), lifecycle.closed())
            .await
            .unwrap();
    }
}
