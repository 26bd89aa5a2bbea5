//! Cancellation coordination for in-flight submissions.
//!
//! Cancelling stops finality polling; it never "unsubmits". A transaction
//! already on the wire may still finalize out of band, which is why a
//! cancelled submission reports as indeterminate.

use tokio::sync::broadcast;

/// Hands out cancellation tokens and fires the cancel signal.
pub struct CancelHandle {
    tx: broadcast::Sender<()>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// New token observing this handle.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal all tokens.
    pub fn cancel(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of a cancellation signal.
pub struct CancelToken {
    rx: broadcast::Receiver<()>,
}

impl CancelToken {
    /// Resolves when cancellation fires. If the handle is dropped without
    /// cancelling, this never resolves.
    pub async fn cancelled(&mut self) {
        loop {
            match self.rx.recv().await {
                Ok(()) => return,
                Err(broadcast::error::RecvError::Lagged(_)) => return,
                Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_fires_token() {
        let handle = CancelHandle::new();
        let mut token = handle.token();
        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("token should observe cancel");
    }

    #[tokio::test]
    async fn test_dropped_handle_never_fires() {
        let handle = CancelHandle::new();
        let mut token = handle.token();
        drop(handle);
        let waited =
            tokio::time::timeout(Duration::from_millis(50), token.cancelled()).await;
        assert!(waited.is_err());
    }
}
