//! Stdout delivery channel for replies and reminders.

use async_trait::async_trait;
use taskbot_core::{Notifier, NotifyError, OwnerId};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Writes each message as `[owner] text` followed by a blank line.
pub struct ConsoleNotifier<W> {
    out: Mutex<W>,
}

impl ConsoleNotifier<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Notifier for ConsoleNotifier<W> {
    async fn send(&self, owner: OwnerId, text: &str) -> Result<(), NotifyError> {
        let mut out = self.out.lock().await;
        let frame = format!("[{owner}] {text}\n\n");
        out.write_all(frame.as_bytes())
            .await
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        out.flush()
            .await
            .map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}
