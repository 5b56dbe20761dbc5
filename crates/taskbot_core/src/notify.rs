//! Outbound notification capability.
//!
//! The core never owns a transport; front-ends provide a `Notifier` and the
//! reminder sweep and command replies both send through it.

use crate::model::OwnerId;
use crate::retry::{retry_with_backoff, RetryPolicy};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Delivery failure reported by a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Transport accepted the call but delivery failed.
    Delivery(String),
    /// Transport is shut down or otherwise unusable.
    Unavailable(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery(message) => write!(f, "notification delivery failed: {message}"),
            Self::Unavailable(message) => write!(f, "notifier unavailable: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Sends one text message to one owner.
///
/// Implementations are expected to enforce their own timeouts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, owner: OwnerId, text: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    async fn send(&self, owner: OwnerId, text: &str) -> Result<(), NotifyError> {
        (**self).send(owner, text).await
    }
}

/// Sends `text` to `owner`, retrying per `policy`.
///
/// Returns the last delivery error once attempts are exhausted.
pub async fn send_with_retry<N: Notifier + ?Sized>(
    notifier: &N,
    owner: OwnerId,
    text: &str,
    policy: RetryPolicy,
) -> Result<(), NotifyError> {
    let label = format!("notify owner={owner}");
    retry_with_backoff(policy, &label, move |_attempt| notifier.send(owner, text)).await
}
