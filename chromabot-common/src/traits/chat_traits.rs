// File: chromabot-common/src/traits/chat_traits.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::{ChatMessage, ConnectedInfo};

/// Receiver of chat connection events.
///
/// The chat watcher owns the connection lifecycle and calls into this once
/// per event. `on_message` calls are never overlapped: the next message is
/// delivered only after the previous future resolves.
#[async_trait]
pub trait ChatHandler: Send + Sync {
    async fn on_connected(&self, info: &ConnectedInfo);

    /// An `Err` is logged by the caller and does not stop the watcher.
    async fn on_message(&self, message: &ChatMessage) -> Result<(), Error>;
}
