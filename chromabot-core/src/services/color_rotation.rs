// File: chromabot-core/src/services/color_rotation.rs

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use chromabot_common::Error;
use chromabot_common::models::{ChatMessage, Color, ConnectedInfo, Palette};
use chromabot_common::traits::ChatHandler;

use crate::platforms::ColorChanger;
use crate::services::color_picker::pick_next;

/// Rotates the target account's chat color every time that account speaks.
///
/// The current palette index starts at 0 on every launch. The lock around it
/// is held from the pick until the change request resolves, so two messages
/// in quick succession can never both pick against the same stale index.
pub struct ColorRotationService {
    target_login: String,
    palette: Palette,
    changer: Arc<dyn ColorChanger>,
    current_index: Mutex<usize>,
}

impl ColorRotationService {
    pub fn new(target_login: &str, palette: Palette, changer: Arc<dyn ColorChanger>) -> Self {
        Self {
            target_login: target_login.to_lowercase(),
            palette,
            changer,
            current_index: Mutex::new(0),
        }
    }

    pub async fn current_index(&self) -> usize {
        *self.current_index.lock().await
    }

    /// Account id to update, or `None` if the message must be ignored.
    fn qualifying_user_id(&self, message: &ChatMessage) -> Option<u64> {
        if message.is_self {
            return None;
        }
        if !message.sender.login.eq_ignore_ascii_case(&self.target_login) {
            return None;
        }
        if message.sender.user_id.is_none() {
            warn!(
                "Message from {} in {} has no user-id tag, skipping color change",
                self.target_login, message.channel
            );
        }
        message.sender.user_id
    }

    /// Picks the next color and applies it. The index only moves when the
    /// endpoint confirms the change.
    async fn rotate(&self, user_id: u64, channel: &str) {
        let mut current = self.current_index.lock().await;

        let picked: Option<(usize, Color)> = {
            let mut rng = rand::rng();
            pick_next(&self.palette, *current, &mut rng).map(|(idx, color)| (idx, color.clone()))
        };
        let Some((next_index, color)) = picked else {
            return;
        };

        info!(
            "Changing color for user {} in channel {} to {}",
            self.target_login, channel, color
        );

        match self.changer.change_color(user_id, &color).await {
            Ok(()) => {
                debug!("current color index {} => {}", *current, next_index);
                *current = next_index;
                info!("Color changed to {}", color);
            }
            Err(e) => {
                error!("Error changing color: {}", e);
            }
        }
    }
}

#[async_trait]
impl ChatHandler for ColorRotationService {
    async fn on_connected(&self, info: &ConnectedInfo) {
        info!("Connected to {}:{}", info.address, info.port);
        info!("Joined channels: {}", info.channels.join(", "));
    }

    async fn on_message(&self, message: &ChatMessage) -> Result<(), Error> {
        if let Some(user_id) = self.qualifying_user_id(message) {
            self.rotate(user_id, &message.channel).await;
        }
        Ok(())
    }
}
