// File: src/platforms/mod.rs

use async_trait::async_trait;
use chromabot_common::error::ColorChangeError;
use chromabot_common::models::Color;

/// Outbound seam for changing an account's chat display color.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ColorChanger: Send + Sync {
    async fn change_color(&self, user_id: u64, color: &Color) -> Result<(), ColorChangeError>;
}

pub mod twitch_helix;
pub mod twitch_irc;
