//! Helix ⟶ PUT /chat/color
//! Changes the chat display color of one account.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use chromabot_common::error::ColorChangeError;
use chromabot_common::models::Color;

use crate::platforms::ColorChanger;
use crate::platforms::twitch_helix::client::TwitchHelixClient;

/// JSON body sent to Helix.
#[derive(Debug, Serialize)]
struct ChatColorRequest<'a> {
    user_id: u64,
    color: &'a Color,
}

impl TwitchHelixClient {
    /// Only `204 No Content` counts as success. No retry is attempted.
    pub async fn update_chat_color(
        &self,
        user_id: u64,
        color: &Color,
    ) -> Result<(), ColorChangeError> {
        let url = format!("{}/chat/color", self.base_url());
        let body = ChatColorRequest { user_id, color };

        let resp = self
            .http_client()
            .put(&url)
            .header("Client-ID", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| ColorChangeError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            debug!("update_chat_color: user_id={} color={} => 204", user_id, color);
            return Ok(());
        }

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                debug!("update_chat_color: HTTP {} body unreadable => {}", status, e);
                String::new()
            }
        };
        Err(ColorChangeError::Status { status: status.as_u16(), body: text })
    }
}

#[async_trait]
impl ColorChanger for TwitchHelixClient {
    async fn change_color(&self, user_id: u64, color: &Color) -> Result<(), ColorChangeError> {
        self.update_chat_color(user_id, color).await
    }
}
