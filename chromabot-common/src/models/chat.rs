// File: chromabot-common/src/models/chat.rs

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Who sent a chat line, as far as the IRC prefix and tags tell us.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSender {
    /// Lowercase login taken from the `nick!user@host` prefix.
    pub login: String,
    pub display_name: Option<String>,
    /// Numeric account id from the `user-id` tag, when present and numeric.
    pub user_id: Option<u64>,
}

/// One inbound chat line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub channel: String,
    pub sender: ChatSender,
    pub text: String,
    /// `/me` line; `text` has the CTCP wrapper removed.
    pub is_action: bool,
    pub tags: HashMap<String, String>,
    /// Set for lines this process sent itself.
    pub is_self: bool,
}

/// Emitted once the chat server has accepted our login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedInfo {
    pub address: String,
    pub port: u16,
    pub channels: Vec<String>,
}
