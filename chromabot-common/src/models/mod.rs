// File: chromabot-common/src/models/mod.rs
pub mod chat;
pub mod color;

pub use chat::{ChatMessage, ChatSender, ConnectedInfo};
pub use color::{Color, Palette, DEFAULT_PALETTE, NAMED_COLORS};
