// src/lib.rs

pub mod config;
pub mod platforms;
pub mod services;

pub use chromabot_common::error::Error;
pub use config::BotConfig;
