// chromabot-common/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Color change error: {0}")]
    ColorChange(#[from] ColorChangeError),
}

/// Problems found while loading configuration at startup. All of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Names of every required variable that was unset or blank.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid color '{0}' (expected #RRGGBB or a named chat color)")]
    InvalidColor(String),

    #[error("palette needs at least two colors, got {0}")]
    PaletteTooSmall(usize),
}

/// Failure of a single color-change request. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorChangeError {
    /// The endpoint answered with something other than 204 No Content.
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    /// The request never produced a usable response (connect failure, reset, bad TLS...).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ColorChangeError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ColorChangeError::Status { status, .. } => Some(*status),
            ColorChangeError::Transport(_) => None,
        }
    }
}
