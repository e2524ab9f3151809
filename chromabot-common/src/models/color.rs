// File: chromabot-common/src/models/color.rs

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named colors accepted by the chat color endpoint for every account.
pub const NAMED_COLORS: [&str; 15] = [
    "blue",
    "blue_violet",
    "cadet_blue",
    "chocolate",
    "coral",
    "dodger_blue",
    "firebrick",
    "golden_rod",
    "green",
    "hot_pink",
    "orange_red",
    "red",
    "sea_green",
    "spring_green",
    "yellow_green",
];

/// Hex equivalents of the named colors, in the order the bot has always shipped them.
pub const DEFAULT_PALETTE: [&str; 15] = [
    "#FF0000",
    "#0000FF",
    "#00FF00",
    "#B22222",
    "#FF7F50",
    "#9ACD32",
    "#FF4500",
    "#2E8B57",
    "#DAA520",
    "#D2691E",
    "#5F9EA0",
    "#1E90FF",
    "#FF69B4",
    "#8A2BE2",
    "#00FF7F",
];

/// A chat display color: either `#RRGGBB` or one of [`NAMED_COLORS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value = raw.trim();
        if is_hex_rgb(value) {
            return Ok(Self(value.to_string()));
        }
        let named = value.to_ascii_lowercase();
        if NAMED_COLORS.contains(&named.as_str()) {
            Ok(Self(named))
        } else {
            Err(ConfigError::InvalidColor(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_hex_rgb(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.0
    }
}

/// Ordered, immutable set of colors to rotate through.
///
/// Always holds at least two colors, so there is always a color other than
/// the current one to switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, ConfigError> {
        if colors.len() < 2 {
            return Err(ConfigError::PaletteTooSmall(colors.len()));
        }
        Ok(Self(colors))
    }

    /// Parses a comma-separated list such as the `COLORS` variable. Blank entries are skipped.
    pub fn from_csv(csv: &str) -> Result<Self, ConfigError> {
        let colors = csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Color::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.iter().map(|c| Color(c.to_string())).collect())
    }
}

impl Deref for Palette {
    type Target = [Color];
    fn deref(&self) -> &[Color] {
        &self.0
    }
}
