//! Startup configuration.
//!
//! Read once, before any component is built. Every required variable that is
//! unset or blank is collected so the operator sees the whole list at once.

use std::fmt;

use chromabot_common::error::ConfigError;
use chromabot_common::models::Palette;

pub const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
pub const ENV_USERNAME: &str = "TWITCH_USERNAME";
pub const ENV_TOKEN: &str = "TWITCH_TOKEN";
pub const ENV_CHANNELS: &str = "TWITCH_CHANNELS";
pub const ENV_COLORS: &str = "COLORS";

#[derive(Clone)]
pub struct BotConfig {
    /// API client id sent as `Client-ID`.
    pub client_id: String,
    /// Lowercase login of the account whose color is rotated. Also the chat identity.
    pub login: String,
    /// Bare token, without any `oauth:` prefix.
    pub token: String,
    /// Channel names with a leading `#`, lowercase, in configured order.
    pub channels: Vec<String>,
    pub palette: Palette,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any name -> value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let client_id = get(ENV_CLIENT_ID);
        let login = get(ENV_USERNAME).map(|l| l.to_lowercase());
        let token = get(ENV_TOKEN)
            .map(|t| strip_oauth_prefix(&t).to_string())
            .filter(|t| !t.is_empty());
        let channels = get(ENV_CHANNELS)
            .map(|csv| parse_channels(&csv))
            .filter(|list| !list.is_empty());

        let (client_id, login, token, channels) = match (client_id, login, token, channels) {
            (Some(client_id), Some(login), Some(token), Some(channels)) => {
                (client_id, login, token, channels)
            }
            (client_id, login, token, channels) => {
                let missing = [
                    (ENV_CLIENT_ID, client_id.is_none()),
                    (ENV_USERNAME, login.is_none()),
                    (ENV_TOKEN, token.is_none()),
                    (ENV_CHANNELS, channels.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(ConfigError::Missing(missing));
            }
        };

        let palette = match get(ENV_COLORS) {
            Some(csv) => Palette::from_csv(&csv)?,
            None => Palette::default(),
        };

        Ok(Self { client_id, login, token, channels, palette })
    }

    /// Password line value for the chat login.
    pub fn irc_password(&self) -> String {
        format!("oauth:{}", self.token)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("client_id", &self.client_id)
            .field("login", &self.login)
            .field("token", &"<redacted>")
            .field("channels", &self.channels)
            .field("palette", &self.palette)
            .finish()
    }
}

fn strip_oauth_prefix(token: &str) -> &str {
    token.strip_prefix("oauth:").unwrap_or(token)
}

fn parse_channels(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != "#")
        .map(|c| format!("#{}", c.trim_start_matches('#').to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn full() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_CLIENT_ID, "abc123"),
            (ENV_USERNAME, "BotUser"),
            (ENV_TOKEN, "oauth:secret"),
            (ENV_CHANNELS, " chan , #Other,, "),
        ]
    }

    #[test]
    fn loads_and_normalizes() {
        let cfg = BotConfig::from_lookup(lookup(&full())).unwrap();
        assert_eq!(cfg.client_id, "abc123");
        assert_eq!(cfg.login, "botuser");
        assert_eq!(cfg.token, "secret");
        assert_eq!(cfg.irc_password(), "oauth:secret");
        assert_eq!(cfg.channels, vec!["#chan", "#other"]);
        assert_eq!(cfg.palette, Palette::default());
    }

    #[test]
    fn reports_every_missing_name_in_order() {
        let err = BotConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![ENV_CLIENT_ID, ENV_USERNAME, ENV_TOKEN, ENV_CHANNELS])
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut pairs = full();
        pairs[2] = (ENV_TOKEN, "   ");
        pairs[3] = (ENV_CHANNELS, " , ,");
        let err = BotConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![ENV_TOKEN, ENV_CHANNELS]));
    }

    #[test]
    fn bare_oauth_prefix_is_missing_token() {
        let mut pairs = full();
        pairs[2] = (ENV_TOKEN, "oauth:");
        let err = BotConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![ENV_TOKEN]));
    }

    #[test]
    fn palette_override() {
        let mut pairs = full();
        pairs.push((ENV_COLORS, "#FF0000, blue"));
        let cfg = BotConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.palette.len(), 2);
        assert_eq!(cfg.palette[1].as_str(), "blue");
    }

    #[test]
    fn palette_override_is_validated() {
        let mut pairs = full();
        pairs.push((ENV_COLORS, "#FF0000"));
        assert_eq!(
            BotConfig::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::PaletteTooSmall(1)
        );

        let mut pairs = full();
        pairs.push((ENV_COLORS, "#FF0000,rainbow"));
        assert_eq!(
            BotConfig::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::InvalidColor("rainbow".into())
        );
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = BotConfig::from_lookup(lookup(&full())).unwrap();
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
