// File: chromabot-core/src/platforms/twitch_helix/client.rs

use std::sync::Arc;
use reqwest::Client as ReqwestClient;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// A small wrapper client for calling Helix endpoints.
///
/// Individual endpoints live under `requests::*` as `impl TwitchHelixClient` blocks.
#[derive(Clone)]
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    bearer_token: String,
    client_id: String,
    base_url: String,
}

impl TwitchHelixClient {
    /// - `bearer_token`: user token of the account whose color is changed, without `oauth:`
    /// - `client_id`: the application the token was issued to
    pub fn new(bearer_token: &str, client_id: &str) -> Self {
        Self {
            http: Arc::new(ReqwestClient::new()),
            bearer_token: bearer_token.to_string(),
            client_id: client_id.to_string(),
            base_url: HELIX_BASE_URL.to_string(),
        }
    }

    /// Point at another Helix-compatible host (trailing `/` is ignored).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, http: ReqwestClient) -> Self {
        self.http = Arc::new(http);
        self
    }

    pub(crate) fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub(crate) fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http_client(&self) -> Arc<ReqwestClient> {
        self.http.clone()
    }
}
