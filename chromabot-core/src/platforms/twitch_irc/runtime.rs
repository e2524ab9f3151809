//! src/platforms/twitch_irc/runtime.rs
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use chromabot_common::models::ConnectedInfo;
use chromabot_common::traits::ChatHandler;

use crate::config::BotConfig;
use super::client::{IrcEvent, TWITCH_IRC_HOST, TWITCH_IRC_TLS_PORT, TwitchIrcClient};

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Why a single connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    Closed,
    ServerRequested,
}

/// Keeps one chat connection alive for a fixed set of channels and feeds
/// every event to a [`ChatHandler`].
pub struct TwitchChatWatcher {
    login: String,
    password: String,
    channels: Vec<String>,
    host: String,
    port: u16,
    reconnect_delay: Duration,
}

impl TwitchChatWatcher {
    pub fn new(login: &str, password: &str, channels: Vec<String>) -> Self {
        Self {
            login: login.to_lowercase(),
            password: password.to_string(),
            channels,
            host: TWITCH_IRC_HOST.to_string(),
            port: TWITCH_IRC_TLS_PORT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.login, &config.irc_password(), config.channels.clone())
    }

    pub fn with_server(mut self, host: &str, port: u16) -> Self {
        self.host = host.to_string();
        self.port = port;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Connects and reconnects forever. Only returns if the task is cancelled.
    pub async fn run(&self, handler: Arc<dyn ChatHandler>) {
        loop {
            info!("(TwitchChatWatcher) connecting to {}:{} as {}", self.host, self.port, self.login);
            match TwitchIrcClient::connect(&self.host, self.port, &self.login, &self.password).await {
                Ok(client) => {
                    let reason = self.drive(client, handler.as_ref()).await;
                    warn!("(TwitchChatWatcher) disconnected => {:?}", reason);
                }
                Err(e) => {
                    error!("(TwitchChatWatcher) connect failed => {}", e);
                }
            }
            info!("(TwitchChatWatcher) reconnecting in {:?}", self.reconnect_delay);
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Pumps one connection until it closes. Messages are handed over one at
    /// a time; the next is not read until the handler has finished.
    pub async fn drive(&self, mut client: TwitchIrcClient, handler: &dyn ChatHandler) -> Disconnect {
        let Some(mut incoming) = client.incoming.take() else {
            error!("(TwitchChatWatcher) client has no incoming channel");
            return Disconnect::Closed;
        };

        while let Some(event) = incoming.recv().await {
            match event {
                IrcEvent::Welcome => {
                    client.join_channels(&self.channels);
                    let info = ConnectedInfo {
                        address: self.host.clone(),
                        port: self.port,
                        channels: self.channels.clone(),
                    };
                    handler.on_connected(&info).await;
                }
                IrcEvent::Message(message) => {
                    if let Err(e) = handler.on_message(&message).await {
                        error!("Unexpected error: {}", e);
                    }
                }
                IrcEvent::Notice(text) => {
                    warn!("(TwitchChatWatcher) NOTICE => {}", text);
                }
                IrcEvent::Reconnect => return Disconnect::ServerRequested,
                IrcEvent::Closed => return Disconnect::Closed,
            }
        }

        Disconnect::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chromabot_common::Error;
    use chromabot_common::models::ChatMessage;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::sync::Mutex;
    use tokio::time::timeout;

    #[derive(Default)]
    struct Recorder {
        connected: Mutex<Vec<ConnectedInfo>>,
        messages: Mutex<Vec<ChatMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatHandler for Recorder {
        async fn on_connected(&self, info: &ConnectedInfo) {
            self.connected.lock().await.push(info.clone());
        }

        async fn on_message(&self, message: &ChatMessage) -> Result<(), Error> {
            self.messages.lock().await.push(message.clone());
            if self.fail {
                return Err(Error::Platform("handler exploded".into()));
            }
            Ok(())
        }
    }

    fn watcher() -> TwitchChatWatcher {
        TwitchChatWatcher::new("BotUser", "oauth:tok", vec!["#chan".into(), "#other".into()])
    }

    /// Plays a chat server: handshake, welcome, `lines`, then hangs up.
    /// Returns everything the client sent.
    async fn fake_server(server_side: tokio::io::DuplexStream, lines: Vec<&'static str>) -> Vec<String> {
        let (server_read, mut server_write) = tokio::io::split(server_side);
        let mut reader = BufReader::new(server_read).lines();
        let mut seen = Vec::new();

        for _ in 0..3 {
            seen.push(reader.next_line().await.unwrap().unwrap());
        }
        server_write.write_all(b":tmi.twitch.tv 001 botuser :Welcome, GLHF!\r\n").await.unwrap();
        seen.push(reader.next_line().await.unwrap().unwrap());

        for line in lines {
            server_write.write_all(line.as_bytes()).await.unwrap();
            server_write.write_all(b"\r\n").await.unwrap();
        }
        seen
    }

    #[tokio::test]
    async fn joins_on_welcome_and_delivers_messages_in_order() {
        let (client_side, server_side) = tokio::io::duplex(8192);
        let client = TwitchIrcClient::from_stream(client_side, "botuser", "oauth:tok");
        let server = tokio::spawn(fake_server(
            server_side,
            vec![
                "@user-id=12345 :botuser!botuser@botuser.tmi.twitch.tv PRIVMSG #chan :one",
                ":tmi.twitch.tv NOTICE * :Improperly formatted auth",
                ":viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #other :two",
            ],
        ));

        let recorder = Recorder::default();
        let w = watcher();
        let reason = timeout(Duration::from_secs(5), w.drive(client, &recorder)).await.unwrap();
        assert_eq!(reason, Disconnect::Closed);

        let seen = server.await.unwrap();
        assert_eq!(seen[0], "PASS oauth:tok");
        assert_eq!(seen[1], "NICK botuser");
        assert_eq!(seen[3], "JOIN #chan,#other");

        let connected = recorder.connected.lock().await;
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].address, TWITCH_IRC_HOST);
        assert_eq!(connected[0].port, TWITCH_IRC_TLS_PORT);
        assert_eq!(connected[0].channels, vec!["#chan", "#other"]);

        let messages = recorder.messages.lock().await;
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(messages[0].sender.user_id, Some(12345));
        assert_eq!(messages[1].channel, "#other");
    }

    #[tokio::test]
    async fn handler_errors_do_not_stop_the_connection() {
        let (client_side, server_side) = tokio::io::duplex(8192);
        let client = TwitchIrcClient::from_stream(client_side, "botuser", "oauth:tok");
        let server = tokio::spawn(fake_server(
            server_side,
            vec![
                ":a!a@a PRIVMSG #chan :first",
                ":b!b@b PRIVMSG #chan :second",
            ],
        ));

        let recorder = Recorder { fail: true, ..Default::default() };
        let w = watcher();
        timeout(Duration::from_secs(5), w.drive(client, &recorder)).await.unwrap();
        server.await.unwrap();

        assert_eq!(recorder.messages.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn server_reconnect_ends_the_connection() {
        let (client_side, server_side) = tokio::io::duplex(8192);
        let client = TwitchIrcClient::from_stream(client_side, "botuser", "oauth:tok");
        let server = tokio::spawn(fake_server(server_side, vec![":tmi.twitch.tv RECONNECT"]));

        let recorder = Recorder::default();
        let w = watcher();
        let reason = timeout(Duration::from_secs(5), w.drive(client, &recorder)).await.unwrap();
        assert_eq!(reason, Disconnect::ServerRequested);
        server.await.unwrap();
    }

    #[test]
    fn from_config_uses_oauth_password_and_channels() {
        let cfg = BotConfig::from_lookup(|name| match name {
            crate::config::ENV_CLIENT_ID => Some("cid".into()),
            crate::config::ENV_USERNAME => Some("BotUser".into()),
            crate::config::ENV_TOKEN => Some("tok".into()),
            crate::config::ENV_CHANNELS => Some("chan".into()),
            _ => None,
        })
        .unwrap();
        let w = TwitchChatWatcher::from_config(&cfg);
        assert_eq!(w.channels(), ["#chan".to_string()]);
        assert_eq!(w.password, "oauth:tok");
        assert_eq!(w.login, "botuser");
    }
}
