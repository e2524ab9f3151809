//! src/platforms/twitch_irc/client.rs

use std::collections::HashMap;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, split};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_native_tls::{TlsConnector, native_tls};
use tracing::{debug, error, info};

use chromabot_common::Error;
use chromabot_common::models::{ChatMessage, ChatSender};

pub const TWITCH_IRC_HOST: &str = "irc.chat.twitch.tv";
pub const TWITCH_IRC_TLS_PORT: u16 = 6697;

/// One raw IRC line split into its parts. Tag values are already unescaped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedIrcLine {
    pub tags: HashMap<String, String>,
    pub prefix: Option<String>,
    /// Uppercased command or numeric reply (`PRIVMSG`, `001`, ...).
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl ParsedIrcLine {
    pub fn parse(line: &str) -> Self {
        let mut rest = line.trim_end_matches(['\r', '\n']);
        let mut parsed = Self::default();

        if let Some(stripped) = rest.strip_prefix('@') {
            let (raw_tags, tail) = stripped.split_once(' ').unwrap_or((stripped, ""));
            parsed.tags = parse_tags(raw_tags);
            rest = tail.trim_start();
        }

        if let Some(stripped) = rest.strip_prefix(':') {
            let (prefix, tail) = stripped.split_once(' ').unwrap_or((stripped, ""));
            parsed.prefix = Some(prefix.to_string());
            rest = tail.trim_start();
        }

        let (command, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));
        parsed.command = command.to_ascii_uppercase();

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                parsed.trailing = Some(trailing.to_string());
                break;
            }
            let (param, tail) = rest.split_once(' ').unwrap_or((rest, ""));
            parsed.params.push(param.to_string());
            rest = tail;
        }

        parsed
    }

    /// Nick part of a `nick!user@host` prefix.
    pub fn nick(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(|p| p.split_once('!').map_or(p, |(nick, _)| nick))
    }

    /// Converts a `PRIVMSG` into a chat message. Anything else yields `None`.
    pub fn to_chat_message(&self) -> Option<ChatMessage> {
        if self.command != "PRIVMSG" {
            return None;
        }
        let channel = self.params.first()?.clone();
        let raw_text = self.trailing.clone().unwrap_or_default();

        let (text, is_action) = match raw_text
            .strip_prefix("\u{1}ACTION ")
            .map(|t| t.strip_suffix('\u{1}').unwrap_or(t))
        {
            Some(action) => (action.to_string(), true),
            None => (raw_text, false),
        };

        let sender = ChatSender {
            login: self.nick().unwrap_or_default().to_lowercase(),
            display_name: self.tags.get("display-name").filter(|d| !d.is_empty()).cloned(),
            user_id: self.tags.get("user-id").and_then(|id| id.parse::<u64>().ok()),
        };

        Some(ChatMessage {
            channel,
            sender,
            text,
            is_action,
            tags: self.tags.clone(),
            is_self: false,
        })
    }
}

/// Events surfaced by the read loop.
#[derive(Debug, Clone, PartialEq)]
pub enum IrcEvent {
    /// `001`: login accepted, channels can be joined.
    Welcome,
    Message(ChatMessage),
    Notice(String),
    /// Server asked us to reconnect.
    Reconnect,
    /// Read loop ended (EOF or read error). Always the last event.
    Closed,
}

/// Low-level IRC client for Twitch chat.
pub struct TwitchIrcClient {
    login: String,

    raw_outgoing: mpsc::UnboundedSender<String>,
    /// Feeds locally generated events (self echoes) into `incoming`.
    local_events: mpsc::UnboundedSender<IrcEvent>,

    /// Stored as an `Option` so the consumer can `take()` it.
    pub incoming: Option<mpsc::UnboundedReceiver<IrcEvent>>,

    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
}

impl TwitchIrcClient {
    /// TCP + TLS connect, then logs in with `password` (`oauth:<token>`).
    pub async fn connect(host: &str, port: u16, login: &str, password: &str) -> Result<Self, Error> {
        let tcp = TcpStream::connect((host, port))
            .await
            .map_err(|e| Error::Platform(format!("TCP connect error: {e}")))?;

        let native_connector = native_tls::TlsConnector::new()
            .map_err(|e| Error::Platform(format!("TlsConnector::new() => {e}")))?;
        let tls_stream = TlsConnector::from(native_connector)
            .connect(host, tcp)
            .await
            .map_err(|e| Error::Platform(format!("TLS connect() => {e}")))?;

        Ok(Self::from_stream(tls_stream, login, password))
    }

    /// Runs the protocol over an already established stream.
    pub fn from_stream<S>(stream: S, login: &str, password: &str) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = split(stream);

        let (tx_outgoing, rx_outgoing) = mpsc::unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = mpsc::unbounded_channel::<IrcEvent>();

        let write_task = tokio::spawn(Self::writer_loop(write_half, rx_outgoing));

        tx_outgoing.send(format!("PASS {}", password)).ok();
        tx_outgoing.send(format!("NICK {}", login.to_lowercase())).ok();
        tx_outgoing.send("CAP REQ :twitch.tv/tags twitch.tv/commands".to_string()).ok();

        let read_task = tokio::spawn(Self::reader_loop(
            read_half,
            tx_incoming.clone(),
            tx_outgoing.clone(),
        ));

        Self {
            login: login.to_lowercase(),
            raw_outgoing: tx_outgoing,
            local_events: tx_incoming,
            incoming: Some(rx_incoming),
            read_task,
            write_task,
        }
    }

    async fn reader_loop<R>(
        read_half: R,
        tx_incoming: mpsc::UnboundedSender<IrcEvent>,
        tx_outgoing: mpsc::UnboundedSender<String>,
    )
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(read_half);
        let mut line_buffer = String::new();

        loop {
            line_buffer.clear();
            match reader.read_line(&mut line_buffer).await {
                Ok(0) => {
                    info!("(TwitchIrcClient) reader_loop => EOF");
                    break;
                }
                Ok(_) => {
                    let line = line_buffer.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("<< {}", line);

                    let parsed = ParsedIrcLine::parse(line);
                    let event = match parsed.command.as_str() {
                        "PING" => {
                            let payload = parsed
                                .trailing
                                .or_else(|| parsed.params.first().cloned())
                                .unwrap_or_default();
                            tx_outgoing.send(format!("PONG :{}", payload)).ok();
                            continue;
                        }
                        "001" => IrcEvent::Welcome,
                        "PRIVMSG" => match parsed.to_chat_message() {
                            Some(msg) => IrcEvent::Message(msg),
                            None => continue,
                        },
                        "NOTICE" => IrcEvent::Notice(parsed.trailing.unwrap_or_default()),
                        "RECONNECT" => IrcEvent::Reconnect,
                        _ => continue,
                    };

                    if tx_incoming.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("(TwitchIrcClient) read error => {:?}", e);
                    break;
                }
            }
        }

        tx_incoming.send(IrcEvent::Closed).ok();
        info!("(TwitchIrcClient) reader_loop ended.");
    }

    async fn writer_loop<W>(write_half: W, mut rx_outgoing: mpsc::UnboundedReceiver<String>)
    where
        W: AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(write_half);

        while let Some(line) = rx_outgoing.recv().await {
            if line.starts_with("PASS ") {
                debug!(">> PASS ***");
            } else {
                debug!(">> {}", line);
            }
            let written = async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\r\n").await?;
                writer.flush().await
            }
            .await;
            if let Err(e) = written {
                error!("(TwitchIrcClient) writer error => {:?}", e);
                break;
            }
        }

        info!("(TwitchIrcClient) writer_loop ended.");
    }

    pub fn send_raw_line(&self, line: &str) {
        self.raw_outgoing.send(line.to_string()).ok();
    }

    /// Joins every channel with a single `JOIN #a,#b`.
    pub fn join_channels(&self, channels: &[String]) {
        if channels.is_empty() {
            return;
        }
        self.send_raw_line(&format!("JOIN {}", channels.join(",")));
    }

    /// Sends a chat line. The server does not echo it back, so a copy is
    /// delivered on `incoming` with `is_self` set.
    pub fn send_privmsg(&self, channel: &str, message: &str) {
        self.send_raw_line(&format!("PRIVMSG {} :{}", channel, message));

        let echo = ChatMessage {
            channel: channel.to_string(),
            sender: ChatSender {
                login: self.login.clone(),
                display_name: None,
                user_id: None,
            },
            text: message.to_string(),
            is_action: false,
            tags: HashMap::new(),
            is_self: true,
        };
        self.local_events.send(IrcEvent::Message(echo)).ok();
    }
}

impl Drop for TwitchIrcClient {
    fn drop(&mut self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

/// Splits `key=value;key2=value2` (leading `@` already removed).
fn parse_tags(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter(|kv| !kv.is_empty())
        .map(|kv| {
            let (key, value) = kv.split_once('=').unwrap_or((kv, ""));
            (key.to_string(), unescape_tag_value(value))
        })
        .collect()
}

/// IRCv3 tag value unescaping (`\s`, `\:`, `\\`, `\r`, `\n`).
fn unescape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
