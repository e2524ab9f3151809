pub mod client;
pub mod runtime;

pub use client::{IrcEvent, ParsedIrcLine, TwitchIrcClient};
pub use runtime::{Disconnect, TwitchChatWatcher};
