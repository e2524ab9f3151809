use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use chromabot_common::error::ConfigError;
use chromabot_core::BotConfig;
use chromabot_core::platforms::twitch_helix::TwitchHelixClient;
use chromabot_core::platforms::twitch_irc::TwitchChatWatcher;
use chromabot_core::services::ColorRotationService;

#[derive(Parser, Debug, Clone)]
#[command(name = "chromabot")]
#[command(author, version, about = "Rotates a Twitch account's chat name color every time it speaks")]
struct Args {}

/// Used when `RUST_LOG` is unset or blank.
const DEFAULT_LOG_FILTER: &str = "chromabot_core=info,chromabot_server=info,chromabot=info";

fn log_filter(rust_log: Option<String>) -> EnvFilter {
    match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(DEFAULT_LOG_FILTER),
    }
}

fn init_tracing() {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _args = Args::parse();
    dotenv::dotenv().ok();
    init_tracing();

    info!("Starting Twitch Name Color Changer...");

    let config = match BotConfig::from_env() {
        Ok(cfg) => cfg,
        Err(ConfigError::Missing(names)) => {
            eprintln!("Please set the following environment variables:");
            eprintln!("{}", names.join(", "));
            return ExitCode::from(1);
        }
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    info!("Loaded configuration: {:?}", config);

    let helix = TwitchHelixClient::new(&config.token, &config.client_id);
    let service = Arc::new(ColorRotationService::new(
        &config.login,
        config.palette.clone(),
        Arc::new(helix),
    ));
    let watcher = TwitchChatWatcher::from_config(&config);

    tokio::select! {
        _ = watcher.run(service) => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for Ctrl-C: {e}");
            }
            info!("Ctrl-C received, shutting down.");
        }
    }

    info!("Goodbye!");
    ExitCode::SUCCESS
}
