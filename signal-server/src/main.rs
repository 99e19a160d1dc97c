//! Signal Server - HTTP relay for the Signal sender executable
//!
//! Loads `settings.json` (or defaults), then serves until SIGTERM or Ctrl-C.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use signal_server::{server, settings, RuntimeMode};

#[derive(Parser)]
#[command(name = "signal-server")]
#[command(about = "Relay HTTP requests to the local Signal sender executable")]
struct Cli {
    /// Path to settings.json (default: ./, next to the binary, then ~/.config/signal-relay/)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Runtime mode; development disables the IP allow-list
    #[arg(long, env = "SIGNAL_RELAY_MODE", value_enum, default_value_t = RuntimeMode::Production)]
    mode: RuntimeMode,

    /// Override the port from settings
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    signal_common::init_tracing("signal_server")?;

    let cli = Cli::parse();

    let mut config = settings::load_or_default(cli.config.as_deref());
    if let Some(port) = cli.port {
        config.port = port;
    }

    server::serve(config, cli.mode).await
}
