use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use lens_gateway::{Config, Daemon};

/// Lens - session gateway for a voice-controlled wearable camera
#[derive(Parser)]
#[command(name = "lens", version, about)]
struct Cli {
    /// Path to config file (default: ~/.config/lens/gateway/config.toml)
    #[arg(short, long, env = "LENS_CONFIG")]
    config: Option<PathBuf>,

    /// Port for the webview API
    #[arg(long, env = "LENS_PORT")]
    port: Option<u16>,

    /// Base URL of the hint/OCR backend
    #[arg(long, env = "LENS_BACKEND_URL")]
    backend_url: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,lens_gateway=info",
        1 => "info,lens_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_ref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(backend_url) = cli.backend_url {
        config.backend_url = backend_url;
    }

    // The device runtime drives this channel; standalone the gateway just
    // serves the webview API until interrupted. The sender stays alive so
    // the event loop does not see a closed stream.
    let (_device_tx, device_rx) = mpsc::channel(64);

    let daemon = Daemon::new(config);
    daemon.run(device_rx).await?;

    Ok(())
}
