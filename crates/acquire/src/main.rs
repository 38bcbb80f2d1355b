use std::process::ExitCode;

use acquire::{Client, ClientMode};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(name = "acquire", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct App {
    /// Source URL, `getter::url`, or local path
    src: String,
    /// Destination file or directory
    dst: String,
    /// Get mode (any, file, dir)
    #[arg(short, long, default_value = "any")]
    mode: ClientMode,
}

fn run(app: App) -> anyhow::Result<()> {
    let pwd = std::env::current_dir().context("error getting working directory")?;

    Client::new(app.src, app.dst)?
        .pwd(pwd)
        .mode(app.mode)
        .get()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(App::parse()) {
        Ok(()) => {
            info!("Success!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error downloading: {e:#}");
            ExitCode::FAILURE
        }
    }
}
