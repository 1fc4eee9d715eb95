//! Lenslate - image text extraction and translation service.
//!
//! Accepts JPEG uploads over HTTP, extracts text with a set of OCR
//! strategies, and translates the best reading.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lenslate::config::Settings;
use lenslate::server;

#[derive(Parser)]
#[command(name = "lenslate")]
#[command(about = "Image text extraction and translation service")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Upload directory (overrides config)
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let default_filter = if cli.verbose {
        "lenslate=debug"
    } else {
        "lenslate=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(dir) = cli.upload_dir {
        settings.upload_dir = dir;
    }

    server::serve(&settings).await
}
