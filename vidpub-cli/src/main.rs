//! Vidpub CLI
//!
//! Command-line interface for the quota-aware video publishing pipeline.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{handle_command, Commands};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vidpub")]
#[command(about = "Publish a manifest of videos under a daily API quota", long_about = None)]
struct Cli {
    /// Directory holding the state document, tokens, and reports
    #[arg(long, env = "VIDPUB_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// OAuth client ID
    #[arg(long, env = "VIDPUB_CLIENT_ID")]
    client_id: String,

    /// OAuth client secret
    #[arg(long, env = "VIDPUB_CLIENT_SECRET")]
    client_secret: String,

    /// Shared drive holding the media library
    #[arg(long, env = "VIDPUB_SHARED_DRIVE_ID")]
    shared_drive_id: String,

    /// Text appended to every video description
    #[arg(long, env = "VIDPUB_DESCRIPTION_FOOTER")]
    description_footer: Option<String>,

    /// Comma-separated tags applied to every video
    #[arg(long, env = "VIDPUB_BASE_TAGS")]
    base_tags: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config {
        data_dir: cli.data_dir,
        client_id: cli.client_id,
        client_secret: cli.client_secret,
        shared_drive_id: cli.shared_drive_id,
        description_footer: cli.description_footer,
        base_tags: cli
            .base_tags
            .map(|tags| {
                tags.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    handle_command(cli.command, &config).await
}
