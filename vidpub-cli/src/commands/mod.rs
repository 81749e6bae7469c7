mod auth;
mod playlists;
mod report;
mod upload;

use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the one-time OAuth consent flow and store tokens
    Auth,
    /// Run or resume the upload queue
    Upload {
        /// Process only this manifest item
        #[arg(long)]
        item: Option<String>,
        /// Report what would be uploaded without doing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Reconcile series playlists (create, adopt, set covers)
    Playlists {
        /// Report intended actions without remote calls
        #[arg(long)]
        dry_run: bool,
    },
    /// Re-attempt playlist adds for completed items that missed them
    RetryPlaylistAdds,
    /// Show quota usage and job counts
    Status,
    /// Generate the JSON run report
    Report,
}

pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Auth => auth::run(config).await,
        Commands::Upload { item, dry_run } => upload::run(config, item.as_deref(), dry_run).await,
        Commands::Playlists { dry_run } => playlists::run(config, dry_run).await,
        Commands::RetryPlaylistAdds => upload::retry_playlist_adds(config).await,
        Commands::Status => report::status(config).await,
        Commands::Report => report::generate(config).await,
    }
}
