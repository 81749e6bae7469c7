//! Upload queue commands

use crate::config::{build_clients, Config};
use anyhow::Result;
use core_manifest::load_manifests;
use core_pipeline::{PipelineConfig, Uploader};
use core_state::{JsonFileStore, StateManager};
use std::sync::Arc;

async fn build_uploader(config: &Config) -> Result<Uploader> {
    let clients = build_clients(config).await?;
    let (items, library) = load_manifests(clients.drive.as_ref()).await?;

    let store = Arc::new(JsonFileStore::new(config.state_path()));
    let state = StateManager::load(store).await?;

    Ok(Uploader::new(
        clients.youtube,
        clients.drive,
        state,
        items,
        library,
        config.metadata_options(),
        PipelineConfig::default(),
    ))
}

pub async fn run(config: &Config, item: Option<&str>, dry_run: bool) -> Result<()> {
    let mut uploader = build_uploader(config).await?;

    if dry_run {
        let report = uploader.dry_run(item)?;

        println!("\n--- DRY RUN ---\n");
        for entry in &report.entries {
            println!("  [{}] {}", entry.status, entry.title);
            println!("         Date: {}", entry.date);
            println!("         Video: {}", entry.video);
            println!(
                "         Thumbnail: {}",
                entry.thumbnail.as_deref().unwrap_or("none")
            );
            println!(
                "         Series: {}",
                entry.series.as_deref().unwrap_or("none")
            );
            if let Some(speaker) = &entry.speaker {
                println!("         Speaker: {}", speaker);
            }
            println!();
        }
        println!(
            "Summary: {} to upload, {} already done, {} previously failed",
            report.pending, report.completed, report.failed
        );
        println!("Estimated days to finish: {}", report.estimated_days);
        println!("\n--- END DRY RUN ---\n");
        return Ok(());
    }

    let summary = uploader.run(item).await?;
    println!(
        "\nAll done! Uploaded {} videos with {} errors.",
        summary.uploaded, summary.errors
    );
    Ok(())
}

pub async fn retry_playlist_adds(config: &Config) -> Result<()> {
    let mut uploader = build_uploader(config).await?;
    let summary = uploader.retry_collection_adds().await?;
    println!(
        "Retried {} playlist adds, {} succeeded.",
        summary.attempted, summary.succeeded
    );
    Ok(())
}
