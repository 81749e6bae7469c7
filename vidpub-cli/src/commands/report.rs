//! Status and report commands

use crate::config::{build_clients, Config};
use anyhow::Result;
use core_manifest::load_manifests;
use core_pipeline::{generate_report, write_report};
use core_state::{JsonFileStore, StateStore};

pub async fn status(config: &Config) -> Result<()> {
    let clients = build_clients(config).await?;
    let (items, library) = load_manifests(clients.drive.as_ref()).await?;

    let store = JsonFileStore::new(config.state_path());
    let mut root = store.load().await?;

    let quota = core_quota::status(&mut root.quota);
    println!("Quota:");
    println!(
        "  {} / {} units used today ({} remaining)",
        quota.used, quota.daily_quota, quota.remaining
    );
    println!("  ~{} full videos remaining today", quota.videos_remaining);
    println!(
        "  Resets at midnight Pacific (in {:.1} hours)",
        core_quota::time_until_reset().num_minutes() as f64 / 60.0
    );

    let report = generate_report(&items, &library, &root);
    println!("\nVideos:");
    println!("  {} total in manifest", report.summary.total_videos);
    println!("  {} uploaded", report.summary.uploaded);
    println!("  {} failed", report.summary.failed);
    println!("  {} pending", report.summary.pending);
    println!("  {} playlists bound", report.summary.playlists);
    Ok(())
}

pub async fn generate(config: &Config) -> Result<()> {
    let clients = build_clients(config).await?;
    let (items, library) = load_manifests(clients.drive.as_ref()).await?;

    let store = JsonFileStore::new(config.state_path());
    let root = store.load().await?;

    let report = generate_report(&items, &library, &root);
    let path = config.report_path();
    write_report(&report, &path).await?;
    println!("Report written to {}", path.display());
    Ok(())
}
