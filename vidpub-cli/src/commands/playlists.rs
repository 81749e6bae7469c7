//! Playlist reconciliation command

use crate::config::{build_clients, Config};
use anyhow::Result;
use core_manifest::{distinct_series, load_manifests};
use core_pipeline::{PlannedAction, Reconciler};
use core_state::{JsonFileStore, StateManager};
use std::sync::Arc;

pub async fn run(config: &Config, dry_run: bool) -> Result<()> {
    let clients = build_clients(config).await?;
    let (items, _library) = load_manifests(clients.drive.as_ref()).await?;
    let series = distinct_series(&items);

    let store = Arc::new(JsonFileStore::new(config.state_path()));
    let state = StateManager::load(store).await?;

    let mut reconciler = Reconciler::new(clients.youtube, clients.drive, state, series);

    if dry_run {
        let plan = reconciler.plan();
        println!("\n--- DRY RUN ---\n");
        for action in &plan.actions {
            let verb = match action.action {
                PlannedAction::Keep => "keep",
                PlannedAction::RepairCover => "repair cover",
                PlannedAction::Create => "create or adopt",
            };
            println!("  [{}] {} ({})", verb, action.title, action.series_id);
        }
        println!("\n--- END DRY RUN ---\n");
        return Ok(());
    }

    let summary = reconciler.reconcile().await?;
    println!(
        "Playlist sync complete: {} created, {} adopted, {} covers set.",
        summary.created, summary.adopted, summary.covers_set
    );
    Ok(())
}
