//! Playlist reconciler
//!
//! Establishes a 1:1 mapping from each series to a remote playlist,
//! idempotently: local state wins, then adoption of an existing remote
//! playlist by title, then creation. Cover images are best-effort; a run
//! that fails a cover only leaves `thumbnail_set` false for a later repair
//! pass.
//!
//! The remote title index exists to survive lost local state: when the
//! state document is gone but the account still has last month's playlists,
//! they are adopted instead of duplicated.

use crate::cover::{crop_to_square, COVER_CONTENT_TYPE};
use crate::error::Result;
use crate::retry::with_retry;
use chrono::Utc;
use core_manifest::Series;
use core_quota::{can_afford, charge, LIST_COST, PLAYLIST_IMAGE_COST, PLAYLIST_INSERT_COST};
use core_state::{CollectionState, StateManager};
use platform_traits::{AssetSource, VideoPlatform};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Aggregate outcome of a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: u64,
    pub adopted: u64,
    pub covers_set: u64,
}

/// Intended action for one series, derived from local state only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// Already bound and cover applied; nothing to do
    Keep,
    /// Bound, but the cover still needs to be applied
    RepairCover,
    /// No local binding; a run would adopt or create
    Create,
}

/// One row of a dry-run plan
#[derive(Debug, Clone)]
pub struct PlannedSeries {
    pub series_id: String,
    pub title: String,
    pub action: PlannedAction,
    pub has_cover_source: bool,
}

/// Dry-run output: intended actions, no remote calls, no writes
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    pub actions: Vec<PlannedSeries>,
}

pub struct Reconciler {
    platform: Arc<dyn VideoPlatform>,
    assets: Arc<dyn AssetSource>,
    state: StateManager,
    series: Vec<Series>,
}

impl Reconciler {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        assets: Arc<dyn AssetSource>,
        state: StateManager,
        series: Vec<Series>,
    ) -> Self {
        Self {
            platform,
            assets,
            state,
            series,
        }
    }

    /// Hand the state manager back after a run
    pub fn into_state(self) -> StateManager {
        self.state
    }

    /// Page through the account's remote playlists building a title → id
    /// index. Each page costs quota; listing stops early (with a warning)
    /// when a page becomes unaffordable.
    async fn build_title_index(&mut self) -> Result<HashMap<String, String>> {
        let mut index = HashMap::new();
        let mut page_token: Option<String> = None;

        loop {
            if !can_afford(self.state.quota(), LIST_COST) {
                warn!("Not enough quota to finish listing remote playlists, stopping early");
                break;
            }

            let platform = Arc::clone(&self.platform);
            let token = page_token.clone();
            let page = with_retry(
                || platform.list_playlists(token.as_deref()),
                "list remote playlists",
            )
            .await?;
            self.state.update_quota(|q| charge(q, LIST_COST)).await?;

            for playlist in page.playlists {
                index.entry(playlist.title).or_insert(playlist.id);
            }

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(titles = index.len(), "Remote playlist index built");
        Ok(index)
    }

    /// Bind every series to exactly one remote playlist.
    pub async fn reconcile(&mut self) -> Result<ReconcileSummary> {
        let title_index = self.build_title_index().await?;
        let mut summary = ReconcileSummary::default();

        for series in self.series.clone() {
            if let Some(collection) = self.state.collection(&series.id) {
                debug!(
                    series_id = %series.id,
                    title = %collection.title,
                    "Playlist already exists"
                );
                if !collection.thumbnail_set {
                    let playlist_id = collection.remote_playlist_id.clone();
                    if self.try_set_cover(&series, &playlist_id).await {
                        self.state
                            .update_collection(&series.id, |c| c.thumbnail_set = true)
                            .await?;
                        summary.covers_set += 1;
                    }
                }
                continue;
            }

            if let Some(remote_id) = title_index.get(&series.title).cloned() {
                info!(
                    series_id = %series.id,
                    title = %series.title,
                    playlist_id = %remote_id,
                    "Adopting existing remote playlist"
                );
                // the binding is persisted before the cover attempt, so a
                // crash mid-cover can never lead to a duplicate
                self.state
                    .set_collection(
                        &series.id,
                        CollectionState {
                            remote_playlist_id: remote_id.clone(),
                            title: series.title.clone(),
                            created_at: Some(Utc::now().to_rfc3339()),
                            thumbnail_set: false,
                        },
                    )
                    .await?;
                summary.adopted += 1;

                if self.try_set_cover(&series, &remote_id).await {
                    self.state
                        .update_collection(&series.id, |c| c.thumbnail_set = true)
                        .await?;
                    summary.covers_set += 1;
                }
                continue;
            }

            if !can_afford(self.state.quota(), PLAYLIST_INSERT_COST) {
                warn!("Not enough quota to create more playlists today");
                break;
            }

            info!(title = %series.title, "Creating playlist");
            let platform = Arc::clone(&self.platform);
            let playlist_id = with_retry(
                || platform.create_playlist(&series.title, &series.description),
                &format!("create playlist \"{}\"", series.title),
            )
            .await?;
            self.state
                .update_quota(|q| charge(q, PLAYLIST_INSERT_COST))
                .await?;

            let cover_set = self.try_set_cover(&series, &playlist_id).await;
            if cover_set {
                summary.covers_set += 1;
            }

            self.state
                .set_collection(
                    &series.id,
                    CollectionState {
                        remote_playlist_id: playlist_id.clone(),
                        title: series.title.clone(),
                        created_at: Some(Utc::now().to_rfc3339()),
                        thumbnail_set: cover_set,
                    },
                )
                .await?;
            summary.created += 1;
            info!(playlist_id = %playlist_id, title = %series.title, "Playlist created");
        }

        info!(
            total = self.state.root().collections.len(),
            created = summary.created,
            adopted = summary.adopted,
            covers_set = summary.covers_set,
            "Playlist sync complete"
        );
        Ok(summary)
    }

    /// Cover sub-step. Best-effort: any failure logs, records nothing set,
    /// and a later run repairs exactly the collections still unset.
    async fn try_set_cover(&mut self, series: &Series, playlist_id: &str) -> bool {
        let Some(image) = series.image.clone() else {
            debug!(series_id = %series.id, "No cover image for series, skipping");
            return false;
        };

        if !can_afford(self.state.quota(), PLAYLIST_IMAGE_COST) {
            warn!(series_id = %series.id, "Not enough quota to set playlist cover today");
            return false;
        }

        match self.set_cover_inner(series, &image, playlist_id).await {
            Ok(()) => {
                info!(playlist_id, series_id = %series.id, "Playlist cover set");
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    series_id = %series.id,
                    image = %image,
                    "Failed to set playlist cover"
                );
                false
            }
        }
    }

    async fn set_cover_inner(
        &mut self,
        series: &Series,
        image: &str,
        playlist_id: &str,
    ) -> Result<()> {
        let buffer = self.assets.fetch_buffer(&series.folder, image).await?;
        let cover = crop_to_square(&buffer.bytes)?;
        let platform = Arc::clone(&self.platform);

        with_retry(
            || platform.set_playlist_cover(playlist_id, cover.clone(), COVER_CONTENT_TYPE),
            &format!("set cover for playlist \"{}\"", series.title),
        )
        .await?;

        self.state
            .update_quota(|q| charge(q, PLAYLIST_IMAGE_COST))
            .await?;
        Ok(())
    }

    /// Intended actions derived from local state only; performs no remote
    /// calls and no writes.
    pub fn plan(&self) -> ReconcilePlan {
        let actions = self
            .series
            .iter()
            .map(|series| {
                let action = match self.state.collection(&series.id) {
                    Some(collection) if collection.thumbnail_set => PlannedAction::Keep,
                    Some(_) if series.image.is_some() => PlannedAction::RepairCover,
                    Some(_) => PlannedAction::Keep,
                    None => PlannedAction::Create,
                };
                PlannedSeries {
                    series_id: series.id.clone(),
                    title: series.title.clone(),
                    action,
                    has_cover_source: series.image.is_some(),
                }
            })
            .collect();
        ReconcilePlan { actions }
    }
}
