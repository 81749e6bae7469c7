//! Quota state and ledger operations
//!
//! Costs are the platform's published per-operation charges. The reset
//! boundary is midnight in the platform's accounting zone, not local time.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Total cost units available per calendar day
pub const DAILY_QUOTA: u64 = 10_000;
/// Cost of one primary video insert
pub const UPLOAD_COST: u64 = 1_600;
/// Cost of one thumbnail set
pub const THUMBNAIL_COST: u64 = 50;
/// Cost of one playlist insert
pub const PLAYLIST_INSERT_COST: u64 = 50;
/// Cost of one playlist-item insert
pub const PLAYLIST_ITEM_COST: u64 = 50;
/// Cost of one playlist cover-image set
pub const PLAYLIST_IMAGE_COST: u64 = 50;
/// Cost of one list-page request
pub const LIST_COST: u64 = 1;
/// Cost of one fully processed item (upload + thumbnail + playlist add)
pub const VIDEO_TOTAL_COST: u64 = UPLOAD_COST + THUMBNAIL_COST + PLAYLIST_ITEM_COST;

/// The platform accounts quota against Pacific time regardless of where the
/// uploader runs.
const RESET_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Persisted quota counters, embedded in the durable root state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Cost units spent since the last reset
    #[serde(default)]
    pub used_today: u64,
    /// Calendar date (`YYYY-MM-DD` in the reset zone) the counter belongs to
    #[serde(default)]
    pub reset_date: Option<String>,
}

/// Snapshot of the ledger for status display
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    pub daily_quota: u64,
    pub used: u64,
    pub remaining: u64,
    pub videos_remaining: u64,
    pub reset_date: Option<String>,
}

fn reset_zone_date(now: DateTime<Utc>) -> String {
    now.with_timezone(&RESET_TZ).format("%Y-%m-%d").to_string()
}

/// Zero the spent counter if the stored date differs from today in the
/// reset zone. Must run before any affordability decision that could span
/// a day boundary.
pub fn reset_if_new_day(state: &mut QuotaState) {
    reset_if_new_day_at(state, Utc::now());
}

/// [`reset_if_new_day`] against an explicit instant
pub fn reset_if_new_day_at(state: &mut QuotaState, now: DateTime<Utc>) {
    let today = reset_zone_date(now);
    if state.reset_date.as_deref() != Some(today.as_str()) {
        info!(
            previous_date = ?state.reset_date,
            new_date = %today,
            "Quota reset for new day"
        );
        state.used_today = 0;
        state.reset_date = Some(today);
    }
}

/// Whether `cost` more units fit inside the daily budget
pub fn can_afford(state: &QuotaState, cost: u64) -> bool {
    state.used_today + cost <= DAILY_QUOTA
}

/// Record `cost` units as spent.
///
/// Advisory accounting: the remote call has already happened, so this never
/// fails even when it pushes the counter past the budget.
pub fn charge(state: &mut QuotaState, cost: u64) {
    state.used_today += cost;
    debug!(
        cost,
        total = state.used_today,
        remaining = DAILY_QUOTA.saturating_sub(state.used_today),
        "Quota used"
    );
}

/// Go/no-go gate for starting one more full item today
pub fn can_upload_more(state: &mut QuotaState) -> bool {
    reset_if_new_day(state);
    can_afford(state, VIDEO_TOTAL_COST)
}

/// Time from now until the next midnight in the reset zone
pub fn time_until_reset() -> chrono::Duration {
    time_until_reset_at(Utc::now())
}

/// [`time_until_reset`] against an explicit instant
pub fn time_until_reset_at(now: DateTime<Utc>) -> chrono::Duration {
    let local = now.with_timezone(&RESET_TZ);
    let next_midnight_naive = (local.date_naive() + chrono::Days::new(1)).and_time(NaiveTime::MIN);
    let next_midnight = RESET_TZ
        .from_local_datetime(&next_midnight_naive)
        .earliest()
        .unwrap_or_else(|| local + chrono::Duration::hours(24));
    next_midnight.signed_duration_since(local)
}

/// Ledger snapshot for the status command
pub fn status(state: &mut QuotaState) -> QuotaStatus {
    reset_if_new_day(state);
    let remaining = DAILY_QUOTA.saturating_sub(state.used_today);
    QuotaStatus {
        daily_quota: DAILY_QUOTA,
        used: state.used_today,
        remaining,
        videos_remaining: remaining / VIDEO_TOTAL_COST,
        reset_date: state.reset_date.clone(),
    }
}
