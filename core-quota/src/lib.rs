//! # Daily Quota Ledger
//!
//! Tracks API cost units spent against the platform's daily budget.
//!
//! ## Overview
//!
//! Every remote call against the video platform costs a fixed number of
//! abstract quota units, drawn from a daily budget that resets at midnight
//! in the platform's accounting time zone. The ledger:
//!
//! - Resets the spent counter the first time it is observed on a new
//!   calendar day (`reset_if_new_day`)
//! - Answers affordability queries before a call is made (`can_afford`)
//! - Records spend after a call has happened (`charge`)
//! - Computes the time remaining until the next reset (`time_until_reset`)
//!
//! This is a soft, cooperative budget: `charge` never fails, because by the
//! time the cost is known the remote call has already been spent. Callers
//! gate with `can_afford` first.

pub mod ledger;

pub use ledger::{
    can_afford, can_upload_more, charge, reset_if_new_day, reset_if_new_day_at, status,
    time_until_reset, time_until_reset_at, QuotaState, QuotaStatus, DAILY_QUOTA, LIST_COST,
    PLAYLIST_IMAGE_COST, PLAYLIST_INSERT_COST, PLAYLIST_ITEM_COST, THUMBNAIL_COST, UPLOAD_COST,
    VIDEO_TOTAL_COST,
};
