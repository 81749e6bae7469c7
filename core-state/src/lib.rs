//! # Durable Job State
//!
//! Persists upload progress so a killed process resumes exactly where it
//! stopped.
//!
//! ## Overview
//!
//! All mutable state lives in one aggregate, [`RootState`]: the quota
//! ledger counters, one [`JobState`] per manifest item, and one
//! [`CollectionState`] per series. The aggregate is loaded fully at process
//! start and rewritten in full by every mutation — there is no in-memory
//! window longer than one mutation, which is what makes external process
//! termination safe at any point.
//!
//! ## Components
//!
//! - **Model** (`model`): the aggregate and the per-item status machine
//! - **Store** (`store`): the `StateStore` persistence seam and its
//!   JSON-file implementation (write-temp-then-rename)
//! - **Manager** (`manager`): owns the in-memory aggregate and enforces the
//!   mutate-then-flush discipline

pub mod error;
pub mod manager;
pub mod model;
pub mod store;

pub use error::{Result, StateError};
pub use manager::StateManager;
pub use model::{CollectionState, JobState, JobStatus, RootState};
pub use store::{JsonFileStore, StateStore};
