//! Storage collaborators: roster enumeration and the match cache.
//!
//! The core only needs "list groups/players", "which of these ids exist"
//! and "insert if absent"; everything else about the store is opaque.

pub mod memory;
pub mod mongo;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Group, MatchId, MatchRecord, Player};

pub use memory::{MemoryCacheStore, MemoryRosterSource};
pub use mongo::{connect, MongoCacheStore, MongoRosterSource};

/// Errors from the storage layer. Non-continuable for the current pass.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Backend(#[from] mongodb::error::Error),

    #[error("malformed store document: {0}")]
    Malformed(String),
}

/// Source of tracked groups and their player rosters. Read-only to the
/// core; re-resolved at the start of every harvest pass.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError>;

    /// Players tracked for one group, or `None` when the group carries no
    /// roster.
    async fn list_players(&self, group_id: &str) -> Result<Option<Vec<Player>>, StoreError>;
}

/// Durable cache of match detail documents keyed by match id.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Which of the candidate ids are already cached.
    async fn find_existing(&self, candidates: &[MatchId]) -> Result<HashSet<MatchId>, StoreError>;

    /// Insert one record. Inserting an id that is already present must be
    /// a no-op, never an overwrite.
    async fn insert(&self, record: &MatchRecord) -> Result<(), StoreError>;
}
