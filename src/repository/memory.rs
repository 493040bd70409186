//! In-memory roster and cache backends (single process, not persisted).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheStore, RosterSource, StoreError};
use crate::models::{Group, MatchId, MatchRecord, Player};

/// Fixed roster held in memory.
#[derive(Debug, Default)]
pub struct MemoryRosterSource {
    groups: Vec<Group>,
    players: HashMap<String, Vec<Player>>,
}

impl MemoryRosterSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group with a roster.
    pub fn with_group(mut self, group_id: &str, players: Vec<Player>) -> Self {
        self.groups.push(Group {
            id: group_id.to_string(),
        });
        self.players.insert(group_id.to_string(), players);
        self
    }

    /// Add a group that carries no roster.
    pub fn with_empty_group(mut self, group_id: &str) -> Self {
        self.groups.push(Group {
            id: group_id.to_string(),
        });
        self
    }
}

#[async_trait]
impl RosterSource for MemoryRosterSource {
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.groups.clone())
    }

    async fn list_players(&self, group_id: &str) -> Result<Option<Vec<Player>>, StoreError> {
        Ok(self.players.get(group_id).cloned())
    }
}

/// Match cache held in memory.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    records: RwLock<HashMap<MatchId, MatchRecord>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn contains(&self, id: &MatchId) -> bool {
        self.records.read().await.contains_key(id)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn find_existing(&self, candidates: &[MatchId]) -> Result<HashSet<MatchId>, StoreError> {
        let records = self.records.read().await;
        Ok(candidates
            .iter()
            .filter(|id| records.contains_key(id))
            .cloned()
            .collect())
    }

    async fn insert(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        // Insert-if-absent: a cached record is never overwritten.
        records.entry(record.id()).or_insert_with(|| record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, marker: u64) -> MatchRecord {
        MatchRecord::from_document(json!({
            "metadata": { "matchId": id },
            "info": { "marker": marker }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn find_existing_reports_only_cached_ids() {
        let cache = MemoryCacheStore::new();
        cache.insert(&record("A", 1)).await.unwrap();

        let candidates = vec![MatchId::new("A"), MatchId::new("B"), MatchId::new("C")];
        let existing = cache.find_existing(&candidates).await.unwrap();
        assert_eq!(existing, HashSet::from([MatchId::new("A")]));
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_noop() {
        let cache = MemoryCacheStore::new();
        cache.insert(&record("A", 1)).await.unwrap();
        cache.insert(&record("A", 2)).await.unwrap();

        assert_eq!(cache.len().await, 1);
        let stored = cache.records.read().await;
        let kept = stored.get(&MatchId::new("A")).unwrap();
        // First write wins; records are write-once.
        assert_eq!(kept.as_json()["info"]["marker"], 1);
    }

    #[tokio::test]
    async fn roster_distinguishes_missing_from_empty() {
        let roster = MemoryRosterSource::new()
            .with_group("g1", vec![])
            .with_empty_group("g2");

        assert_eq!(roster.list_groups().await.unwrap().len(), 2);
        assert_eq!(roster.list_players("g1").await.unwrap(), Some(vec![]));
        assert_eq!(roster.list_players("g2").await.unwrap(), None);
    }
}
