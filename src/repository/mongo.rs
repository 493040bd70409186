//! MongoDB-backed roster source and match cache.
//!
//! Roster documents: `{ group_id, players: [{ puuid, name }, ...] }`.
//! Match documents are the provider payloads stored verbatim, keyed by the
//! nested `metadata.matchId` field under a unique index.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_document, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::debug;

use super::{CacheStore, RosterSource, StoreError};
use crate::config::StorageSettings;
use crate::models::{Group, MatchId, MatchRecord, Player};

/// Connect to the store and return both collaborators.
pub async fn connect(
    settings: &StorageSettings,
) -> Result<(MongoRosterSource, MongoCacheStore), StoreError> {
    let client = Client::with_uri_str(&settings.uri).await?;
    let db = client.database(&settings.database);

    let roster = MongoRosterSource {
        groups: db.collection(&settings.roster_collection),
    };
    let cache = MongoCacheStore {
        matches: db.collection(&settings.match_collection),
    };
    cache.ensure_indexes().await?;

    Ok((roster, cache))
}

/// Roster enumeration backed by one document per group.
pub struct MongoRosterSource {
    groups: Collection<Document>,
}

#[async_trait]
impl RosterSource for MongoRosterSource {
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        let mut cursor = self.groups.find(doc! {}).await?;
        let mut groups = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            let id = doc.get_str("group_id").map_err(|_| {
                StoreError::Malformed("roster document missing group_id".to_string())
            })?;
            groups.push(Group { id: id.to_string() });
        }
        Ok(groups)
    }

    async fn list_players(&self, group_id: &str) -> Result<Option<Vec<Player>>, StoreError> {
        let Some(doc) = self.groups.find_one(doc! { "group_id": group_id }).await? else {
            return Ok(None);
        };
        let Ok(entries) = doc.get_array("players") else {
            return Ok(None);
        };

        let mut players = Vec::new();
        for entry in entries {
            let Some(player) = entry.as_document() else {
                continue;
            };
            let (Ok(puuid), Ok(name)) = (player.get_str("puuid"), player.get_str("name")) else {
                debug!(group = group_id, "skipping malformed roster entry");
                continue;
            };
            players.push(Player {
                puuid: puuid.to_string(),
                group_id: group_id.to_string(),
                name: name.to_string(),
            });
        }
        Ok(Some(players))
    }
}

/// Match cache backed by one document per match.
pub struct MongoCacheStore {
    matches: Collection<Document>,
}

impl MongoCacheStore {
    /// Unique index on the cache key, so concurrent inserts of the same
    /// match degrade to a duplicate-key no-op.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "metadata.matchId": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.matches.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MongoCacheStore {
    async fn find_existing(&self, candidates: &[MatchId]) -> Result<HashSet<MatchId>, StoreError> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<&str> = candidates.iter().map(MatchId::as_str).collect();
        let mut cursor = self
            .matches
            .find(doc! { "metadata.matchId": { "$in": ids } })
            .projection(doc! { "metadata.matchId": 1 })
            .await?;

        let mut present = HashSet::new();
        while let Some(doc) = cursor.try_next().await? {
            if let Some(id) = doc
                .get_document("metadata")
                .ok()
                .and_then(|m| m.get_str("matchId").ok())
            {
                present.insert(MatchId::new(id));
            }
        }
        Ok(present)
    }

    async fn insert(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let doc = to_document(record.as_json())
            .map_err(|e| StoreError::Malformed(format!("record not storable as document: {e}")))?;

        match self.matches.insert_one(doc).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                debug!(match_id = record.match_id(), "already cached, insert skipped");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
