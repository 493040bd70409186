//! Tracked players and the groups that reference them.
//!
//! Both are ephemeral: re-read from the roster source at the start of every
//! harvest pass, never written back.

use serde::{Deserialize, Serialize};

/// A tracked group. The roster source is the source of truth; the core
/// only enumerates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
}

/// One tracked player within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Provider-scoped player identifier.
    pub puuid: String,
    /// Group this player was resolved through.
    #[serde(default)]
    pub group_id: String,
    /// Display name, used only for reporting.
    pub name: String,
}
