//! Match identifiers and cached match documents.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque identifier of one completed match; the cache key and dedup unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full match detail payload as returned by the provider.
///
/// Opaque to the core apart from the nested `metadata.matchId` field the
/// cache is keyed by. Write-once: a record stored under an id is never
/// overwritten by a later pass. `from_document` is the only way in, so
/// every record carries its cache key; there is deliberately no
/// `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchRecord(Value);

impl MatchRecord {
    /// Wrap a provider document, rejecting payloads that lack the match
    /// identifier (those cannot be deduplicated and are never cached).
    pub fn from_document(document: Value) -> Option<Self> {
        document
            .pointer("/metadata/matchId")
            .and_then(Value::as_str)?;
        Some(Self(document))
    }

    /// The identifier this record is cached under.
    pub fn id(&self) -> MatchId {
        MatchId::new(self.match_id())
    }

    pub fn match_id(&self) -> &str {
        // Guaranteed present by `from_document`.
        self.0
            .pointer("/metadata/matchId")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_document_requires_match_id() {
        assert!(MatchRecord::from_document(json!({})).is_none());
        assert!(MatchRecord::from_document(json!({ "metadata": {} })).is_none());
        assert!(MatchRecord::from_document(json!({ "metadata": { "matchId": 42 } })).is_none());

        let record =
            MatchRecord::from_document(json!({ "metadata": { "matchId": "NA1_100" } })).unwrap();
        assert_eq!(record.match_id(), "NA1_100");
        assert_eq!(record.id(), MatchId::new("NA1_100"));
    }

    #[test]
    fn record_preserves_payload() {
        let document = json!({
            "metadata": { "matchId": "NA1_7" },
            "info": { "gameDuration": 1800 }
        });
        let record = MatchRecord::from_document(document.clone()).unwrap();
        assert_eq!(record.as_json(), &document);
    }
}
