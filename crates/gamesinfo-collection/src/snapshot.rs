//! Persisted snapshot format
//!
//! The whole collection is stored as one JSON document in a single storage
//! slot. Two layouts are read:
//!
//! - the current layout, `{"version": 1, "favorites": [...], ...}`
//! - the web client's layout, `{"state": {...}, "version": 0}`
//!
//! Only the current layout is written.

use crate::{BacklogEntry, CollectionError, CompletedEntry, FavoriteEntry, GameId, ReviewEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Snapshot layout version written by this crate
pub const SNAPSHOT_VERSION: u32 = 1;

/// Owned snapshot, as decoded from storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub favorites: Vec<FavoriteEntry>,
    #[serde(default)]
    pub completed: Vec<CompletedEntry>,
    #[serde(default)]
    pub backlog: Vec<BacklogEntry>,
    #[serde(default)]
    pub reviews: Vec<ReviewEntry>,
}

impl Snapshot {
    /// Decode a stored payload
    pub fn decode(payload: &str) -> Result<Self, CollectionError> {
        let mut value: serde_json::Value = serde_json::from_str(payload)?;

        // The web client nests everything under "state"
        if let Some(state) = value.get_mut("state") {
            let state: Snapshot = serde_json::from_value(state.take())?;
            tracing::info!("Importing collection stored by the web client");
            return Ok(Snapshot {
                version: SNAPSHOT_VERSION,
                ..state
            });
        }

        let snapshot: Snapshot = serde_json::from_value(value)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(CollectionError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

/// Borrowed view of the live collections, serialized in insertion order
#[derive(Serialize)]
pub(crate) struct SnapshotRef<'a> {
    pub version: u32,
    #[serde(serialize_with = "values")]
    pub favorites: &'a IndexMap<GameId, FavoriteEntry>,
    #[serde(serialize_with = "values")]
    pub completed: &'a IndexMap<GameId, CompletedEntry>,
    #[serde(serialize_with = "values")]
    pub backlog: &'a IndexMap<GameId, BacklogEntry>,
    #[serde(serialize_with = "values")]
    pub reviews: &'a IndexMap<GameId, ReviewEntry>,
}

impl SnapshotRef<'_> {
    pub fn encode(&self) -> Result<String, CollectionError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn values<S, T>(map: &&IndexMap<GameId, T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_seq(map.values())
}
