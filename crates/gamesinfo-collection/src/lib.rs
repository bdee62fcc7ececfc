//! Local game collection for GamesInfo
//!
//! Tracks the games a user cares about: favorites, completed games, a
//! prioritized backlog and personal reviews. Everything lives in memory in a
//! [`CollectionStore`] and is written to a single storage slot after every
//! change.
//!
//! # Example
//!
//! ```no_run
//! use gamesinfo_collection::{CollectionStore, FileStorage, GameRecord, NAMESPACE_KEY};
//!
//! let mut store = CollectionStore::open(FileStorage::new("/tmp/gamesinfo"), NAMESPACE_KEY);
//! store.add_favorite(GameRecord::new(3328, "The Witcher 3: Wild Hunt"));
//! assert!(store.is_favorite(3328));
//! store.close().ok();
//! ```

mod clock;
mod database;
mod entry;
mod game;
mod snapshot;
mod stats;
mod storage;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use database::SqliteStorage;
pub use entry::{
    BacklogEntry, CompletedEntry, FavoriteEntry, MAX_REVIEW_RATING, MAX_REVIEW_TEXT_LEN,
    MIN_REVIEW_RATING, Priority, ReviewDraft, ReviewEntry, ReviewUpdate,
};
pub use game::{EsrbRating, GameId, GameRecord, Genre, NamedRef, Platform, PlatformInfo};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use stats::{CollectionStats, TOP_LIMIT};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage};
pub use store::{CollectionStore, NAMESPACE_KEY};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid review: {0}")]
    InvalidReview(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Which collection a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Favorites,
    Completed,
    Backlog,
    Reviews,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Favorites => "favorites",
            Collection::Completed => "completed",
            Collection::Backlog => "backlog",
            Collection::Reviews => "reviews",
        }
    }
}
