//! The collection store
//!
//! Owns the four user collections (favorites, completed, backlog, reviews),
//! hydrates them from one storage slot on open and writes the whole snapshot
//! back after every change.
//!
//! Persistence is best-effort: a failed write is logged and the store keeps
//! working from memory, retrying on the next change or on `flush`.
//!
//! When the saved collection cannot be loaded at open, the slot is never
//! overwritten blindly. Each later write first retries the load and merges the
//! saved entries under the in-memory ones; until that succeeds the store runs
//! in memory only. A payload that is not valid JSON is copied to a
//! `<key>.corrupt` slot before the store starts empty.

use crate::snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotRef};
use crate::{
    BacklogEntry, Clock, CollectionError, CollectionStats, CompletedEntry, FavoriteEntry, GameId,
    GameRecord, Priority, ReviewDraft, ReviewEntry, ReviewUpdate, SnapshotStorage, SystemClock,
};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::mem::take;

/// Default storage slot for the collection
pub const NAMESPACE_KEY: &str = "gamesinfo-storage";

/// User collections backed by a storage slot
pub struct CollectionStore {
    storage: Box<dyn SnapshotStorage>,
    key: String,
    clock: Box<dyn Clock>,

    favorites: IndexMap<GameId, FavoriteEntry>,
    completed: IndexMap<GameId, CompletedEntry>,
    backlog: IndexMap<GameId, BacklogEntry>,
    reviews: IndexMap<GameId, ReviewEntry>,

    /// Set when the last write failed
    dirty: bool,

    /// Set while the saved collection could not be loaded
    load_failed: bool,
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("key", &self.key)
            .field("favorites", &self.favorites.len())
            .field("completed", &self.completed.len())
            .field("backlog", &self.backlog.len())
            .field("reviews", &self.reviews.len())
            .field("dirty", &self.dirty)
            .field("load_failed", &self.load_failed)
            .finish()
    }
}

impl CollectionStore {
    /// Open the store, loading any state saved under `key`
    pub fn open(storage: impl SnapshotStorage + 'static, key: impl Into<String>) -> Self {
        Self::open_with_clock(storage, key, SystemClock)
    }

    /// Open the store with a custom time source
    pub fn open_with_clock(
        storage: impl SnapshotStorage + 'static,
        key: impl Into<String>,
        clock: impl Clock + 'static,
    ) -> Self {
        let mut store = Self {
            storage: Box::new(storage),
            key: key.into(),
            clock: Box::new(clock),
            favorites: IndexMap::new(),
            completed: IndexMap::new(),
            backlog: IndexMap::new(),
            reviews: IndexMap::new(),
            dirty: false,
            load_failed: false,
        };
        store.hydrate();
        store
    }

    /// Storage slot this store writes to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Slot an unreadable payload is copied to
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// Whether in-memory state has not reached storage yet
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the store runs in memory only because the saved collection
    /// could not be loaded
    pub fn is_degraded(&self) -> bool {
        self.load_failed
    }

    /// Write the snapshot if a previous write failed
    pub fn flush(&mut self) -> Result<(), CollectionError> {
        if !self.dirty {
            return Ok(());
        }
        if self.load_failed {
            self.recover()?;
        }
        self.write_snapshot()?;
        self.dirty = false;
        Ok(())
    }

    /// Flush and release the storage backend
    pub fn close(mut self) -> Result<(), CollectionError> {
        self.flush()?;
        tracing::debug!("Collection store '{}' closed", self.key);
        Ok(())
    }

    // ==================== Favorites ====================

    /// Favorite a game; returns false if it already was
    pub fn add_favorite(&mut self, game: GameRecord) -> bool {
        if self.favorites.contains_key(&game.id) {
            return false;
        }
        let added_at = self.clock.now();
        self.favorites.insert(game.id, FavoriteEntry { game, added_at });
        self.persist();
        true
    }

    pub fn remove_favorite(&mut self, id: GameId) -> bool {
        let removed = self.favorites.shift_remove(&id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    pub fn is_favorite(&self, id: GameId) -> bool {
        self.favorites.contains_key(&id)
    }

    pub fn favorite(&self, id: GameId) -> Option<&FavoriteEntry> {
        self.favorites.get(&id)
    }

    /// Favorites in insertion order
    pub fn favorites(&self) -> impl ExactSizeIterator<Item = &FavoriteEntry> + DoubleEndedIterator {
        self.favorites.values()
    }

    // ==================== Completed ====================

    /// Mark a game completed; returns false if it already was
    pub fn add_completed(&mut self, game: GameRecord) -> bool {
        if self.completed.contains_key(&game.id) {
            return false;
        }
        let completed_at = self.clock.now();
        self.completed
            .insert(game.id, CompletedEntry { game, completed_at });
        self.persist();
        true
    }

    pub fn remove_completed(&mut self, id: GameId) -> bool {
        let removed = self.completed.shift_remove(&id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    pub fn is_completed(&self, id: GameId) -> bool {
        self.completed.contains_key(&id)
    }

    pub fn completed_entry(&self, id: GameId) -> Option<&CompletedEntry> {
        self.completed.get(&id)
    }

    /// Completed games in insertion order
    pub fn completed(&self) -> impl ExactSizeIterator<Item = &CompletedEntry> + DoubleEndedIterator {
        self.completed.values()
    }

    // ==================== Backlog ====================

    /// Queue a game at medium priority; returns false if already queued
    pub fn add_backlog(&mut self, game: GameRecord) -> bool {
        if self.backlog.contains_key(&game.id) {
            return false;
        }
        let entry = BacklogEntry {
            added_at: self.clock.now(),
            priority: Priority::default(),
            game,
        };
        self.backlog.insert(entry.game.id, entry);
        self.persist();
        true
    }

    pub fn remove_backlog(&mut self, id: GameId) -> bool {
        let removed = self.backlog.shift_remove(&id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    pub fn is_in_backlog(&self, id: GameId) -> bool {
        self.backlog.contains_key(&id)
    }

    pub fn backlog_entry(&self, id: GameId) -> Option<&BacklogEntry> {
        self.backlog.get(&id)
    }

    /// Backlog in insertion order
    pub fn backlog(&self) -> impl ExactSizeIterator<Item = &BacklogEntry> + DoubleEndedIterator {
        self.backlog.values()
    }

    /// Backlog entries with the given priority, in insertion order
    pub fn backlog_by_priority(&self, priority: Priority) -> impl Iterator<Item = &BacklogEntry> {
        self.backlog.values().filter(move |e| e.priority == priority)
    }

    /// Change the priority of a queued game; no-op if not queued
    pub fn update_backlog_priority(&mut self, id: GameId, priority: Priority) -> bool {
        let Some(entry) = self.backlog.get_mut(&id) else {
            return false;
        };
        if entry.priority != priority {
            entry.priority = priority;
            self.persist();
        }
        true
    }

    /// Move a queued game to favorites
    pub fn move_backlog_to_favorites(&mut self, id: GameId) -> bool {
        let Some(entry) = self.backlog.shift_remove(&id) else {
            return false;
        };
        let added_at = self.clock.now();
        self.favorites.entry(id).or_insert_with(|| FavoriteEntry {
            game: entry.game,
            added_at,
        });
        self.persist();
        true
    }

    /// Move a queued game to completed
    pub fn move_backlog_to_completed(&mut self, id: GameId) -> bool {
        let Some(entry) = self.backlog.shift_remove(&id) else {
            return false;
        };
        let completed_at = self.clock.now();
        self.completed.entry(id).or_insert_with(|| CompletedEntry {
            game: entry.game,
            completed_at,
        });
        self.persist();
        true
    }

    // ==================== Reviews ====================

    /// Save a review; an existing review for the game is overwritten.
    ///
    /// Returns `Ok(true)` when a new review was created.
    pub fn add_review(&mut self, draft: ReviewDraft) -> Result<bool, CollectionError> {
        draft.validate()?;

        let date = self.clock.now();
        let created = match self.reviews.entry(draft.game_id) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().replace(draft, date);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(ReviewEntry::from_draft(draft, date));
                true
            }
        };
        self.persist();
        Ok(created)
    }

    /// Edit an existing review; no-op if the game has none
    pub fn update_review(
        &mut self,
        id: GameId,
        update: ReviewUpdate,
    ) -> Result<bool, CollectionError> {
        update.validate()?;

        let date = self.clock.now();
        let Some(review) = self.reviews.get_mut(&id) else {
            return Ok(false);
        };
        review.apply(update, date);
        self.persist();
        Ok(true)
    }

    pub fn remove_review(&mut self, id: GameId) -> bool {
        let removed = self.reviews.shift_remove(&id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    pub fn get_review(&self, id: GameId) -> Option<&ReviewEntry> {
        self.reviews.get(&id)
    }

    /// Reviews in insertion order
    pub fn reviews(&self) -> impl ExactSizeIterator<Item = &ReviewEntry> + DoubleEndedIterator {
        self.reviews.values()
    }

    /// Aggregate figures over the collections
    pub fn stats(&self) -> CollectionStats {
        CollectionStats::compute(self)
    }

    // ==================== Persistence ====================

    fn hydrate(&mut self) {
        match self.load_saved() {
            Ok(Some(snapshot)) => {
                self.merge(snapshot);
                tracing::info!(
                    "Loaded collection: {} favorites, {} completed, {} in backlog, {} reviews",
                    self.favorites.len(),
                    self.completed.len(),
                    self.backlog.len(),
                    self.reviews.len()
                );
            }
            Ok(None) => {
                tracing::debug!("No saved collection under '{}', starting empty", self.key);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load saved collection: {}. Changes stay in memory until it can be read",
                    e
                );
                self.load_failed = true;
            }
        }
    }

    /// Read and decode the slot; an undecodable payload is backed up and
    /// treated as absent
    fn load_saved(&self) -> Result<Option<Snapshot>, CollectionError> {
        let Some(payload) = self.storage.read(&self.key)? else {
            return Ok(None);
        };

        match Snapshot::decode(&payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(CollectionError::Serialization(e)) => {
                let backup = self.backup_key();
                self.storage.write(&backup, &payload)?;
                tracing::warn!(
                    "Saved collection is unreadable: {}. Copied to '{}', starting empty",
                    e,
                    backup
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Retry a failed load and merge what was saved
    fn recover(&mut self) -> Result<(), CollectionError> {
        if let Some(snapshot) = self.load_saved()? {
            self.merge(snapshot);
        }
        self.load_failed = false;
        tracing::info!("Saved collection loaded, leaving memory-only mode");
        Ok(())
    }

    /// Put saved entries under the in-memory ones: saved order first, first
    /// saved occurrence wins, in-memory values replace saved ones
    fn merge(&mut self, saved: Snapshot) {
        self.favorites = merged(
            saved.favorites,
            |e: &FavoriteEntry| e.game.id,
            take(&mut self.favorites),
        );
        self.completed = merged(
            saved.completed,
            |e: &CompletedEntry| e.game.id,
            take(&mut self.completed),
        );
        self.backlog = merged(
            saved.backlog,
            |e: &BacklogEntry| e.game.id,
            take(&mut self.backlog),
        );
        self.reviews = merged(saved.reviews, |e: &ReviewEntry| e.game_id, take(&mut self.reviews));
    }

    fn persist(&mut self) {
        if self.load_failed
            && let Err(e) = self.recover()
        {
            tracing::warn!("Saved collection still unreadable, not overwriting it: {}", e);
            self.dirty = true;
            return;
        }

        match self.write_snapshot() {
            Ok(()) => self.dirty = false,
            Err(e) => {
                tracing::warn!("Failed to save collection, keeping changes in memory: {}", e);
                self.dirty = true;
            }
        }
    }

    fn write_snapshot(&self) -> Result<(), CollectionError> {
        let payload = SnapshotRef {
            version: SNAPSHOT_VERSION,
            favorites: &self.favorites,
            completed: &self.completed,
            backlog: &self.backlog,
            reviews: &self.reviews,
        }
        .encode()?;

        self.storage.write(&self.key, &payload)
    }
}

fn merged<T>(
    saved: Vec<T>,
    id_of: impl Fn(&T) -> GameId,
    current: IndexMap<GameId, T>,
) -> IndexMap<GameId, T> {
    let mut map = IndexMap::with_capacity(saved.len() + current.len());
    for entry in saved {
        map.entry(id_of(&entry)).or_insert(entry);
    }
    for (id, entry) in current {
        map.insert(id, entry);
    }
    map
}
