//! Collection entries
//!
//! Each entry wraps a `GameRecord` with the metadata of the collection it
//! belongs to. Serialized field names match the browser storage layout of the
//! web client, so a slot exported from a browser can be loaded as-is.

use crate::{CollectionError, GameId, GameRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest accepted star rating
pub const MIN_REVIEW_RATING: u8 = 1;

/// Highest accepted star rating
pub const MAX_REVIEW_RATING: u8 = 5;

/// Maximum review body length, in characters
pub const MAX_REVIEW_TEXT_LEN: usize = 500;

/// A favorited game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub game: GameRecord,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

/// A completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedEntry {
    #[serde(flatten)]
    pub game: GameRecord,
    #[serde(rename = "completedAt")]
    pub completed_at: DateTime<Utc>,
}

/// Backlog priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(CollectionError::InvalidPriority(other.to_string())),
        }
    }
}

/// A game waiting to be played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogEntry {
    #[serde(flatten)]
    pub game: GameRecord,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
}

/// A personal review, one per game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub game_id: GameId,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub game_image: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    pub date: DateTime<Utc>,
}

/// Review content submitted by the user
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub game_id: GameId,
    pub game_name: String,
    pub game_image: String,
    pub rating: u8,
    pub text: String,
}

impl ReviewDraft {
    /// Draft a review for a catalog record
    pub fn for_game(game: &GameRecord, rating: u8, text: impl Into<String>) -> Self {
        Self {
            game_id: game.id,
            game_name: game.name.clone(),
            game_image: game.background_image.clone().unwrap_or_default(),
            rating,
            text: text.into(),
        }
    }

    /// Draft a review knowing only the game id
    pub fn new(game_id: GameId, rating: u8, text: impl Into<String>) -> Self {
        Self {
            game_id,
            game_name: String::new(),
            game_image: String::new(),
            rating,
            text: text.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CollectionError> {
        validate_rating(self.rating)?;
        validate_text(&self.text)
    }
}

/// Partial review edit; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewUpdate {
    pub rating: Option<u8>,
    pub text: Option<String>,
    pub game_name: Option<String>,
    pub game_image: Option<String>,
}

impl ReviewUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CollectionError> {
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(text) = &self.text {
            validate_text(text)?;
        }
        Ok(())
    }
}

impl ReviewEntry {
    pub(crate) fn from_draft(draft: ReviewDraft, date: DateTime<Utc>) -> Self {
        Self {
            game_id: draft.game_id,
            game_name: draft.game_name,
            game_image: draft.game_image,
            rating: draft.rating,
            text: draft.text,
            date,
        }
    }

    /// Overwrite content from a new draft, keeping names already known
    pub(crate) fn replace(&mut self, draft: ReviewDraft, date: DateTime<Utc>) {
        if !draft.game_name.is_empty() {
            self.game_name = draft.game_name;
        }
        if !draft.game_image.is_empty() {
            self.game_image = draft.game_image;
        }
        self.rating = draft.rating;
        self.text = draft.text;
        self.date = date;
    }

    pub(crate) fn apply(&mut self, update: ReviewUpdate, date: DateTime<Utc>) {
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(text) = update.text {
            self.text = text;
        }
        if let Some(name) = update.game_name {
            self.game_name = name;
        }
        if let Some(image) = update.game_image {
            self.game_image = image;
        }
        self.date = date;
    }
}

fn validate_rating(rating: u8) -> Result<(), CollectionError> {
    if (MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CollectionError::InvalidReview(format!(
            "rating must be between {} and {}, got {}",
            MIN_REVIEW_RATING, MAX_REVIEW_RATING, rating
        )))
    }
}

fn validate_text(text: &str) -> Result<(), CollectionError> {
    let len = text.chars().count();
    if len > MAX_REVIEW_TEXT_LEN {
        return Err(CollectionError::InvalidReview(format!(
            "review text is {} characters, limit is {}",
            len, MAX_REVIEW_TEXT_LEN
        )));
    }
    Ok(())
}
