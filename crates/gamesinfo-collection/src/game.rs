//! Catalog game records
//!
//! A `GameRecord` is the snapshot of a catalog entry that the collection
//! stores alongside its own metadata. Field names follow the catalog wire
//! format so API results can be stored without conversion.

use serde::{Deserialize, Deserializer, Serialize};

/// Catalog identifier of a game
pub type GameId = u64;

/// A named catalog reference (genre, platform, rating board entry)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl NamedRef {
    /// Create a reference, deriving the slug from the name
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { id, name, slug }
    }
}

/// Genre of a game
pub type Genre = NamedRef;

/// Platform of a game
pub type Platform = NamedRef;

/// Content rating tag (ESRB)
pub type EsrbRating = NamedRef;

/// Platform availability wrapper used by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,
}

impl From<Platform> for PlatformInfo {
    fn from(platform: Platform) -> Self {
        Self {
            platform,
            released_at: None,
        }
    }
}

/// Immutable snapshot of a catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformInfo>,
    #[serde(default)]
    pub esrb_rating: Option<EsrbRating>,

    // Catalog extras, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_top: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<u32>,
}

impl GameRecord {
    /// Create a minimal record
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            slug: slugify(&name),
            name,
            ..Default::default()
        }
    }

    /// Set the genres
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    /// Set the platforms
    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().map(PlatformInfo::from).collect();
        self
    }

    /// Set the catalog rating
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    /// Genre names in catalog order
    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|g| g.name.as_str())
    }

    /// Platform names in catalog order
    pub fn platform_names(&self) -> impl Iterator<Item = &str> {
        self.platforms.iter().map(|p| p.platform.name.as_str())
    }
}

/// The catalog sends `null` for empty lists on some records
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
