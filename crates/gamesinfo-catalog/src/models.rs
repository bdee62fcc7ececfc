//! Catalog response models

use gamesinfo_collection::{GameRecord, NamedRef};
use serde::{Deserialize, Serialize};

/// One page of a game listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamesPage {
    /// Total matches across all pages
    #[serde(default)]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<GameRecord>,
}

impl GamesPage {
    /// Whether another page follows this one
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Catalog tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub games_count: u64,
}

/// Screenshot reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: u64,
    pub image: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Screenshot listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ScreenshotsPage {
    #[serde(default)]
    pub results: Vec<Screenshot>,
}

/// Video file URLs of a trailer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailerVideos {
    #[serde(rename = "480", default)]
    pub low: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}

/// Trailer reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trailer {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Poster image
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub data: TrailerVideos,
}

impl Trailer {
    /// Best available video URL
    pub fn video_url(&self) -> Option<&str> {
        self.data.max.as_deref().or(self.data.low.as_deref())
    }
}

/// Trailer listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TrailersPage {
    #[serde(default)]
    pub results: Vec<Trailer>,
}

/// Extended record returned for a single game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetails {
    #[serde(flatten)]
    pub game: GameRecord,
    /// HTML description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_raw: Option<String>,
    #[serde(default)]
    pub developers: Vec<NamedRef>,
    #[serde(default)]
    pub publishers: Vec<NamedRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub reddit_url: Option<String>,
    #[serde(default)]
    pub metacritic_url: Option<String>,
    #[serde(default)]
    pub short_screenshots: Vec<Screenshot>,
}

impl GameDetails {
    /// Plain-text description, if the catalog has one
    pub fn summary(&self) -> Option<&str> {
        self.description_raw
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Tags in the given language
    pub fn tags_in<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a Tag> {
        self.tags.iter().filter(move |t| t.language == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_games_page() {
        let json = r#"{
            "count": 2,
            "next": "https://api.rawg.io/api/games?page=2",
            "previous": null,
            "results": [
                {"id": 1, "name": "A", "rating": 4.0, "genres": [], "platforms": []},
                {"id": 2, "name": "B", "rating": 3.5, "genres": [], "platforms": null}
            ]
        }"#;

        let page: GamesPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.has_more());
        assert_eq!(page.results[1].name, "B");
    }

    #[test]
    fn test_decode_details() {
        let json = r#"{
            "id": 4200,
            "name": "Portal 2",
            "rating": 4.61,
            "released": "2011-04-18",
            "genres": [{"id": 7, "name": "Puzzle", "slug": "puzzle"}],
            "platforms": [],
            "description": "<p>Portal 2 draws from the award-winning formula</p>",
            "description_raw": "Portal 2 draws from the award-winning formula",
            "developers": [{"id": 1, "name": "Valve Software", "slug": "valve-software"}],
            "publishers": [{"id": 2, "name": "Valve", "slug": "valve"}],
            "tags": [
                {"id": 31, "name": "Singleplayer", "slug": "singleplayer", "language": "eng", "games_count": 100},
                {"id": 32, "name": "Одиночная", "slug": "odinochnaia", "language": "rus", "games_count": 5}
            ],
            "website": "http://www.thinkwithportals.com/",
            "metacritic": 95,
            "metacritic_url": null
        }"#;

        let details: GameDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.game.id, 4200);
        assert_eq!(details.game.metacritic, Some(95));
        assert_eq!(details.developers[0].name, "Valve Software");
        assert_eq!(details.tags_in("eng").count(), 1);
        assert!(details.summary().unwrap().starts_with("Portal 2"));
        assert!(details.metacritic_url.is_none());
    }

    #[test]
    fn test_decode_trailers() {
        let json = r#"{
            "count": 2,
            "results": [
                {"id": 16537, "name": "Trailer", "preview": "https://media.rawg.io/p.jpg",
                 "data": {"480": "https://steamcdn-a.akamaihd.net/480.mp4", "max": "https://steamcdn-a.akamaihd.net/max.mp4"}},
                {"id": 16538, "name": "Teaser", "data": {"480": "https://steamcdn-a.akamaihd.net/teaser.mp4"}}
            ]
        }"#;

        let page: TrailersPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(
            page.results[0].video_url(),
            Some("https://steamcdn-a.akamaihd.net/max.mp4")
        );
        assert_eq!(
            page.results[1].video_url(),
            Some("https://steamcdn-a.akamaihd.net/teaser.mp4")
        );
    }
}
