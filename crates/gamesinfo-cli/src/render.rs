//! Plain-text output

use chrono::{DateTime, Utc};

use gamesinfo_catalog::{GameDetails, Screenshot, Trailer};
use gamesinfo_collection::{
    BacklogEntry, CollectionStats, CollectionStore, GameId, GameRecord, MAX_REVIEW_RATING,
    ReviewEntry,
};

/// Screenshots listed on the details view
pub const MAX_SCREENSHOTS: usize = 6;

/// Tags listed on the details view
pub const MAX_TAGS: usize = 8;

/// One-line catalog entry: id, name, rating, release date, genres
pub fn game_line(game: &GameRecord) -> String {
    let genres: Vec<&str> = game.genre_names().collect();
    let mut line = format!(
        "{:>7}  {}  ({:.1}, {})",
        game.id,
        game.name,
        game.rating,
        game.released.as_deref().unwrap_or("TBA")
    );
    if !genres.is_empty() {
        line.push_str(&format!("  [{}]", genres.join(", ")));
    }
    line
}

/// Catalog entry with the date it joined a collection
pub fn dated_line(game: &GameRecord, at: &DateTime<Utc>) -> String {
    format!("{:>7}  {}  (since {})", game.id, game.name, day(at))
}

pub fn backlog_line(entry: &BacklogEntry) -> String {
    format!(
        "{:>7}  {:<6}  {}  (since {})",
        entry.game.id,
        entry.priority,
        entry.game.name,
        day(&entry.added_at)
    )
}

/// Filled and empty stars for a rating
pub fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_REVIEW_RATING) as usize;
    let empty = MAX_REVIEW_RATING as usize - filled;
    format!("{}{}", "*".repeat(filled), ".".repeat(empty))
}

pub fn review_lines(review: &ReviewEntry) -> Vec<String> {
    let title = if review.game_name.is_empty() {
        format!("Game {}", review.game_id)
    } else {
        review.game_name.clone()
    };

    let mut lines = vec![format!(
        "{}  {}  ({})",
        title,
        stars(review.rating),
        day(&review.date)
    )];
    if !review.text.is_empty() {
        lines.push(format!("  {}", review.text));
    }
    lines
}

pub fn details_lines(details: &GameDetails) -> Vec<String> {
    let game = &details.game;
    let mut lines = vec![
        format!("{} (#{})", game.name, game.id),
        format!("Rating:    {:.2}", game.rating),
        format!("Released:  {}", game.released.as_deref().unwrap_or("TBA")),
    ];

    let genres: Vec<&str> = game.genre_names().collect();
    if !genres.is_empty() {
        lines.push(format!("Genres:    {}", genres.join(", ")));
    }
    let platforms: Vec<&str> = game.platform_names().collect();
    if !platforms.is_empty() {
        lines.push(format!("Platforms: {}", platforms.join(", ")));
    }
    if let Some(metacritic) = game.metacritic {
        lines.push(format!("Metacritic: {}", metacritic));
    }
    if let Some(esrb) = &game.esrb_rating {
        lines.push(format!("ESRB:      {}", esrb.name));
    }
    if !details.developers.is_empty() {
        let names: Vec<&str> = details.developers.iter().map(|d| d.name.as_str()).collect();
        lines.push(format!("Developers: {}", names.join(", ")));
    }
    let tags: Vec<&str> = details
        .tags_in("eng")
        .take(MAX_TAGS)
        .map(|t| t.name.as_str())
        .collect();
    if !tags.is_empty() {
        lines.push(format!("Tags:      {}", tags.join(", ")));
    }
    if let Some(website) = details.website.as_deref().filter(|w| !w.is_empty()) {
        lines.push(format!("Website:   {}", website));
    }
    if let Some(summary) = details.summary() {
        lines.push(String::new());
        lines.push(summary.to_string());
    }
    lines
}

/// First trailer and the leading screenshots
pub fn media_lines(trailers: &[Trailer], screenshots: &[Screenshot]) -> Vec<String> {
    let mut lines = Vec::new();

    match trailers.iter().find_map(Trailer::video_url) {
        Some(url) => lines.push(format!("Trailer:   {}", url)),
        None => lines.push("Trailer:   none available".to_string()),
    }

    if !screenshots.is_empty() {
        lines.push("Screenshots:".to_string());
        lines.extend(
            screenshots
                .iter()
                .take(MAX_SCREENSHOTS)
                .map(|s| format!("  {}", s.image)),
        );
    }
    lines
}

/// Hint for fetching the following results page
pub fn next_page_line(page: u32) -> String {
    format!("More results with --page {}", page.saturating_add(1))
}

/// Where a game sits in the collection
pub fn membership_line(store: &CollectionStore, id: GameId) -> String {
    let mut places = Vec::new();
    if store.is_favorite(id) {
        places.push("favorites".to_string());
    }
    if store.is_completed(id) {
        places.push("completed".to_string());
    }
    if let Some(entry) = store.backlog_entry(id) {
        places.push(format!("backlog ({})", entry.priority));
    }

    if places.is_empty() {
        "Not in your collection".to_string()
    } else {
        format!("In your collection: {}", places.join(", "))
    }
}

pub fn stats_lines(stats: &CollectionStats) -> Vec<String> {
    let mut lines = vec![
        format!("Favorites:    {}", stats.favorites),
        format!("Completed:    {}", stats.completed),
        format!("Backlog:      {}", stats.backlog),
        format!("Reviews:      {}", stats.reviews),
        format!("Unique games: {}", stats.unique_games),
    ];
    if let Some(average) = stats.average_rating {
        lines.push(format!("Avg. rating:  {:.1}", average));
    }
    if !stats.top_genres.is_empty() {
        lines.push(format!("Top genres:   {}", ranked(&stats.top_genres)));
    }
    if !stats.top_platforms.is_empty() {
        lines.push(format!("Top platforms: {}", ranked(&stats.top_platforms)));
    }
    lines
}

fn ranked(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn day(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
