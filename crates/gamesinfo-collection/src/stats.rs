//! Collection statistics

use crate::{CollectionStore, GameRecord};
use std::collections::{HashMap, HashSet};

/// Number of entries kept in the top genre and platform lists
pub const TOP_LIMIT: usize = 5;

/// Aggregate figures over a user's collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStats {
    pub favorites: usize,
    pub completed: usize,
    pub backlog: usize,
    pub reviews: usize,
    /// Distinct games across favorites and completed
    pub unique_games: usize,
    /// Mean star rating over all reviews
    pub average_rating: Option<f32>,
    /// Most frequent genres across favorites and completed
    pub top_genres: Vec<(String, usize)>,
    /// Most frequent platforms across favorites and completed
    pub top_platforms: Vec<(String, usize)>,
}

impl CollectionStats {
    pub(crate) fn compute(store: &CollectionStore) -> Self {
        let played: Vec<&GameRecord> = store
            .favorites()
            .map(|e| &e.game)
            .chain(store.completed().map(|e| &e.game))
            .collect();

        let unique_games = played.iter().map(|g| g.id).collect::<HashSet<_>>().len();

        let reviews = store.reviews().len();
        let average_rating = if reviews == 0 {
            None
        } else {
            let total: u32 = store.reviews().map(|r| u32::from(r.rating)).sum();
            Some(total as f32 / reviews as f32)
        };

        Self {
            favorites: store.favorites().len(),
            completed: store.completed().len(),
            backlog: store.backlog().len(),
            reviews,
            unique_games,
            average_rating,
            top_genres: top_counts(played.iter().flat_map(|g| g.genre_names())),
            top_platforms: top_counts(played.iter().flat_map(|g| g.platform_names())),
        }
    }
}

/// Count names, most frequent first, ties broken alphabetically
fn top_counts<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted.truncate(TOP_LIMIT);

    sorted
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}
