//! Command handlers

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use gamesinfo_catalog::{CatalogClient, GameFilters};
use gamesinfo_collection::{
    Collection, CollectionStore, GameId, GameRecord, ReviewDraft, ReviewUpdate,
};

use crate::render;
use crate::{BacklogAction, Command, ListAction, MoveTarget, ReviewAction};

/// Catalog access plus the open collection
pub struct App {
    catalog: CatalogClient,
    store: CollectionStore,
}

impl App {
    pub fn new(catalog: CatalogClient, store: CollectionStore) -> Self {
        Self { catalog, store }
    }

    /// Hand back the store so it can be closed
    pub fn into_store(self) -> CollectionStore {
        self.store
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Search {
                query,
                platform,
                genre,
                ordering,
                page,
            } => {
                let mut filters = GameFilters::new().page(page);
                if let Some(query) = query {
                    filters = filters.search(query);
                }
                if let Some(platform) = platform {
                    filters = filters.platform(platform);
                }
                if let Some(genre) = genre {
                    filters = filters.genre(genre);
                }
                if let Some(ordering) = ordering {
                    filters = filters.ordering(ordering);
                }
                self.search(&filters, page).await
            }
            Command::Show { id } => self.show(id).await,
            Command::Favorites { action } => self.list_action(Collection::Favorites, action).await,
            Command::Completed { action } => self.list_action(Collection::Completed, action).await,
            Command::Backlog { action } => self.backlog_action(action).await,
            Command::Review { action } => self.review_action(action).await,
            Command::Stats => {
                print_lines(render::stats_lines(&self.store.stats()));
                Ok(())
            }
        }
    }

    async fn search(&self, filters: &GameFilters, page: u32) -> Result<()> {
        let results = self
            .catalog
            .games(filters)
            .await
            .context("Failed to search the catalog")?;

        if results.results.is_empty() {
            println!("No games found");
            return Ok(());
        }

        for game in &results.results {
            println!("{}", render::game_line(game));
        }
        println!("{} games in total", results.count);
        if results.has_more() {
            println!("{}", render::next_page_line(page));
        }
        Ok(())
    }

    async fn show(&self, id: GameId) -> Result<()> {
        let details = self
            .catalog
            .game_details(id)
            .await
            .with_context(|| format!("Failed to fetch game {}", id))?;

        let (trailers, screenshots) = tokio::join!(
            self.catalog.game_trailers(id),
            self.catalog.game_screenshots(id)
        );
        let trailers = trailers.unwrap_or_else(|e| {
            warn!("Could not fetch trailers for game {}: {}", id, e);
            Vec::new()
        });
        let screenshots = screenshots.unwrap_or_else(|e| {
            warn!("Could not fetch screenshots for game {}: {}", id, e);
            Vec::new()
        });

        print_lines(render::details_lines(&details));
        print_lines(render::media_lines(&trailers, &screenshots));
        println!();
        println!("{}", render::membership_line(&self.store, id));
        if let Some(review) = self.store.get_review(id) {
            print_lines(render::review_lines(review));
        }
        Ok(())
    }

    async fn fetch_game(&self, id: GameId) -> Result<GameRecord> {
        let details = self
            .catalog
            .game_details(id)
            .await
            .with_context(|| format!("Failed to fetch game {}", id))?;
        Ok(details.game)
    }

    fn contains(&self, collection: Collection, id: GameId) -> bool {
        match collection {
            Collection::Favorites => self.store.is_favorite(id),
            Collection::Completed => self.store.is_completed(id),
            Collection::Backlog => self.store.is_in_backlog(id),
            Collection::Reviews => self.store.get_review(id).is_some(),
        }
    }

    async fn list_action(&mut self, collection: Collection, action: ListAction) -> Result<()> {
        match action {
            ListAction::List => {
                let lines: Vec<String> = match collection {
                    Collection::Favorites => self
                        .store
                        .favorites()
                        .map(|e| render::dated_line(&e.game, &e.added_at))
                        .collect(),
                    Collection::Completed => self
                        .store
                        .completed()
                        .map(|e| render::dated_line(&e.game, &e.completed_at))
                        .collect(),
                    other => bail!("{} cannot be listed this way", other.as_str()),
                };
                print_list(collection, lines);
            }
            ListAction::Add { id } => {
                if self.contains(collection, id) {
                    println!("Game {} is already in {}", id, collection.as_str());
                    return Ok(());
                }
                let game = self.fetch_game(id).await?;
                let name = game.name.clone();
                match collection {
                    Collection::Favorites => self.store.add_favorite(game),
                    Collection::Completed => self.store.add_completed(game),
                    other => bail!("cannot add to {} this way", other.as_str()),
                };
                info!("Added {} to {}", id, collection.as_str());
                println!("Added {} to {}", name, collection.as_str());
            }
            ListAction::Remove { id } => {
                let removed = match collection {
                    Collection::Favorites => self.store.remove_favorite(id),
                    Collection::Completed => self.store.remove_completed(id),
                    other => bail!("cannot remove from {} this way", other.as_str()),
                };
                report_removal(removed, collection, id);
            }
        }
        Ok(())
    }

    async fn backlog_action(&mut self, action: BacklogAction) -> Result<()> {
        match action {
            BacklogAction::List { priority } => {
                let lines = match priority {
                    Some(priority) => self
                        .store
                        .backlog_by_priority(priority)
                        .map(render::backlog_line)
                        .collect(),
                    None => self.store.backlog().map(render::backlog_line).collect(),
                };
                print_list(Collection::Backlog, lines);
            }
            BacklogAction::Add { id } => {
                if self.store.is_in_backlog(id) {
                    println!("Game {} is already in the backlog", id);
                    return Ok(());
                }
                let game = self.fetch_game(id).await?;
                println!("Added {} to the backlog", game.name);
                self.store.add_backlog(game);
            }
            BacklogAction::Remove { id } => {
                let removed = self.store.remove_backlog(id);
                report_removal(removed, Collection::Backlog, id);
            }
            BacklogAction::Priority { id, priority } => {
                if !self.store.update_backlog_priority(id, priority) {
                    bail!("Game {} is not in the backlog", id);
                }
                println!("Game {} is now {} priority", id, priority);
            }
            BacklogAction::Move { id, to } => {
                let moved = match to {
                    MoveTarget::Favorites => self.store.move_backlog_to_favorites(id),
                    MoveTarget::Completed => self.store.move_backlog_to_completed(id),
                };
                if !moved {
                    bail!("Game {} is not in the backlog", id);
                }
                println!("Moved {} to {}", id, Collection::from(to).as_str());
            }
        }
        Ok(())
    }

    async fn review_action(&mut self, action: ReviewAction) -> Result<()> {
        match action {
            ReviewAction::List => {
                if self.store.reviews().next().is_none() {
                    println!("No reviews yet");
                }
                for review in self.store.reviews() {
                    print_lines(render::review_lines(review));
                    println!();
                }
            }
            ReviewAction::Show { id } => match self.store.get_review(id) {
                Some(review) => print_lines(render::review_lines(review)),
                None => bail!("No review for game {}", id),
            },
            ReviewAction::Set { id, rating, text } => {
                if self.store.get_review(id).is_some() {
                    let mut update = ReviewUpdate::new().rating(rating);
                    if let Some(text) = text {
                        update = update.text(text);
                    }
                    self.store.update_review(id, update)?;
                    println!("Updated review for game {}", id);
                } else {
                    let text = text.unwrap_or_default();
                    let draft = match self.catalog.game_details(id).await {
                        Ok(details) => ReviewDraft::for_game(&details.game, rating, text),
                        Err(e) => {
                            warn!("Could not fetch game {} for its review: {}", id, e);
                            ReviewDraft::new(id, rating, text)
                        }
                    };
                    self.store.add_review(draft)?;
                    println!("Saved review for game {}", id);
                }
            }
            ReviewAction::Remove { id } => {
                let removed = self.store.remove_review(id);
                report_removal(removed, Collection::Reviews, id);
            }
        }
        Ok(())
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_list(collection: Collection, lines: Vec<String>) {
    if lines.is_empty() {
        println!("No games in {}", collection.as_str());
        return;
    }
    print_lines(lines);
}

fn report_removal(removed: bool, collection: Collection, id: GameId) {
    if removed {
        println!("Removed {} from {}", id, collection.as_str());
    } else {
        println!("Game {} is not in {}", id, collection.as_str());
    }
}
