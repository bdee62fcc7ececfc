//! GamesInfo command-line browser
//!
//! Searches the games catalog and manages the local collection: favorites,
//! completed games, a prioritized backlog and personal reviews.

mod commands;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, warn};

use gamesinfo_catalog::{CatalogClient, CatalogConfig, SortOrder};
use gamesinfo_collection::{
    Collection, CollectionStore, FileStorage, GameId, MemoryStorage, Priority, SqliteStorage,
};
use gamesinfo_config::{CatalogSettings, GamesInfoConfig, StorageBackend, StorageConfig};

use crate::commands::App;

/// GamesInfo - browse games and keep track of what you play
#[derive(Parser, Debug)]
#[command(name = "gamesinfo")]
#[command(version)]
#[command(about = "Browse the games catalog and manage your collection")]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the collection
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog
    Search {
        /// Free-text query
        query: Option<String>,

        /// Platform id
        #[arg(long)]
        platform: Option<u64>,

        /// Genre id
        #[arg(long)]
        genre: Option<u64>,

        /// Sort field, prefixed with '-' for descending (e.g. -rating)
        #[arg(long, allow_hyphen_values = true)]
        ordering: Option<SortOrder>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show a game's details and where it is in your collection
    Show { id: GameId },

    /// Manage favorite games
    Favorites {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Manage completed games
    Completed {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Manage the backlog
    Backlog {
        #[command(subcommand)]
        action: BacklogAction,
    },

    /// Manage reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Collection statistics
    Stats,
}

#[derive(Subcommand, Debug)]
enum ListAction {
    /// List entries, oldest first
    List,
    /// Add a game by catalog id
    Add { id: GameId },
    /// Remove a game
    Remove { id: GameId },
}

#[derive(Subcommand, Debug)]
enum BacklogAction {
    /// List entries, oldest first
    List {
        /// Only show one priority
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Add a game by catalog id
    Add { id: GameId },
    /// Remove a game
    Remove { id: GameId },
    /// Change a game's priority
    Priority { id: GameId, priority: Priority },
    /// Move a game out of the backlog
    Move {
        id: GameId,
        #[arg(long, value_enum)]
        to: MoveTarget,
    },
}

#[derive(Subcommand, Debug)]
enum ReviewAction {
    /// List reviews
    List,
    /// Show one review
    Show { id: GameId },
    /// Write or edit a review
    Set {
        id: GameId,
        /// Stars, 1 to 5
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete a review
    Remove { id: GameId },
}

/// Destination of a backlog move
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MoveTarget {
    Favorites,
    Completed,
}

impl From<MoveTarget> for Collection {
    fn from(target: MoveTarget) -> Self {
        match target {
            MoveTarget::Favorites => Collection::Favorites,
            MoveTarget::Completed => Collection::Completed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let mut config =
        GamesInfoConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    debug!("Using {:?} storage backend", config.storage.backend);

    let catalog = CatalogClient::new(catalog_config(&config.catalog))
        .context("Failed to create catalog client")?;
    let store = open_store(&config.storage);

    let mut app = App::new(catalog, store);
    let result = app.run(cli.command).await;

    // Always try to write pending changes, even when the command failed
    if let Err(e) = app.into_store().close() {
        warn!("Failed to save collection: {}", e);
    }

    result
}

/// Setup logging
fn setup_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn catalog_config(settings: &CatalogSettings) -> CatalogConfig {
    CatalogConfig {
        base_url: settings.base_url.clone(),
        api_key: settings.api_key.clone(),
        page_size: settings.page_size,
        timeout: std::time::Duration::from_secs(settings.timeout_secs),
        max_retries: settings.max_retries,
        cache_ttl: std::time::Duration::from_secs(settings.cache_ttl_secs),
        ..CatalogConfig::default()
    }
}

/// Open the collection on the configured backend
///
/// A database that cannot be opened falls back to memory so the catalog stays
/// usable; nothing is saved in that case.
fn open_store(storage: &StorageConfig) -> CollectionStore {
    let key = storage.namespace_key.clone();
    let store = match storage.backend {
        StorageBackend::File => {
            CollectionStore::open(FileStorage::new(storage.resolved_data_dir()), key)
        }
        StorageBackend::Sqlite => match SqliteStorage::open(storage.database_path()) {
            Ok(db) => CollectionStore::open(db, key),
            Err(e) => {
                warn!(
                    "Failed to open {}: {}; changes will not be saved",
                    storage.database_path().display(),
                    e
                );
                CollectionStore::open(MemoryStorage::new(), key)
            }
        },
        StorageBackend::Memory => CollectionStore::open(MemoryStorage::new(), key),
    };
    if store.is_degraded() {
        warn!("Saved collection could not be loaded; it will not be overwritten until it can be read");
    }
    store
}
