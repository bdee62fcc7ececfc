//! Standard filesystem locations

use directories::ProjectDirs;
use std::path::PathBuf;

/// Directory name used when no platform directories are available
pub const FALLBACK_DIR: &str = ".gamesinfo";

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "GamesInfo", "gamesinfo")
}

/// Per-user configuration directory
pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}

/// Per-user data directory, where the collection is stored
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR).join("data"))
}

/// Default config file location
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}
