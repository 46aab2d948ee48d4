pub mod config;
pub mod import;
pub mod import_ui;
pub mod list;
pub mod movie;
pub mod search;

use color_eyre::Result;
use watchdeck_catalog::TmdbClient;
use watchdeck_config::{Config, PathManager};
use watchdeck_core::{JsonProfileStore, ProfileStore};
use watchdeck_models::UserProfile;

/// Profile store rooted at the default data directory.
pub fn profile_store() -> Result<JsonProfileStore> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;
    Ok(JsonProfileStore::new(paths.profile_file()))
}

/// Load the persisted profile, falling back to an empty one.
pub fn load_profile(store: &JsonProfileStore) -> Result<UserProfile> {
    let profile = store
        .read()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read profile: {}", e))?
        .unwrap_or_default();
    Ok(profile)
}

/// TMDB client from the configured API key.
pub fn tmdb_client() -> Result<TmdbClient> {
    let paths = PathManager::default();
    let config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;

    let api_key = config.tmdb_api_key().ok_or_else(|| {
        color_eyre::eyre::eyre!(
            "No TMDB API key configured. Run `watchdeck config` or set WATCHDECK_TMDB_API_KEY."
        )
    })?;

    Ok(TmdbClient::new(api_key))
}
