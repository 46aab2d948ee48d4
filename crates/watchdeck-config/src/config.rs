use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved TMDB API key. The environment variable wins over the file so
    /// containers can inject the key without mounting a config.
    pub fn tmdb_api_key(&self) -> Option<String> {
        std::env::var("WATCHDECK_TMDB_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.tmdb.api_key.clone())
    }
}
