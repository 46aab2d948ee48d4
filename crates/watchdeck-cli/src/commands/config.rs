use crate::output::Output;
use color_eyre::Result;
use watchdeck_config::{Config, PathManager};

pub fn run_config(api_key: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;

    let api_key = match api_key {
        Some(key) => key,
        None => dialoguer::Input::<String>::new()
            .with_prompt("TMDB API key")
            .interact()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))?,
    };

    if api_key.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("API key must not be empty"));
    }

    config.tmdb.api_key = Some(api_key.trim().to_string());
    config
        .save_to_file(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;

    output.success(format!(
        "Configuration written to {}.",
        paths.config_file().display()
    ));
    Ok(())
}
