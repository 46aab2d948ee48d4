use crate::output::Output;
use color_eyre::Result;
use watchdeck_catalog::CatalogRecord;
use watchdeck_core::actions;
use watchdeck_models::Movie;

fn movie_from_record(record: CatalogRecord) -> Movie {
    Movie {
        id: record.id.to_string(),
        title: record.title,
        poster_path: record.poster_path,
        release_date: record.release_date,
        watched: false,
        favourite: false,
    }
}

async fn fetch_record(id: &str) -> Result<Option<CatalogRecord>> {
    let client = super::tmdb_client()?;
    client
        .get_movie_by_id(id)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Catalog lookup for id {} failed: {}", id, e))
}

pub async fn run_add(id: &str, output: &Output) -> Result<()> {
    let store = super::profile_store()?;
    let mut profile = super::load_profile(&store)?;

    if profile.contains(id) {
        output.warn(format!("Id {} is already in the collection.", id));
        return Ok(());
    }

    let Some(record) = fetch_record(id).await? else {
        output.error(format!("No catalog record found for id {}.", id));
        return Ok(());
    };

    let title = record.title.clone().unwrap_or_else(|| id.to_string());
    actions::add_to_watchlist(&mut profile, movie_from_record(record), &store)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    output.success(format!("Added {} to the collection.", title));
    Ok(())
}

pub fn run_remove(id: &str, output: &Output) -> Result<()> {
    let store = super::profile_store()?;
    let mut profile = super::load_profile(&store)?;

    let removed = actions::remove_from_watchlist(&mut profile, id, &store)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    if removed {
        output.success(format!("Removed {} from the collection.", id));
    } else {
        output.warn(format!("Id {} is not in the collection.", id));
    }
    Ok(())
}

pub async fn run_watched(id: &str, output: &Output) -> Result<()> {
    let store = super::profile_store()?;
    let mut profile = super::load_profile(&store)?;

    // Toggling an untracked movie adds it, so fetch metadata first in that
    // case; a tracked movie already carries its own.
    let movie = match profile.entry(id) {
        Some(entry) => entry.movie.clone(),
        None => {
            let Some(record) = fetch_record(id).await? else {
                output.error(format!("No catalog record found for id {}.", id));
                return Ok(());
            };
            movie_from_record(record)
        }
    };

    let watched = actions::toggle_watched(&mut profile, movie, &store)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    output.success(format!(
        "Marked {} as {}.",
        id,
        if watched { "watched" } else { "unwatched" }
    ));
    Ok(())
}

pub fn run_favourite(id: &str, output: &Output) -> Result<()> {
    let store = super::profile_store()?;
    let mut profile = super::load_profile(&store)?;

    match actions::toggle_favourite(&mut profile, id, &store)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?
    {
        Some(true) => output.success(format!("Added {} to favourites.", id)),
        Some(false) => output.success(format!("Removed {} from favourites.", id)),
        None => output.warn(format!("Id {} is not in the collection.", id)),
    }
    Ok(())
}
