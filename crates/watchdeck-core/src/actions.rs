use anyhow::Result;
use tracing::{debug, info};
use watchdeck_models::{CollectionEntry, Movie, UserProfile};

use crate::store::ProfileStore;

/// Add a movie to the collection. No-op when the id is already present.
pub fn add_to_watchlist(
    profile: &mut UserProfile,
    movie: Movie,
    store: &dyn ProfileStore,
) -> Result<bool> {
    if profile.contains(&movie.id) {
        debug!(id = %movie.id, "Movie already in collection, not adding");
        return Ok(false);
    }

    info!(id = %movie.id, title = ?movie.title, "Adding movie to collection");
    profile.watchlist.push(CollectionEntry::new(movie));
    store.write(profile)?;
    Ok(true)
}

/// Remove a movie from the collection by id.
pub fn remove_from_watchlist(
    profile: &mut UserProfile,
    id: &str,
    store: &dyn ProfileStore,
) -> Result<bool> {
    let before = profile.watchlist.len();
    profile.watchlist.retain(|entry| entry.movie.id != id);
    if profile.watchlist.len() == before {
        debug!(id = %id, "Movie not in collection, nothing to remove");
        return Ok(false);
    }

    info!(id = %id, "Removed movie from collection");
    store.write(profile)?;
    Ok(true)
}

/// Flip the watched flag. A movie not yet in the collection is added and
/// marked watched in the same step.
pub fn toggle_watched(
    profile: &mut UserProfile,
    movie: Movie,
    store: &dyn ProfileStore,
) -> Result<bool> {
    let watched = match profile.entry_mut(&movie.id) {
        Some(entry) => {
            entry.movie.watched = !entry.movie.watched;
            entry.movie.watched
        }
        None => {
            let mut movie = movie;
            movie.watched = true;
            profile.watchlist.push(CollectionEntry::new(movie));
            true
        }
    };

    info!(watched = watched, "Toggled watched flag");
    store.write(profile)?;
    Ok(watched)
}

/// Flip the favourite flag. No-op when the movie is not in the collection.
pub fn toggle_favourite(
    profile: &mut UserProfile,
    id: &str,
    store: &dyn ProfileStore,
) -> Result<Option<bool>> {
    let favourite = match profile.entry_mut(id) {
        Some(entry) => {
            entry.movie.favourite = !entry.movie.favourite;
            entry.movie.favourite
        }
        None => {
            debug!(id = %id, "Movie not in collection, favourite unchanged");
            return Ok(None);
        }
    };

    info!(id = %id, favourite = favourite, "Toggled favourite flag");
    store.write(profile)?;
    Ok(Some(favourite))
}
