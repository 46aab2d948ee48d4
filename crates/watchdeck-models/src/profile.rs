use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::Movie;

/// One entry of the persisted collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionEntry {
    pub movie: Movie,
    pub added_at: DateTime<Utc>,
}

impl CollectionEntry {
    pub fn new(movie: Movie) -> Self {
        Self {
            movie,
            added_at: Utc::now(),
        }
    }
}

/// The whole persisted user profile. Read and written as a single JSON
/// document; last writer wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub watchlist: Vec<CollectionEntry>,
}

impl UserProfile {
    pub fn contains(&self, id: &str) -> bool {
        self.watchlist.iter().any(|entry| entry.movie.id == id)
    }

    pub fn entry(&self, id: &str) -> Option<&CollectionEntry> {
        self.watchlist.iter().find(|entry| entry.movie.id == id)
    }

    pub fn entry_mut(&mut self, id: &str) -> Option<&mut CollectionEntry> {
        self.watchlist.iter_mut().find(|entry| entry.movie.id == id)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: "user".to_string(),
            watchlist: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: Some(format!("Movie {}", id)),
            poster_path: None,
            release_date: Some("1994-09-23".to_string()),
            watched: false,
            favourite: false,
        }
    }

    #[test]
    fn test_contains_checks_movie_id() {
        let mut profile = UserProfile::default();
        profile.watchlist.push(CollectionEntry::new(movie("680")));

        assert!(profile.contains("680"));
        assert!(!profile.contains("11"));
    }

    #[test]
    fn test_profile_json_round_trip() {
        let mut profile = UserProfile::default();
        profile.watchlist.push(CollectionEntry::new(movie("680")));

        let json = serde_json::to_string(&profile).unwrap();
        let loaded: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let entry = CollectionEntry::new(Movie {
            id: "11".to_string(),
            title: None,
            poster_path: None,
            release_date: None,
            watched: false,
            favourite: false,
        });

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("poster_path"));
        assert!(!json.contains("title"));
    }
}
