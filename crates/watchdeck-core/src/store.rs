use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::{debug, warn};
use watchdeck_models::UserProfile;

/// Persistence seam for the user profile. One whole-document read, one
/// whole-document write; last writer wins.
pub trait ProfileStore: Send + Sync {
    fn read(&self) -> Result<Option<UserProfile>>;
    fn write(&self, profile: &UserProfile) -> Result<()>;
}

/// Profile persisted as a single pretty-printed JSON file.
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ProfileStore for JsonProfileStore {
    fn read(&self) -> Result<Option<UserProfile>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No profile file yet");
            return Ok(None);
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<UserProfile>(&content) {
                Ok(profile) => {
                    debug!(
                        entries = profile.watchlist.len(),
                        "Loaded profile from {}",
                        self.path.display()
                    );
                    Ok(Some(profile))
                }
                Err(e) => {
                    // Treated as absent rather than fatal; the next write
                    // replaces the document wholesale.
                    warn!(
                        "Profile file {} is corrupted: {}. Treating as absent.",
                        self.path.display(),
                        e
                    );
                    Ok(None)
                }
            },
            Err(e) => {
                warn!("Failed to read profile file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn write(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| anyhow!("Failed to serialize profile: {}", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| anyhow!("Failed to write profile to {}: {}", self.path.display(), e))?;
        debug!(
            entries = profile.watchlist.len(),
            "Saved profile to {}",
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use watchdeck_models::{CollectionEntry, Movie};

    fn sample_profile() -> UserProfile {
        let mut profile = UserProfile::default();
        profile.watchlist.push(CollectionEntry::new(Movie {
            id: "680".to_string(),
            title: Some("Pulp Fiction".to_string()),
            poster_path: Some("/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg".to_string()),
            release_date: Some("1994-09-10".to_string()),
            watched: true,
            favourite: false,
        }));
        profile
    }

    #[test]
    fn test_read_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(dir.path().join("profile.json"));
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(dir.path().join("data").join("profile.json"));

        let profile = sample_profile();
        store.write(&profile).unwrap();

        let loaded = store.read().unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_corrupted_file_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{{not json").unwrap();

        let store = JsonProfileStore::new(path);
        assert!(store.read().unwrap().is_none());
    }
}
