pub mod parser;
pub mod progress;

use std::collections::HashSet;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use watchdeck_catalog::{CatalogError, CatalogLookup};
use watchdeck_models::{CollectionEntry, Movie, UserProfile};

use crate::store::ProfileStore;
use parser::ImportFormat;
use progress::ImportProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("input has no id column")]
    MissingIdColumn,

    #[error("catalog is unreachable")]
    Offline(#[source] CatalogError),

    #[error("lookup for id {id} failed: {source}")]
    Lookup {
        id: String,
        #[source]
        source: CatalogError,
    },

    #[error("failed to persist collection")]
    Store(#[source] anyhow::Error),
}

/// Result of one import run. Only `added` reaches the persisted profile;
/// the other buckets exist for reporting.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub added: Vec<CollectionEntry>,
    pub not_found: Vec<String>,
    pub already_present: Vec<String>,
}

/// Bulk-import reconciler. Parses the raw input, drops same-run duplicates
/// and ids already in the collection, resolves the rest against the catalog
/// one at a time, and commits everything that resolved in a single profile
/// write.
pub struct Importer<'a> {
    catalog: &'a dyn CatalogLookup,
    store: &'a dyn ProfileStore,
    cancel: CancellationToken,
    progress: ImportProgress,
}

impl<'a> Importer<'a> {
    pub fn new(catalog: &'a dyn CatalogLookup, store: &'a dyn ProfileStore) -> Self {
        Self {
            catalog,
            store,
            cancel: CancellationToken::new(),
            progress: ImportProgress::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token observed at the top of each loop iteration. Cancelling commits
    /// whatever has resolved so far; it never interrupts an in-flight
    /// lookup.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll-able progress handle, safe to clone into another task.
    pub fn progress(&self) -> ImportProgress {
        self.progress.clone()
    }

    pub async fn run(
        &self,
        input: &str,
        format: ImportFormat,
        profile: &mut UserProfile,
    ) -> Result<ImportOutcome, ImportError> {
        let rows = parser::parse_rows(input, format)?;
        self.progress.set_total(rows.len());

        // Snapshot of what the collection already holds, computed once.
        let existing: HashSet<String> = profile
            .watchlist
            .iter()
            .map(|entry| entry.movie.id.clone())
            .collect();
        let mut seen: HashSet<String> = HashSet::new();

        let mut to_add: Vec<CollectionEntry> = Vec::new();
        let mut not_found: Vec<String> = Vec::new();
        let mut already_present: Vec<String> = Vec::new();

        info!(rows = rows.len(), "Starting import run");

        for row in rows {
            if self.cancel.is_cancelled() {
                info!(
                    resolved = to_add.len(),
                    "Import cancelled, committing entries resolved so far"
                );
                break;
            }

            // Same-run duplicates are dropped before the collection check,
            // so a repeated id never reaches any outcome bucket.
            if !seen.insert(row.id.clone()) {
                debug!(id = %row.id, "Duplicate id within this import, skipping");
                self.progress.advance();
                continue;
            }

            if existing.contains(&row.id) {
                debug!(id = %row.id, "Already in collection, skipping lookup");
                already_present.push(row.id);
                self.progress.advance();
                continue;
            }

            match self.catalog.fetch_by_id(&row.id).await {
                Ok(Some(record)) => {
                    to_add.push(CollectionEntry::new(Movie {
                        id: record.id.to_string(),
                        title: record.title,
                        poster_path: record.poster_path,
                        release_date: record.release_date,
                        watched: row.watched,
                        favourite: row.favourite,
                    }));
                }
                Ok(None) => {
                    debug!(id = %row.id, "No catalog record found");
                    not_found.push(row.id);
                }
                Err(source) => {
                    // Fail fast: the run aborts and nothing accumulated so
                    // far is committed.
                    warn!(id = %row.id, error = %source, "Lookup failed, aborting import");
                    return Err(ImportError::Lookup { id: row.id, source });
                }
            }
            self.progress.advance();
        }

        if !to_add.is_empty() {
            profile.watchlist.extend(to_add.iter().cloned());
            self.store.write(profile).map_err(ImportError::Store)?;
        }

        info!(
            added = to_add.len(),
            not_found = not_found.len(),
            already_present = already_present.len(),
            "Import run finished"
        );

        Ok(ImportOutcome {
            added: to_add,
            not_found,
            already_present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use watchdeck_catalog::CatalogRecord;

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Option<UserProfile>>,
        writes: Mutex<usize>,
    }

    impl ProfileStore for MemoryStore {
        fn read(&self) -> anyhow::Result<Option<UserProfile>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        fn write(&self, profile: &UserProfile) -> anyhow::Result<()> {
            *self.saved.lock().unwrap() = Some(profile.clone());
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }

    /// Scripted catalog: known records resolve, `fail_on` raises a
    /// transport-style error, everything else is not found. Optionally
    /// cancels a token after serving N lookups.
    #[derive(Default)]
    struct StubCatalog {
        records: HashMap<String, CatalogRecord>,
        fail_on: Option<String>,
        calls: Mutex<Vec<String>>,
        served: AtomicUsize,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl StubCatalog {
        fn with_records(ids: &[&str]) -> Self {
            let records = ids
                .iter()
                .map(|id| {
                    let numeric: u64 = id.parse().unwrap();
                    (
                        id.to_string(),
                        CatalogRecord {
                            id: numeric,
                            title: Some(format!("Movie {}", id)),
                            poster_path: Some(format!("/poster-{}.jpg", id)),
                            release_date: Some("1994-09-10".to_string()),
                        },
                    )
                })
                .collect();
            Self {
                records,
                ..Default::default()
            }
        }

        fn lookups(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogLookup for StubCatalog {
        async fn fetch_by_id(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError> {
            self.calls.lock().unwrap().push(id.to_string());

            if self.fail_on.as_deref() == Some(id) {
                return Err(CatalogError::Status(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }

            let result = self.records.get(id).cloned();
            let served = self.served.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, token)) = &self.cancel_after {
                if served == *after {
                    token.cancel();
                }
            }
            Ok(result)
        }
    }

    fn entry(id: &str) -> CollectionEntry {
        CollectionEntry::new(Movie {
            id: id.to_string(),
            title: Some(format!("Movie {}", id)),
            poster_path: None,
            release_date: None,
            watched: false,
            favourite: false,
        })
    }

    #[tokio::test]
    async fn test_duplicate_in_run_dropped_before_lookup() {
        let catalog = StubCatalog::with_records(&["680", "11"]);
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();

        let importer = Importer::new(&catalog, &store);
        let outcome = importer
            .run("680,11,680", ImportFormat::IdList, &mut profile)
            .await
            .unwrap();

        assert_eq!(outcome.added.len(), 2);
        assert_eq!(outcome.added[0].movie.id, "680");
        assert_eq!(outcome.added[1].movie.id, "11");
        assert!(outcome.not_found.is_empty());
        assert!(outcome.already_present.is_empty());
        // The duplicate never reached the catalog.
        assert_eq!(catalog.lookups(), vec!["680", "11"]);
        assert_eq!(profile.watchlist.len(), 2);
        assert_eq!(*store.writes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_already_present_never_looked_up() {
        let catalog = StubCatalog::with_records(&["680", "11"]);
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();
        profile.watchlist.push(entry("680"));

        let importer = Importer::new(&catalog, &store);
        let outcome = importer
            .run("680,11", ImportFormat::IdList, &mut profile)
            .await
            .unwrap();

        assert_eq!(outcome.already_present, vec!["680".to_string()]);
        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.added[0].movie.id, "11");
        assert_eq!(catalog.lookups(), vec!["11"]);
    }

    #[tokio::test]
    async fn test_not_found_and_added_partition() {
        let catalog = StubCatalog::with_records(&["680", "550"]);
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();

        let importer = Importer::new(&catalog, &store);
        let outcome = importer
            .run("680,999999,550,888888", ImportFormat::IdList, &mut profile)
            .await
            .unwrap();

        let added_ids: Vec<&str> = outcome.added.iter().map(|e| e.movie.id.as_str()).collect();
        assert_eq!(added_ids, vec!["680", "550"]);
        assert_eq!(
            outcome.not_found,
            vec!["999999".to_string(), "888888".to_string()]
        );
        for id in &outcome.not_found {
            assert!(!added_ids.contains(&id.as_str()));
        }
    }

    #[tokio::test]
    async fn test_transport_error_aborts_without_commit() {
        let mut catalog = StubCatalog::with_records(&["1", "2", "4", "5"]);
        catalog.fail_on = Some("3".to_string());
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();

        let importer = Importer::new(&catalog, &store);
        let result = importer
            .run("1,2,3,4,5", ImportFormat::IdList, &mut profile)
            .await;

        match result {
            Err(ImportError::Lookup { id, .. }) => assert_eq!(id, "3"),
            other => panic!("expected lookup error, got {:?}", other),
        }
        // Two lookups had succeeded in memory; none were committed.
        assert_eq!(catalog.lookups(), vec!["1", "2", "3"]);
        assert!(profile.watchlist.is_empty());
        assert_eq!(*store.writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_commits_partial_progress() {
        let token = CancellationToken::new();
        let mut catalog = StubCatalog::with_records(&["1", "2", "3", "4"]);
        catalog.cancel_after = Some((2, token.clone()));
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();

        let importer = Importer::new(&catalog, &store).with_cancellation(token);
        let progress = importer.progress();
        let outcome = importer
            .run("1,2,3,4", ImportFormat::IdList, &mut profile)
            .await
            .unwrap();

        // Exactly the two lookups completed before cancellation are kept;
        // the rest stay unprocessed and unreported.
        assert_eq!(outcome.added.len(), 2);
        assert!(outcome.not_found.is_empty());
        assert!(outcome.already_present.is_empty());
        assert_eq!(catalog.lookups(), vec!["1", "2"]);
        assert_eq!(profile.watchlist.len(), 2);
        assert_eq!(*store.writes.lock().unwrap(), 1);
        assert_eq!(progress.processed(), 2);
        assert_eq!(progress.total(), 4);
    }

    #[tokio::test]
    async fn test_tabular_flags_carried_into_entries() {
        let catalog = StubCatalog::with_records(&["680", "11"]);
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();

        let importer = Importer::new(&catalog, &store);
        let outcome = importer
            .run(
                "id,watched,favourite\n680,1,0\n11,0,1\n",
                ImportFormat::Tabular,
                &mut profile,
            )
            .await
            .unwrap();

        assert!(outcome.added[0].movie.watched);
        assert!(!outcome.added[0].movie.favourite);
        assert!(!outcome.added[1].movie.watched);
        assert!(outcome.added[1].movie.favourite);
        // Catalog metadata rides along with the flags.
        assert_eq!(outcome.added[0].movie.title.as_deref(), Some("Movie 680"));
    }

    #[tokio::test]
    async fn test_progress_reaches_total_on_full_run() {
        let catalog = StubCatalog::with_records(&["680"]);
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();
        profile.watchlist.push(entry("11"));

        let importer = Importer::new(&catalog, &store);
        let progress = importer.progress();
        importer
            .run("680,680,11,404", ImportFormat::IdList, &mut profile)
            .await
            .unwrap();

        // Duplicate, already-present, and not-found rows all count.
        assert_eq!(progress.total(), 4);
        assert_eq!(progress.processed(), 4);
    }

    #[tokio::test]
    async fn test_empty_outcome_writes_nothing() {
        let catalog = StubCatalog::with_records(&[]);
        let store = MemoryStore::default();
        let mut profile = UserProfile::default();

        let importer = Importer::new(&catalog, &store);
        let outcome = importer
            .run("404", ImportFormat::IdList, &mut profile)
            .await
            .unwrap();

        assert!(outcome.added.is_empty());
        assert_eq!(outcome.not_found, vec!["404".to_string()]);
        assert_eq!(*store.writes.lock().unwrap(), 0);
    }
}
