use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared progress handle for one import run. The reconciler advances it
/// once per processed row; observers (the CLI progress bar) poll it from
/// another task. Increments are strictly ordered because the loop itself is.
#[derive(Clone, Default)]
pub struct ImportProgress {
    inner: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    processed: AtomicUsize,
    total: AtomicUsize,
}

impl ImportProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_total(&self, total: usize) {
        self.inner.total.store(total, Ordering::SeqCst);
    }

    pub(crate) fn advance(&self) {
        self.inner.processed.fetch_add(1, Ordering::SeqCst);
    }

    /// Rows processed so far: resolved, not found, already present, or
    /// dropped as same-run duplicates.
    pub fn processed(&self) -> usize {
        self.inner.processed.load(Ordering::SeqCst)
    }

    /// Parsed row count, fixed before the loop starts. Zero until parsing
    /// has finished.
    pub fn total(&self) -> usize {
        self.inner.total.load(Ordering::SeqCst)
    }
}
