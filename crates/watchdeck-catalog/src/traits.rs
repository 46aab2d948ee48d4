use async_trait::async_trait;

use crate::error::CatalogError;
use crate::tmdb::CatalogRecord;

/// Lookup seam of the catalog. `None` means the identifier resolved to no
/// record; `Err` means the call itself failed and the caller must not treat
/// the identifier as missing.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn fetch_by_id(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError>;
}
