use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;
use crate::traits::CatalogLookup;

// TMDB API base URL
const API_BASE: &str = "https://api.themoviedb.org/3";

/// A movie record as the catalog returns it. TMDB ids are numeric on the
/// wire; the rest of the system keys by their string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<CatalogRecord>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch one movie by TMDB id. A 404 means the identifier resolves to no
    /// record and is not an error.
    pub async fn get_movie_by_id(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        let url = format!(
            "{}/movie/{}?api_key={}",
            self.base_url,
            urlencoding::encode(id),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(id = %id, "No catalog record for id");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let record: CatalogRecord = response.json().await?;
        Ok(Some(record))
    }

    /// Search the catalog by title.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        let url = format!(
            "{}/search/movie?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        debug!(query = %query, results = body.results.len(), "Catalog search completed");
        Ok(body.results)
    }

    /// Cheap reachability check, run once before an import starts. Any
    /// failure here means the run must not start at all.
    pub async fn probe(&self) -> Result<(), CatalogError> {
        let url = format!("{}/configuration?api_key={}", self.base_url, self.api_key);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogLookup for TmdbClient {
    async fn fetch_by_id(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        self.get_movie_by_id(id).await
    }
}
