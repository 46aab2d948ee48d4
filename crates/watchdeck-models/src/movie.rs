use serde::{Deserialize, Serialize};

/// A tracked movie: TMDB identity plus the user's flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: String, // TMDB identifier, kept as a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub watched: bool,
    pub favourite: bool,
}

impl Movie {
    /// Year portion of the release date, when one is set.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}
