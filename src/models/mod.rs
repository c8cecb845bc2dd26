use serde::{Deserialize, Deserializer, Serialize};

mod platform;
mod recommendation;

pub use platform::{Platform, WhereToWatch, PURCHASE_FALLBACK};
pub use recommendation::{
    MovieCard, RecommendationMode, RecommendationState, RecommendationView, Session, FETCH_PAGES,
    PAGE_SIZE,
};

/// A movie as returned by the metadata service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    /// Average user rating on a 0-10 scale; missing or null counts as 0
    #[serde(default, deserialize_with = "null_as_zero")]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: Option<String>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paginated list endpoints (`/discover/movie`, `/search/movie`, `/movie/{id}/similar`)
#[derive(Debug, Deserialize)]
pub struct TmdbMoviePage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// `/genre/movie/list`
#[derive(Debug, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}
