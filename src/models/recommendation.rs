use std::time::{Duration, Instant};

use serde::Serialize;

use super::Movie;
use crate::error::{AppError, AppResult};

/// Number of results revealed per "show more"
pub const PAGE_SIZE: usize = 10;

/// Remote pages fetched per interaction (caps the pool at roughly 60 movies)
pub const FETCH_PAGES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    Genre,
    Title,
}

/// Reveal state for one recommendation mode
///
/// `Loaded` holds the complete sorted candidate list; "show more" only moves
/// the reveal window over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecommendationState {
    #[default]
    Idle,
    Loaded {
        /// Genre name or searched title
        query: String,
        /// Sorted by rating, descending
        results: Vec<Movie>,
        /// Number of "show more" actions since the last load
        page: usize,
    },
}

impl RecommendationState {
    pub fn loaded(query: impl Into<String>, results: Vec<Movie>) -> Self {
        RecommendationState::Loaded {
            query: query.into(),
            results,
            page: 0,
        }
    }

    /// Reveals the next page of the already computed list
    pub fn show_more(self) -> AppResult<Self> {
        match self {
            RecommendationState::Idle => Err(AppError::InvalidInput(
                "Nothing to expand, run a search first".to_string(),
            )),
            loaded if !loaded.has_more() => Ok(loaded),
            RecommendationState::Loaded {
                query,
                results,
                page,
            } => Ok(RecommendationState::Loaded {
                query,
                results,
                page: page + 1,
            }),
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            RecommendationState::Idle => None,
            RecommendationState::Loaded { query, .. } => Some(query),
        }
    }

    pub fn total(&self) -> usize {
        match self {
            RecommendationState::Idle => 0,
            RecommendationState::Loaded { results, .. } => results.len(),
        }
    }

    pub fn revealed(&self) -> usize {
        match self {
            RecommendationState::Idle => 0,
            RecommendationState::Loaded { results, page, .. } => {
                (PAGE_SIZE * (page + 1)).min(results.len())
            }
        }
    }

    pub fn has_more(&self) -> bool {
        match self {
            RecommendationState::Idle => false,
            RecommendationState::Loaded { results, page, .. } => {
                PAGE_SIZE * (page + 1) < results.len()
            }
        }
    }

    pub fn visible(&self) -> &[Movie] {
        match self {
            RecommendationState::Idle => &[],
            RecommendationState::Loaded { results, .. } => &results[..self.revealed()],
        }
    }
}

/// Per-user session: one independent state per mode
#[derive(Debug, Clone)]
pub struct Session {
    pub genre: RecommendationState,
    pub title: RecommendationState,
    last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            genre: RecommendationState::Idle,
            title: RecommendationState::Idle,
            last_seen: Instant::now(),
        }
    }
}

impl Session {
    /// Marks the session as used just now
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// True once the session has gone unused for longer than `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() > ttl
    }

    pub fn state_mut(&mut self, mode: RecommendationMode) -> &mut RecommendationState {
        match mode {
            RecommendationMode::Genre => &mut self.genre,
            RecommendationMode::Title => &mut self.title,
        }
    }
}

/// Rendered movie, ready for display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    /// One decimal place, e.g. "8.7"
    pub rating: String,
    /// Comma-separated platforms, or the purchase fallback
    pub where_to_watch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub mode: RecommendationMode,
    pub query: Option<String>,
    pub movies: Vec<MovieCard>,
    pub revealed: usize,
    pub total: usize,
    pub has_more: bool,
}
