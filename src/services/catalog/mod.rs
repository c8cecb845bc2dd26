/// Movie metadata catalog abstraction
///
/// The recommendation flow only depends on this trait, so the remote service
/// can be swapped or stubbed out in tests.
use crate::{
    error::AppResult,
    models::{Genre, Movie},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Read-only access to a remote movie catalog
///
/// Implementations return an empty list when the service answers with an
/// error status or without results; only transport failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// All movie genres known to the catalog
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    /// One page of movies in a genre, best rated first, restricted to
    /// well-voted titles
    async fn discover_by_genre(&self, genre_id: u64, page: u32) -> AppResult<Vec<Movie>>;

    /// Movies matching a title query, best textual match first
    async fn search_by_title(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// One page of movies similar to the given one
    async fn similar_to(&self, movie_id: u64, page: u32) -> AppResult<Vec<Movie>>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
