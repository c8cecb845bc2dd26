/// TMDB (The Movie Database) v3 catalog
///
/// Endpoints used:
/// 1. Genres: /genre/movie/list
/// 2. Discovery: /discover/movie (sorted by rating, vote-count floor)
/// 3. Search: /search/movie
/// 4. Similar titles: /movie/{id}/similar
///
/// Authentication is the `api_key` query parameter on every request.
use crate::{
    error::{AppError, AppResult},
    models::{Genre, Movie, TmdbGenreList, TmdbMoviePage},
    services::catalog::MovieCatalog,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Discovery ignores titles with fewer votes than this
const MIN_VOTE_COUNT: u32 = 1000;
const DISCOVER_SORT: &str = "vote_average.desc";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET and decodes the body
    ///
    /// Returns `Ok(None)` for non-success statuses and undecodable bodies so
    /// callers can treat them as "no results". Transport errors propagate with
    /// the URL stripped, since it carries the API key.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = self.url(path);
        tracing::debug!(url = %url, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB returned non-success status, treating as empty"
            );
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(e.without_url()))?;
        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                tracing::warn!(
                    path = %path,
                    error = %e,
                    "Failed to parse TMDB response, treating as empty"
                );
                Ok(None)
            }
        }
    }

    async fn get_movies(&self, path: &str, params: &[(&str, String)]) -> AppResult<Vec<Movie>> {
        Ok(self
            .get_json::<TmdbMoviePage>(path, params)
            .await?
            .map(|page| page.results)
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbClient {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let genres = self
            .get_json::<TmdbGenreList>("/genre/movie/list", &[])
            .await?
            .map(|list| list.genres)
            .unwrap_or_default();

        tracing::info!(genres = genres.len(), provider = "tmdb", "Genres fetched");

        Ok(genres)
    }

    async fn discover_by_genre(&self, genre_id: u64, page: u32) -> AppResult<Vec<Movie>> {
        let movies = self
            .get_movies("/discover/movie", &discover_params(genre_id, page))
            .await?;

        tracing::info!(
            genre_id = genre_id,
            page = page,
            results = movies.len(),
            provider = "tmdb",
            "Genre discovery page fetched"
        );

        Ok(movies)
    }

    async fn search_by_title(&self, query: &str) -> AppResult<Vec<Movie>> {
        let movies = self
            .get_movies("/search/movie", &[("query", query.to_string())])
            .await?;

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(movies)
    }

    async fn similar_to(&self, movie_id: u64, page: u32) -> AppResult<Vec<Movie>> {
        let movies = self
            .get_movies(
                &format!("/movie/{}/similar", movie_id),
                &[("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            movie_id = movie_id,
            page = page,
            results = movies.len(),
            provider = "tmdb",
            "Similar titles page fetched"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

fn discover_params(genre_id: u64, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("with_genres", genre_id.to_string()),
        ("page", page.to_string()),
        ("sort_by", DISCOVER_SORT.to_string()),
        ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
    ]
}
