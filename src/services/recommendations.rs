use crate::{
    error::{AppError, AppResult},
    models::{Movie, RecommendationState, FETCH_PAGES},
    services::catalog::MovieCatalog,
};

/// Orders by rating, best first; equal ratings keep fetch order
pub fn sort_by_rating(movies: &mut [Movie]) {
    movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
}

/// Genre-based recommendations
///
/// Resolves the genre by exact name, pulls the fixed page range from
/// discovery and returns a freshly loaded state. Any previous genre state is
/// replaced by the caller.
pub async fn show_by_genre(
    catalog: &dyn MovieCatalog,
    genre_name: &str,
) -> AppResult<RecommendationState> {
    let genres = catalog.list_genres().await?;
    let genre = genres
        .into_iter()
        .find(|g| g.name == genre_name)
        .ok_or_else(|| AppError::NotFound(format!("Genre '{}' not found", genre_name)))?;

    let mut movies = Vec::new();
    for page in 1..=FETCH_PAGES {
        movies.extend(catalog.discover_by_genre(genre.id, page).await?);
    }
    sort_by_rating(&mut movies);

    tracing::info!(
        genre = %genre.name,
        genre_id = genre.id,
        candidates = movies.len(),
        provider = catalog.name(),
        "Genre recommendations loaded"
    );

    Ok(RecommendationState::loaded(genre.name, movies))
}

/// Title-based recommendations
///
/// Searches for the title and expands the first hit into its similar-movie
/// listing. No similar-title request is made when the search finds nothing.
pub async fn recommend_by_title(
    catalog: &dyn MovieCatalog,
    title: &str,
) -> AppResult<RecommendationState> {
    let not_found = || AppError::NotFound("Movie not found".to_string());

    if title.trim().is_empty() {
        return Err(not_found());
    }

    let hits = catalog.search_by_title(title).await?;
    let seed = hits.into_iter().next().ok_or_else(not_found)?;

    let mut movies = Vec::new();
    for page in 1..=FETCH_PAGES {
        movies.extend(catalog.similar_to(seed.id, page).await?);
    }
    sort_by_rating(&mut movies);

    tracing::info!(
        query = %title,
        seed_id = seed.id,
        seed_title = %seed.title,
        candidates = movies.len(),
        provider = catalog.name(),
        "Title recommendations loaded"
    );

    Ok(RecommendationState::loaded(title, movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use crate::services::catalog::MockMovieCatalog;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    fn movie(id: u64, rating: f64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            vote_average: rating,
            overview: Some(format!("Overview {}", id)),
        }
    }

    fn genres() -> Vec<Genre> {
        vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
        ]
    }

    /// 25 movies spread over three pages, ratings 9.1 down to 6.0, shuffled
    /// across pages so the merge has to sort
    fn drama_pages() -> Vec<Vec<Movie>> {
        let mut all: Vec<Movie> = (0..25u64)
            .map(|i| movie(i + 1, 9.1 - (i as f64) * (3.1 / 24.0)))
            .collect();
        all.reverse();
        vec![all[..10].to_vec(), all[10..20].to_vec(), all[20..].to_vec()]
    }

    fn mock_catalog() -> MockMovieCatalog {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut movies = vec![
            movie(1, 7.0),
            movie(2, 8.5),
            movie(3, 7.0),
            movie(4, 9.0),
            movie(5, 7.0),
        ];
        sort_by_rating(&mut movies);
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3, 5]);
        assert!(movies.windows(2).all(|w| w[0].vote_average >= w[1].vote_average));
    }

    #[tokio::test]
    async fn test_genre_flow_reveals_pages_of_ten() {
        let mut catalog = mock_catalog();
        catalog.expect_list_genres().times(1).returning(|| Ok(genres()));
        let pages = drama_pages();
        catalog
            .expect_discover_by_genre()
            .with(eq(18), mockall::predicate::in_iter(1..=3u32))
            .times(3)
            .returning(move |_, page| Ok(pages[(page - 1) as usize].clone()));

        let state = assert_ok!(show_by_genre(&catalog, "Drama").await);
        assert_eq!(state.query(), Some("Drama"));
        assert_eq!(state.total(), 25);
        assert_eq!(state.revealed(), 10);
        assert!((state.visible()[0].vote_average - 9.1).abs() < 1e-9);
        assert!(state.has_more());

        // Re-slicing only: the mock would panic on a fourth discovery call
        let state = assert_ok!(state.show_more());
        assert_eq!(state.revealed(), 20);
        assert!(state.has_more());

        let state = assert_ok!(state.show_more());
        assert_eq!(state.revealed(), 25);
        assert!(!state.has_more());
        assert!((state.visible()[24].vote_average - 6.0).abs() < 1e-9);
        assert!(state
            .visible()
            .windows(2)
            .all(|w| w[0].vote_average >= w[1].vote_average));
    }

    #[tokio::test]
    async fn test_genre_flow_keeps_duplicates_across_pages() {
        let mut catalog = mock_catalog();
        catalog.expect_list_genres().returning(|| Ok(genres()));
        catalog
            .expect_discover_by_genre()
            .times(3)
            .returning(|_, _| Ok(vec![movie(42, 8.0)]));

        let state = assert_ok!(show_by_genre(&catalog, "Action").await);
        assert_eq!(state.total(), 3);
        assert!(state.visible().iter().all(|m| m.id == 42));
    }

    #[tokio::test]
    async fn test_unknown_genre_is_not_found() {
        let mut catalog = mock_catalog();
        catalog.expect_list_genres().returning(|| Ok(genres()));
        catalog.expect_discover_by_genre().never();

        let err = assert_err!(show_by_genre(&catalog, "Telenovela").await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_genre_name_match_is_exact() {
        let mut catalog = mock_catalog();
        catalog.expect_list_genres().returning(|| Ok(genres()));
        catalog.expect_discover_by_genre().never();

        let err = assert_err!(show_by_genre(&catalog, "drama").await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_title_flow_uses_first_hit() {
        let mut catalog = mock_catalog();
        catalog
            .expect_search_by_title()
            .withf(|q| q == "Dune")
            .times(1)
            .returning(|_| Ok(vec![movie(438631, 7.8), movie(841, 6.3)]));
        catalog
            .expect_similar_to()
            .with(eq(438631), mockall::predicate::always())
            .times(3)
            .returning(|_, page| Ok(vec![movie(page as u64, 5.0 + page as f64)]));

        let state = assert_ok!(recommend_by_title(&catalog, "Dune").await);
        assert_eq!(state.query(), Some("Dune"));
        let ids: Vec<u64> = state.visible().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(!state.has_more());
    }

    #[tokio::test]
    async fn test_title_not_found_skips_similar_fetch() {
        let mut catalog = mock_catalog();
        catalog
            .expect_search_by_title()
            .times(1)
            .returning(|_| Ok(Vec::new()));
        catalog.expect_similar_to().never();

        let err = assert_err!(recommend_by_title(&catalog, "Nonexistent1234").await);
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Movie not found"));
    }

    #[tokio::test]
    async fn test_blank_title_is_not_found_without_remote_call() {
        let mut catalog = mock_catalog();
        catalog.expect_search_by_title().never();
        catalog.expect_similar_to().never();

        let err = assert_err!(recommend_by_title(&catalog, "   ").await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let mut catalog = mock_catalog();
        catalog
            .expect_list_genres()
            .returning(|| Err(AppError::Config("invalid TMDB base URL".to_string())));
        catalog.expect_discover_by_genre().never();

        let err = assert_err!(show_by_genre(&catalog, "Drama").await);
        assert!(matches!(err, AppError::Config(_)));
    }
}
