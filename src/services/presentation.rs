use crate::{
    models::{Movie, MovieCard, RecommendationMode, RecommendationState, RecommendationView},
    services::availability::AvailabilityTable,
};

/// Renders one movie with its where-to-watch annotation
pub fn render(movie: &Movie, availability: &AvailabilityTable) -> MovieCard {
    MovieCard {
        id: movie.id,
        title: movie.title.clone(),
        rating: format!("{:.1}", movie.vote_average),
        where_to_watch: availability.lookup(&movie.title).to_string(),
        overview: movie
            .overview
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    }
}

/// Renders the currently revealed slice of a recommendation state
pub fn render_page(
    mode: RecommendationMode,
    state: &RecommendationState,
    availability: &AvailabilityTable,
) -> RecommendationView {
    RecommendationView {
        mode,
        query: state.query().map(str::to_string),
        movies: state
            .visible()
            .iter()
            .map(|movie| render(movie, availability))
            .collect(),
        revealed: state.revealed(),
        total: state.total(),
        has_more: state.has_more(),
    }
}
