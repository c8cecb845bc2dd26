use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{
    Genre, RecommendationMode, RecommendationState, RecommendationView, Session, WhereToWatch,
};
use crate::services::{presentation, recommendations};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub title: String,
    pub where_to_watch: WhereToWatch,
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", session_id))
}

/// Looks up a live session and marks it used
///
/// A session idle past the TTL is removed on the spot and reported missing.
fn live_session(
    sessions: &mut HashMap<Uuid, Session>,
    session_id: Uuid,
    ttl: Duration,
) -> AppResult<&mut Session> {
    if sessions
        .get(&session_id)
        .is_some_and(|session| session.is_expired(ttl))
    {
        sessions.remove(&session_id);
        tracing::info!(session_id = %session_id, "Session expired");
    }

    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    session.touch();
    Ok(session)
}

async fn ensure_session(state: &AppState, session_id: Uuid) -> AppResult<()> {
    let mut sessions = state.sessions.write().await;
    live_session(&mut sessions, session_id, state.session_ttl).map(|_| ())
}

/// Stores the outcome of a fresh load in the session
///
/// Any failure leaves the mode idle, discarding what was shown before.
async fn store_outcome(
    state: &AppState,
    session_id: Uuid,
    mode: RecommendationMode,
    outcome: AppResult<RecommendationState>,
) -> AppResult<Json<RecommendationView>> {
    let mut sessions = state.sessions.write().await;
    let session = live_session(&mut sessions, session_id, state.session_ttl)?;
    let slot = session.state_mut(mode);

    match outcome {
        Ok(loaded) => {
            *slot = loaded;
            Ok(Json(presentation::render_page(mode, slot, &state.availability)))
        }
        Err(e) => {
            *slot = RecommendationState::Idle;
            Err(e)
        }
    }
}

async fn expand(
    state: &AppState,
    session_id: Uuid,
    mode: RecommendationMode,
) -> AppResult<Json<RecommendationView>> {
    let mut sessions = state.sessions.write().await;
    let session = live_session(&mut sessions, session_id, state.session_ttl)?;
    let slot = session.state_mut(mode);

    *slot = std::mem::take(slot).show_more()?;

    Ok(Json(presentation::render_page(mode, slot, &state.availability)))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Genres offered by the genre selector
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.catalog.list_genres().await?))
}

/// Starts an interactive session with both modes idle
pub async fn create_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> (StatusCode, Json<SessionResponse>) {
    state.prune_expired_sessions().await;

    let session_id = Uuid::new_v4();
    state
        .sessions
        .write()
        .await
        .insert(session_id, Session::default());

    tracing::info!(request_id = %request_id, session_id = %session_id, "Session created");

    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .sessions
        .write()
        .await
        .remove(&session_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| session_not_found(session_id))
}

/// "Show movies" for the selected genre
pub async fn show_genre(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GenreRequest>,
) -> AppResult<Json<RecommendationView>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        genre = %request.genre,
        "Processing genre recommendation request"
    );

    ensure_session(&state, session_id).await?;
    let outcome = recommendations::show_by_genre(state.catalog.as_ref(), &request.genre).await;
    store_outcome(&state, session_id, RecommendationMode::Genre, outcome).await
}

pub async fn more_genre(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<RecommendationView>> {
    expand(&state, session_id, RecommendationMode::Genre).await
}

/// "Search" for a title and list similar movies
pub async fn search_title(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<TitleRequest>,
) -> AppResult<Json<RecommendationView>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        title = %request.title,
        "Processing title recommendation request"
    );

    ensure_session(&state, session_id).await?;
    let outcome = recommendations::recommend_by_title(state.catalog.as_ref(), &request.title).await;
    store_outcome(&state, session_id, RecommendationMode::Title, outcome).await
}

pub async fn more_title(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<RecommendationView>> {
    expand(&state, session_id, RecommendationMode::Title).await
}

/// Where-to-watch lookup against the local dataset
pub async fn availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityQuery>,
) -> Json<AvailabilityResponse> {
    let where_to_watch = state.availability.lookup(&params.title);
    Json(AvailabilityResponse {
        title: params.title,
        where_to_watch,
    })
}
