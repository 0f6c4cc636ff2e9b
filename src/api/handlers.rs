use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Book, UserAction};
use crate::services::scoring::ScoreBreakdown;

use super::AppState;

const DEFAULT_RECOMMENDATION_COUNT: usize = 20;
const MAX_RECOMMENDATION_COUNT: usize = 100;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub liked_books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecordActionRequest {
    /// Swipe UIs can fire on an already consumed card; a missing book is a no-op
    #[serde(default)]
    pub book: Option<Book>,
    pub action: UserAction,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub book_id: String,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Onboarding with selected genres and a few liked books
pub async fn train(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<TrainRequest>,
) -> StatusCode {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        genres = request.genres.len(),
        liked_books = request.liked_books.len(),
        "Processing training request"
    );

    let engine = state.engine_for(&user_id).await;
    engine.train(&request.genres, &request.liked_books).await;

    StatusCode::NO_CONTENT
}

/// Ranked recommendations, best first
pub async fn recommend(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let count = query.count.unwrap_or(DEFAULT_RECOMMENDATION_COUNT);
    if count == 0 || count > MAX_RECOMMENDATION_COUNT {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {}",
            MAX_RECOMMENDATION_COUNT
        )));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        count,
        "Processing recommendation request"
    );

    let engine = state.engine_for(&user_id).await;
    Ok(Json(engine.recommend(count).await))
}

/// Like / dislike / save-for-later on one book
pub async fn record_action(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecordActionRequest>,
) -> StatusCode {
    let Some(book) = request.book else {
        tracing::debug!(request_id = %request_id, user_id = %user_id, "Action without book ignored");
        return StatusCode::NO_CONTENT;
    };

    let engine = state.engine_for(&user_id).await;
    engine.record(&book, request.action).await;

    StatusCode::NO_CONTENT
}

/// Score of one book with its per-signal breakdown
pub async fn score(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(book): Json<Book>,
) -> Json<ScoreResponse> {
    let engine = state.engine_for(&user_id).await;
    let breakdown = engine.explain(&book).await;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        book_id = %book.id,
        score = breakdown.score,
        "Scored book"
    );

    Json(ScoreResponse {
        book_id: book.id,
        breakdown,
    })
}
