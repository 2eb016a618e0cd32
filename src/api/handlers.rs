use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{CriticVerdict, MovieDetails, MovieId, RatingSample, User, UserId, UserProfile},
};

use super::{AppJson, AppPath, AppQuery, AppState};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: i32,
}

#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub user_id: UserId,
    pub other_id: UserId,
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub prediction: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CriticResponse {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub verdict: Option<CriticVerdict>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get all users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.recommender.list_users().await?))
}

/// Get a user with their ratings
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.recommender.user_profile(user_id).await?))
}

/// Get a movie, personalized when `user_id` is given
pub async fn get_movie(
    State(state): State<AppState>,
    AppPath(movie_id): AppPath<MovieId>,
    AppQuery(query): AppQuery<MovieQuery>,
) -> AppResult<Json<MovieDetails>> {
    // Viewer insight is only attached when a user is named
    Ok(Json(
        state
            .recommender
            .movie_details(movie_id, query.user_id)
            .await?,
    ))
}

/// Rate a movie, replacing the user's previous score
pub async fn rate_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RateMovieRequest>,
) -> AppResult<Json<RatingSample>> {
    tracing::info!(
        request_id = %request_id,
        user_id = request.user_id,
        movie_id = request.movie_id,
        "Processing rating"
    );

    // Range and existence checks happen before anything is written
    let sample = state
        .recommender
        .rate_movie(request.user_id, request.movie_id, request.score)
        .await?;

    Ok(Json(sample))
}

/// Taste similarity between two users
pub async fn similarity(
    State(state): State<AppState>,
    AppPath((user_id, other_id)): AppPath<(UserId, UserId)>,
) -> AppResult<Json<SimilarityResponse>> {
    let similarity = state.recommender.similarity(user_id, other_id).await?;

    Ok(Json(SimilarityResponse {
        user_id,
        other_id,
        similarity,
    }))
}

/// Predicted score for a movie the user has not rated
pub async fn predict_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppPath((user_id, movie_id)): AppPath<(UserId, MovieId)>,
) -> AppResult<Json<PredictionResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        movie_id,
        "Processing prediction request"
    );

    // None when no positively correlated user rated the movie
    let prediction = state.recommender.predict_rating(user_id, movie_id).await?;

    Ok(Json(PredictionResponse {
        user_id,
        movie_id,
        prediction,
    }))
}

/// The critic persona's opinion of the user's rating
pub async fn critic_advise(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppPath((user_id, movie_id)): AppPath<(UserId, MovieId)>,
) -> AppResult<Json<CriticResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        movie_id,
        "Processing critic request"
    );

    // None when the user has not rated the movie yet
    let verdict = state.recommender.critic_advise(user_id, movie_id).await?;

    Ok(Json(CriticResponse {
        user_id,
        movie_id,
        verdict,
    }))
}
