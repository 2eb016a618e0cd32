use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id", get(handlers::get_user))
        .route(
            "/users/:user_id/similarity/:other_id",
            get(handlers::similarity),
        )
        .route(
            "/users/:user_id/predictions/:movie_id",
            get(handlers::predict_rating),
        )
        .route(
            "/users/:user_id/critic/:movie_id",
            get(handlers::critic_advise),
        )
        // Movies
        .route("/movies/:movie_id", get(handlers::get_movie))
        // Ratings
        .route("/ratings", post(handlers::rate_movie))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
