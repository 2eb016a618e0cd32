//! Extractors that report malformed requests through [`AppError`]
//!
//! axum's own `Json`, `Path` and `Query` reject with a plain-text body. These
//! wrappers keep the same parsing but turn the rejection into a 400 with the
//! usual `{"error": ...}` JSON body.

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};

use crate::error::AppError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::IntoResponse,
    };
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Score {
        score: i32,
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fractional_score_is_invalid_input() {
        let error = AppJson::<Score>::from_request(json_request(r#"{"score": 4.5}"#), &())
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::InvalidInput(_)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_field_is_invalid_input() {
        let error = AppJson::<Score>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();

        match error {
            AppError::InvalidInput(message) => assert!(message.contains("score")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_well_formed_body_passes_through() {
        let AppJson(value) = AppJson::<Score>::from_request(json_request(r#"{"score": 4}"#), &())
            .await
            .unwrap();
        assert_eq!(value.score, 4);
    }
}
