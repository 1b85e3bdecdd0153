//! REST API endpoints.
//!
//! Axum-based HTTP API serving aggregated win-rate curves and the
//! persisted selection to the presentation layer.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::AggregateError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::UnknownDataset(name) => ApiError::NotFound(format!("dataset {}", name)),
            AggregateError::InvalidBandWidth => ApiError::BadRequest(err.to_string()),
            AggregateError::MissingFirstBand => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Parse a comma-separated list of integers. Missing or blank means empty.
pub fn parse_list(raw: Option<&str>, field: &str) -> Result<Vec<u32>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("{}: {:?} is not an integer", field, s)))
        })
        .collect()
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/datasets", get(routes::datasets::list_datasets))
        .route(
            "/api/datasets/:name/rank-distribution",
            get(routes::datasets::rank_distribution),
        )
        .route("/api/datasets/:name/by-rank", get(routes::aggregate::by_rank))
        .route(
            "/api/datasets/:name/by-rank-banded",
            get(routes::aggregate::by_rank_banded),
        )
        .route(
            "/api/datasets/:name/by-handicap",
            get(routes::aggregate::by_handicap),
        )
        .route(
            "/api/selection",
            get(routes::selection::get_selection).put(routes::selection::put_selection),
        )
        .with_state(state)
}

/// Wrap the router with CORS and request tracing.
pub fn with_layers(router: Router, cors_origin: &str) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let cors = match cors_origin {
        "*" => cors.allow_origin(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
                cors.allow_origin(Any)
            }
        },
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(Some("9,13, 19"), "sizes").unwrap(), vec![9, 13, 19]);
        assert_eq!(parse_list(Some(""), "sizes").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_list(None, "sizes").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_list(Some("1,,2"), "speeds").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_parse_list_rejects_garbage() {
        let err = parse_list(Some("9,big"), "sizes").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_aggregate_error_mapping() {
        let err: ApiError = AggregateError::UnknownDataset("x".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = AggregateError::InvalidBandWidth.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_error_response_status() {
        let resp = ApiError::NotFound("dataset x".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::BadRequest("bad".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
