//! REST API endpoints.
//!
//! Axum-based HTTP API serving farm readiness reports and answering chat
//! commands.

pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::fetch::FetchError;
use crate::validate::ValidationError;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests, retry in {retry_after}s")]
    TooManyRequests { retry_after: u64 },

    #[error("Data format mismatch: {0}")]
    Unprocessable(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidFarmId(_) => ApiError::BadRequest(err.to_string()),
            FetchError::NotFound(id) => ApiError::NotFound(format!("farm {}", id)),
            FetchError::InvalidUrl(_) => ApiError::Internal(err.to_string()),
            other => ApiError::BadGateway(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
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
            ApiError::TooManyRequests { .. } => (StatusCode::TOO_MANY_REQUESTS, "COOLDOWN"),
            ApiError::Unprocessable(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DATA_FORMAT_MISMATCH")
            }
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::TooManyRequests { retry_after } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

/// Router allowing any CORS origin.
pub fn build_router(state: AppState) -> Router {
    build_router_with_cors(state, "*")
}

/// Router allowing `cors_origin` (`"*"` for any).
pub fn build_router_with_cors(state: AppState, cors_origin: &str) -> Router {
    let origin = if cors_origin == "*" {
        AllowOrigin::any()
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!("Ignoring unusable CORS origin {:?}", cors_origin);
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::farms::health))
        .route("/api/farms/:id", get(routes::farms::farm_report))
        .route("/api/messages", post(routes::messages::post_message))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
