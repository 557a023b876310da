//! REST API endpoints.
//!
//! Axum-based HTTP API for playing the season and reading the league table
//! with its championship forecast.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::season::LeagueError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

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
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
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

impl From<LeagueError> for ApiError {
    fn from(err: LeagueError) -> Self {
        match err {
            LeagueError::InvalidInput(msg) => ApiError::BadRequest(msg),
            LeagueError::NotFound(msg) => ApiError::NotFound(msg),
            LeagueError::StateMismatch { .. } | LeagueError::LeagueComplete { .. } => {
                ApiError::Conflict(err.to_string())
            }
            other => {
                tracing::error!(error = %other, "League operation failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// Plain confirmation or informational body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build the API router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/league-table", get(routes::league::league_table))
        .route("/api/current-week", get(routes::league::current_week))
        .route("/api/play-week", post(routes::league::play_week))
        .route(
            "/api/simulate-all-weeks",
            post(routes::league::simulate_all_weeks),
        )
        .route("/api/reset-league", post(routes::league::reset_league))
        .route(
            "/api/weeks/:week/matches",
            get(routes::league::week_matches),
        )
        .route("/api/teams", post(routes::teams::create_team))
        .route("/api/teams/:id", get(routes::teams::get_team))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS layer for `origin`; `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }
    Ok(layer.allow_origin(HeaderValue::from_str(origin)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_league_error_status_mapping() {
        let cases = [
            (LeagueError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (LeagueError::NotFound("team 9".into()), StatusCode::NOT_FOUND),
            (
                LeagueError::StateMismatch {
                    requested: 3,
                    current: 1,
                },
                StatusCode::CONFLICT,
            ),
            (
                LeagueError::LeagueComplete { current_week: 7 },
                StatusCode::CONFLICT,
            ),
            (
                LeagueError::PredictionTimedOut(Duration::from_secs(30)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let resp = ApiError::from(err).into_response();
            assert_eq!(resp.status(), status);
        }
    }

    #[test]
    fn test_state_mismatch_message_kept() {
        let err = ApiError::from(LeagueError::StateMismatch {
            requested: 4,
            current: 2,
        });
        assert_eq!(
            err.to_string(),
            "Conflict: It's not week 4, current week is 2"
        );
    }

    #[test]
    fn test_cors_layer_origins() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:3000").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
