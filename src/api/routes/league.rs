use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, MessageResponse};
use crate::models::{LeagueTable, Match, MatchResult};

#[derive(Debug, Deserialize)]
pub struct LeagueTableQuery {
    /// Override the configured number of forecast replays
    pub replays: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CurrentWeekResponse {
    pub current_week: u32,
}

#[derive(Debug, Serialize)]
pub struct PlayWeekResponse {
    pub week: u32,
    pub results: Vec<MatchResult>,
    /// Plain-text rendering, one line per fixture
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct SimulateAllResponse {
    pub matches_played: usize,
    pub matches: Vec<Match>,
    pub current_week: u32,
}

#[derive(Debug, Serialize)]
pub struct WeekMatchesResponse {
    pub week: u32,
    pub matches: Vec<Match>,
}

pub async fn league_table(
    State(state): State<AppState>,
    Query(query): Query<LeagueTableQuery>,
) -> Result<Json<LeagueTable>, ApiError> {
    let table = match query.replays {
        Some(replays) => state.league.league_table_with(replays).await?,
        None => state.league.league_table().await?,
    };
    Ok(Json(table))
}

pub async fn current_week(State(state): State<AppState>) -> Json<CurrentWeekResponse> {
    Json(CurrentWeekResponse {
        current_week: state.league.current_week().await,
    })
}

pub async fn play_week(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.league.play_current_week().await {
        Ok(results) => Ok(Json(PlayWeekResponse {
            week: results.week,
            summary: results.to_string(),
            results: results.results,
        })
        .into_response()),
        Err(e) if e.is_league_complete() => {
            Ok(Json(MessageResponse::new("League has already completed")).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn simulate_all_weeks(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.league.simulate_all_weeks().await {
        Ok((matches, current_week)) => Ok(Json(SimulateAllResponse {
            matches_played: matches.len(),
            matches,
            current_week,
        })
        .into_response()),
        Err(e) if e.is_league_complete() => Ok(Json(MessageResponse::new(
            "League simulation completed previously. Use /api/reset-league to start a new season.",
        ))
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn reset_league(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.league.reset_league().await?;
    Ok(Json(MessageResponse::new("League reset successfully")))
}

pub async fn week_matches(
    State(state): State<AppState>,
    Path(week): Path<u32>,
) -> Result<Json<WeekMatchesResponse>, ApiError> {
    let matches = state.league.matches_by_week(week).await?;
    Ok(Json(WeekMatchesResponse { week, matches }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_helpers::{get_json, post_json};
    use crate::api::state::test_state;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_league_table_fresh_season() {
        let app = build_router(test_state().await);

        let (status, json) = get_json(app, "/api/league-table").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_week"], 1);
        assert_eq!(json["teams"].as_array().unwrap().len(), 4);
        assert_eq!(json["matches"].as_array().unwrap().len(), 12);
        assert!(json["generated_at"].is_string());

        let total: f64 = json["championship_predictions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["championship_likelihood"].as_f64().unwrap())
            .sum();
        assert!((total - 100.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_league_table_replay_override() {
        let state = test_state().await;

        let (status, json) =
            get_json(build_router(state.clone()), "/api/league-table?replays=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["championship_predictions"].as_array().unwrap().is_empty());

        let (status, json) =
            get_json(build_router(state), "/api/league-table?replays=100000").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_play_week_returns_results() {
        let state = test_state().await;

        let (status, json) = post_json(build_router(state.clone()), "/api/play-week", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["week"], 1);
        assert_eq!(json["results"].as_array().unwrap().len(), 2);
        assert!(json["summary"]
            .as_str()
            .unwrap()
            .starts_with("Week 1 Results:\nChelsea vs Arsenal: "));

        let (_, json) = get_json(build_router(state), "/api/current-week").await;
        assert_eq!(json["current_week"], 2);
    }

    #[tokio::test]
    async fn test_simulate_all_then_informational_messages() {
        let state = test_state().await;

        let (status, json) =
            post_json(build_router(state.clone()), "/api/simulate-all-weeks", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["matches_played"], 12);
        assert_eq!(json["current_week"], 7);

        let (status, json) =
            post_json(build_router(state.clone()), "/api/simulate-all-weeks", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("League simulation completed previously"));

        let (status, json) = post_json(build_router(state), "/api/play-week", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "League has already completed");
    }

    #[tokio::test]
    async fn test_reset_league_route() {
        let state = test_state().await;
        post_json(build_router(state.clone()), "/api/simulate-all-weeks", "").await;

        let (status, json) = post_json(build_router(state.clone()), "/api/reset-league", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "League reset successfully");

        let (_, json) = get_json(build_router(state), "/api/league-table?replays=0").await;
        assert_eq!(json["current_week"], 1);
        assert!(json["matches"]
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["played"] == false));
    }

    #[tokio::test]
    async fn test_week_matches_range() {
        let state = test_state().await;

        let (status, json) = get_json(build_router(state.clone()), "/api/weeks/3/matches").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["week"], 3);
        assert_eq!(json["matches"].as_array().unwrap().len(), 2);

        for uri in ["/api/weeks/0/matches", "/api/weeks/7/matches"] {
            let (status, json) = get_json(build_router(state.clone()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"]["code"], "BAD_REQUEST");
        }

        let (status, _) = get_json(build_router(state), "/api/weeks/abc/matches").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
