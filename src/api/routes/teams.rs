use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Team, TeamId};

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub strength: u32,
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Team>, ApiError> {
    let team = state.league.team_by_id(TeamId::new(id)).await?;
    Ok(Json(team))
}

pub async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let team = state.league.create_team(&req.name, req.strength).await?;
    Ok((StatusCode::CREATED, Json(team)))
}
