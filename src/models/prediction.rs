//! Forecast and league table views.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Match, Team, TeamId};

/// Championship likelihood for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub team_id: TeamId,
    pub team_name: String,

    /// Percentage of replays won (0.0 to 100.0)
    pub championship_likelihood: f64,
}

/// Standings, fixtures and forecast at the instant of the read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueTable {
    /// Teams in ranked order
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub current_week: u32,
    pub championship_predictions: Vec<Prediction>,
    pub generated_at: DateTime<Utc>,
}

/// One played fixture with team names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

/// Results of a single matchday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekResults {
    pub week: u32,
    pub results: Vec<MatchResult>,
}

impl fmt::Display for WeekResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Week {} Results:", self.week)?;
        for r in &self.results {
            writeln!(
                f,
                "{} vs {}: {} - {}",
                r.home_team, r.away_team, r.home_goals, r.away_goals
            )?;
        }
        Ok(())
    }
}
