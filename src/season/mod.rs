//! Season simulation and championship forecasting.
//!
//! - **fixtures**: the fixed six-week double round-robin
//! - **simulator**: the stochastic match model
//! - **engine**: one season's state machine over a team/match store pair
//! - **predict**: concurrent Monte Carlo replays of the rest of the season
//! - **league**: the live season behind a reader/writer lock

pub mod engine;
pub mod fixtures;
pub mod league;
pub mod predict;
pub mod simulator;

pub use engine::{SeasonEngine, SeasonSnapshot};
pub use fixtures::generate_fixtures;
pub use league::{open_live_league, League, LiveLeague};
pub use predict::{ChampionTally, Predictor};
pub use simulator::MatchSimulator;

use std::time::Duration;

use thiserror::Error;

use crate::storage::StorageError;

/// Number of matchdays in a season.
pub const TOTAL_WEEKS: u32 = 6;

/// Number of teams a season is scheduled for.
pub const TEAM_COUNT: usize = 4;

/// Errors raised by season and prediction operations.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("It's not week {requested}, current week is {current}")]
    StateMismatch { requested: u32, current: u32 },

    #[error("League has already completed. Current week: {current_week}")]
    LeagueComplete { current_week: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Replay {replay} failed: {source}")]
    ReplayFailed {
        replay: usize,
        #[source]
        source: Box<LeagueError>,
    },

    #[error("Prediction timed out after {0:?}")]
    PredictionTimedOut(Duration),

    #[error("Replay task failed: {0}")]
    TaskFailed(String),
}

impl LeagueError {
    /// The season is over. An expected terminal state rather than a fault.
    pub fn is_league_complete(&self) -> bool {
        matches!(self, LeagueError::LeagueComplete { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_complete_is_distinguishable() {
        assert!(LeagueError::LeagueComplete { current_week: 7 }.is_league_complete());
        assert!(!LeagueError::StateMismatch {
            requested: 2,
            current: 1
        }
        .is_league_complete());
    }

    #[test]
    fn test_error_messages() {
        let err = LeagueError::StateMismatch {
            requested: 3,
            current: 2,
        };
        assert_eq!(err.to_string(), "It's not week 3, current week is 2");

        let err = LeagueError::LeagueComplete { current_week: 7 };
        assert_eq!(err.to_string(), "League has already completed. Current week: 7");
    }

    #[test]
    fn test_replay_failure_wraps_cause() {
        let err = LeagueError::ReplayFailed {
            replay: 4,
            source: Box::new(LeagueError::NotFound("team 9".to_string())),
        };
        assert!(err.to_string().contains("Replay 4"));
        assert!(err.to_string().contains("team 9"));
    }
}
