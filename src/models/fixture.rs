//! Fixture (match) model.

use serde::{Deserialize, Serialize};

use super::{EntityId, MatchId, TeamId};

/// A scheduled league match.
///
/// Goals stay at zero until the match is played; after that the score and
/// the `played` flag never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,

    /// Matchday, 1-based
    pub week: u32,

    pub played: bool,
}

impl Match {
    /// Create an unplayed, unstored fixture.
    pub fn scheduled(home_team_id: TeamId, away_team_id: TeamId, week: u32) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            home_team_id,
            away_team_id,
            home_goals: 0,
            away_goals: 0,
            week,
            played: false,
        }
    }

    /// Record the final score. Returns false if the match was already played.
    pub fn record_score(&mut self, home_goals: u32, away_goals: u32) -> bool {
        if self.played {
            return false;
        }
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.played = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_match_is_unplayed() {
        let m = Match::scheduled(EntityId::new(1), EntityId::new(2), 3);
        assert!(!m.played);
        assert_eq!((m.home_goals, m.away_goals), (0, 0));
        assert_eq!(m.week, 3);
        assert_eq!((m.home_team_id, m.away_team_id), (EntityId::new(1), EntityId::new(2)));
    }

    #[test]
    fn test_record_score_only_once() {
        let mut m = Match::scheduled(EntityId::new(1), EntityId::new(2), 1);
        assert!(m.record_score(2, 1));
        assert!(!m.record_score(0, 5));
        assert_eq!((m.home_goals, m.away_goals), (2, 1));
        assert!(m.played);
    }

    #[test]
    fn test_match_json_field_names() {
        let m = Match::scheduled(EntityId::new(1), EntityId::new(2), 1);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["home_team_id"], 1);
        assert_eq!(json["away_team_id"], 2);
        assert_eq!(json["played"], false);
    }
}
