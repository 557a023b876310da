//! Team model and season record keeping.

use serde::{Deserialize, Serialize};

use super::{EntityId, TeamId};

/// Result of a single match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    /// Classify a scoreline from the perspective of the team that scored `scored`.
    pub fn from_score(scored: u32, conceded: u32) -> Self {
        if scored > conceded {
            MatchOutcome::Win
        } else if scored < conceded {
            MatchOutcome::Loss
        } else {
            MatchOutcome::Draw
        }
    }

    /// League points awarded for this outcome.
    pub fn points(&self) -> u32 {
        match self {
            MatchOutcome::Win => 3,
            MatchOutcome::Draw => 1,
            MatchOutcome::Loss => 0,
        }
    }
}

/// A league participant with its cumulative season statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Store-assigned identifier
    pub id: TeamId,

    /// Display name
    pub name: String,

    /// Fixed strength rating, never changed by simulation
    pub strength: u32,

    pub matches_played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl Team {
    /// Create an unstored team with a clean record.
    pub fn new(name: impl Into<String>, strength: u32) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            strength,
            matches_played: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Apply one finished match to the season record.
    pub fn record_result(&mut self, scored: u32, conceded: u32) -> MatchOutcome {
        let outcome = MatchOutcome::from_score(scored, conceded);

        self.matches_played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.points += outcome.points();
        match outcome {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Draw => self.draws += 1,
            MatchOutcome::Loss => self.losses += 1,
        }

        outcome
    }

    /// Zero the season record, keeping identity and strength.
    pub fn reset_stats(&mut self) {
        self.matches_played = 0;
        self.goals_for = 0;
        self.goals_against = 0;
        self.points = 0;
        self.wins = 0;
        self.draws = 0;
        self.losses = 0;
    }

    /// Whether the record satisfies the played/points bookkeeping rules.
    pub fn is_consistent(&self) -> bool {
        self.matches_played == self.wins + self.draws + self.losses
            && self.points == 3 * self.wins + self.draws
    }
}
