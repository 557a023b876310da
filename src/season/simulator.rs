//! Stochastic match model.
//!
//! Each side gets a fixed number of scoring chances. The home side converts
//! each with probability `p_home = (home + advantage) / (home + away + advantage)`
//! and the away side with `1 - p_home`, all chances independent.
//!
//! The two sides draw from complementary probabilities rather than from
//! independent per-side rates, so their goal counts are not symmetric in the
//! way a Poisson model would be. Kept for parity with existing season data.

use rand::Rng;

use crate::models::{Match, Team};

/// Default strength bonus for the home side.
pub const DEFAULT_HOME_ADVANTAGE: u32 = 10;

/// Scoring chances per side per match, which also caps goals per side.
pub const SCORING_CHANCES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSimulator {
    home_advantage: u32,
}

impl MatchSimulator {
    pub fn new(home_advantage: u32) -> Self {
        Self { home_advantage }
    }

    /// Probability the home side converts one of its chances.
    pub fn home_chance(&self, home_strength: u32, away_strength: u32) -> f64 {
        let home = f64::from(home_strength) + f64::from(self.home_advantage);
        home / (home + f64::from(away_strength))
    }

    /// Draw a scoreline for the given strengths.
    pub fn draw_score<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        home_strength: u32,
        away_strength: u32,
    ) -> (u32, u32) {
        let p_home = self.home_chance(home_strength, away_strength);
        let mut home_goals = 0;
        let mut away_goals = 0;

        for _ in 0..SCORING_CHANCES {
            if rng.gen::<f64>() < p_home {
                home_goals += 1;
            }
            if rng.gen::<f64>() < 1.0 - p_home {
                away_goals += 1;
            }
        }

        (home_goals, away_goals)
    }

    /// Play `fixture` and apply the result to both teams' records.
    ///
    /// Returns `None` without touching anything if the match was already
    /// played. Persisting the three records is the caller's job.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        fixture: &mut Match,
        home: &mut Team,
        away: &mut Team,
    ) -> Option<(u32, u32)> {
        if fixture.played {
            return None;
        }
        debug_assert_eq!(fixture.home_team_id, home.id);
        debug_assert_eq!(fixture.away_team_id, away.id);

        let (home_goals, away_goals) = self.draw_score(rng, home.strength, away.strength);
        fixture.record_score(home_goals, away_goals);
        home.record_result(home_goals, away_goals);
        away.record_result(away_goals, home_goals);

        Some((home_goals, away_goals))
    }
}

impl Default for MatchSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_ADVANTAGE)
    }
}
