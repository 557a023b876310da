//! Standings calculation.
//!
//! Ranks teams by:
//! 1. Points
//! 2. Goal difference
//! 3. Goals scored
//!
//! Teams level on all three keep their input order.

use std::cmp::Ordering;

use crate::models::Team;

/// Compare two teams for the table; `Less` means `a` ranks above `b`.
pub fn compare_standing(a: &Team, b: &Team) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Sort teams into table order. Stable, so full ties keep input order.
pub fn rank_teams(mut teams: Vec<Team>) -> Vec<Team> {
    teams.sort_by(compare_standing);
    teams
}

/// The team that would be champion if the season ended now.
pub fn leader(teams: &[Team]) -> Option<&Team> {
    teams
        .iter()
        .reduce(|best, t| if compare_standing(t, best) == Ordering::Less { t } else { best })
}
