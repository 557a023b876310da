//! Fixture generation for a four-team double round-robin.

use crate::models::{Match, TeamId};

use super::{LeagueError, TEAM_COUNT};

/// (home slot, away slot, week). The second half mirrors the first with
/// hosts swapped.
const SCHEDULE: [(usize, usize, u32); 12] = [
    (0, 1, 1),
    (2, 3, 1),
    (0, 2, 2),
    (1, 3, 2),
    (0, 3, 3),
    (1, 2, 3),
    (1, 0, 4),
    (3, 2, 4),
    (2, 0, 5),
    (3, 1, 5),
    (3, 0, 6),
    (2, 1, 6),
];

/// Build the 12 unplayed fixtures for exactly four teams.
pub fn generate_fixtures(team_ids: &[TeamId]) -> Result<Vec<Match>, LeagueError> {
    if team_ids.len() != TEAM_COUNT {
        return Err(LeagueError::InvalidInput(format!(
            "expected {} teams, got {}",
            TEAM_COUNT,
            team_ids.len()
        )));
    }

    Ok(SCHEDULE
        .iter()
        .map(|&(home, away, week)| Match::scheduled(team_ids[home], team_ids[away], week))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;
    use crate::season::TOTAL_WEEKS;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    fn four_ids(raw: [u32; 4]) -> Vec<TeamId> {
        raw.iter().map(|&id| EntityId::new(id)).collect()
    }

    fn check_round_robin(ids: &[TeamId], fixtures: &[Match]) {
        assert_eq!(fixtures.len(), 12);
        assert!(fixtures.iter().all(|m| !m.played && m.home_goals == 0 && m.away_goals == 0));

        let mut per_week: HashMap<u32, Vec<&Match>> = HashMap::new();
        for m in fixtures {
            per_week.entry(m.week).or_default().push(m);
        }
        assert_eq!(per_week.len(), TOTAL_WEEKS as usize);
        for (week, matches) in &per_week {
            assert!((1..=TOTAL_WEEKS).contains(week));
            assert_eq!(matches.len(), 2);
            let playing: HashSet<TeamId> = matches
                .iter()
                .flat_map(|m| [m.home_team_id, m.away_team_id])
                .collect();
            assert_eq!(playing.len(), 4, "a team plays twice in week {}", week);
        }

        let ordered: HashSet<(TeamId, TeamId)> = fixtures
            .iter()
            .map(|m| (m.home_team_id, m.away_team_id))
            .collect();
        assert_eq!(ordered.len(), 12);
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                assert!(ordered.contains(&(a, b)));
                assert!(ordered.contains(&(b, a)));
            }
        }
    }

    #[test]
    fn test_generate_fixed_schedule() {
        let ids = four_ids([1, 2, 3, 4]);
        let fixtures = generate_fixtures(&ids).unwrap();

        let first_week: Vec<(u32, u32)> = fixtures
            .iter()
            .filter(|m| m.week == 1)
            .map(|m| (m.home_team_id.get(), m.away_team_id.get()))
            .collect();
        assert_eq!(first_week, vec![(1, 2), (3, 4)]);

        let last = fixtures.last().unwrap();
        assert_eq!((last.home_team_id.get(), last.away_team_id.get(), last.week), (3, 2, 6));

        check_round_robin(&ids, &fixtures);
    }

    #[test]
    fn test_wrong_team_count_rejected() {
        for n in [0usize, 3, 5] {
            let ids: Vec<TeamId> = (1..=n as u32).map(EntityId::new).collect();
            assert!(matches!(
                generate_fixtures(&ids),
                Err(LeagueError::InvalidInput(_))
            ));
        }
    }

    proptest! {
        #[test]
        fn prop_any_distinct_ids_form_round_robin(
            raw in prop::collection::hash_set(1u32..10_000, 4)
        ) {
            let raw: Vec<u32> = raw.into_iter().collect();
            let ids = four_ids([raw[0], raw[1], raw[2], raw[3]]);
            let fixtures = generate_fixtures(&ids).unwrap();
            check_round_robin(&ids, &fixtures);
        }
    }
}
