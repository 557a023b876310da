//! Season engine.
//!
//! Owns one season's stores, random source and current-week pointer. The
//! live league wraps a single engine; every prediction replay builds its own
//! from a [`SeasonSnapshot`].

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{generate_fixtures, LeagueError, MatchSimulator, TOTAL_WEEKS};
use crate::calculate::rank_teams;
use crate::models::{Match, MatchResult, Team, TeamId, WeekResults};
use crate::storage::{MatchStore, MemoryMatchStore, MemoryTeamStore, StorageError, TeamStore};

/// A consistent copy of one season's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSnapshot {
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub current_week: u32,
}

pub struct SeasonEngine<T = Box<dyn TeamStore>, M = Box<dyn MatchStore>> {
    teams: T,
    matches: M,
    simulator: MatchSimulator,
    rng: ChaCha8Rng,
    current_week: u32,
}

impl<T: TeamStore, M: MatchStore> SeasonEngine<T, M> {
    /// Open an engine over existing stores, resuming from persisted matches.
    pub fn new(
        teams: T,
        matches: M,
        simulator: MatchSimulator,
        rng: ChaCha8Rng,
    ) -> Result<Self, LeagueError> {
        let current_week = resume_week(&matches)?;
        info!(current_week, "Season engine initialized");

        Ok(Self {
            teams,
            matches,
            simulator,
            rng,
            current_week,
        })
    }

    pub fn current_week(&self) -> u32 {
        self.current_week
    }

    pub fn is_complete(&self) -> bool {
        self.current_week > TOTAL_WEEKS
    }

    /// Play every unplayed fixture of `week`, which must be the current week.
    ///
    /// A failure part-way leaves the played matches persisted and the week
    /// pointer where it was; calling again resumes with the remaining ones.
    pub fn play_week(&mut self, week: u32) -> Result<(), LeagueError> {
        if week != self.current_week {
            return Err(LeagueError::StateMismatch {
                requested: week,
                current: self.current_week,
            });
        }

        let fixtures = self.matches.list_by_week(week)?;
        if fixtures.is_empty() {
            return Err(LeagueError::NotFound(format!(
                "no matches found for week {}",
                week
            )));
        }

        for mut fixture in fixtures.into_iter().filter(|m| !m.played) {
            self.simulate_match(&mut fixture)?;
        }

        self.current_week = week + 1;
        info!(week, next_week = self.current_week, "Week played");
        Ok(())
    }

    /// Simulate one fixture and persist the match and both teams.
    ///
    /// Already-played fixtures are left alone. If a team write fails, the
    /// records already written are put back, so the fixture is stored as
    /// unplayed again and a retry plays it in full.
    pub fn simulate_match(&mut self, fixture: &mut Match) -> Result<(), LeagueError> {
        if fixture.played {
            return Ok(());
        }

        let mut home = self.team_by_id(fixture.home_team_id)?;
        let mut away = self.team_by_id(fixture.away_team_id)?;
        let unplayed = fixture.clone();
        let home_before = home.clone();

        let Some((home_goals, away_goals)) =
            self.simulator
                .simulate(&mut self.rng, fixture, &mut home, &mut away)
        else {
            return Ok(());
        };

        self.matches.update(fixture)?;
        if let Err(e) = self.teams.update(&home) {
            self.roll_back(&unplayed, None);
            *fixture = unplayed;
            return Err(e.into());
        }
        if let Err(e) = self.teams.update(&away) {
            self.roll_back(&unplayed, Some(&home_before));
            *fixture = unplayed;
            return Err(e.into());
        }

        debug!(
            match_id = %fixture.id,
            week = fixture.week,
            "{} {} - {} {}",
            home.name,
            home_goals,
            away_goals,
            away.name
        );
        Ok(())
    }

    /// Play the current week and return its results with team names.
    pub fn play_current_week(&mut self) -> Result<WeekResults, LeagueError> {
        if self.is_complete() {
            return Err(LeagueError::LeagueComplete {
                current_week: self.current_week,
            });
        }

        let week = self.current_week;
        self.play_week(week)?;
        self.week_results(week)
    }

    /// Play every remaining week in order, returning the matches of the weeks
    /// played by this call.
    pub fn simulate_all_weeks(&mut self) -> Result<Vec<Match>, LeagueError> {
        if self.is_complete() {
            return Err(LeagueError::LeagueComplete {
                current_week: self.current_week,
            });
        }

        let mut played = Vec::new();
        for week in self.current_week..=TOTAL_WEEKS {
            self.play_week(week)?;
            played.extend(self.matches.list_by_week(week)?);
        }

        info!(matches = played.len(), "Season simulated to completion");
        Ok(played)
    }

    /// Zero every team's record, regenerate the fixtures and rewind to week 1.
    ///
    /// Team records are reset before any match is deleted. If a step fails
    /// the error is returned and the season must be reset again.
    pub fn reset_league(&mut self) -> Result<(), LeagueError> {
        let teams = self.teams.list_all()?;
        let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        let fixtures = generate_fixtures(&ids)?;

        for mut team in teams {
            team.reset_stats();
            self.teams.update(&team)?;
        }

        self.matches.delete_all()?;
        for fixture in fixtures {
            self.matches.create(fixture)?;
        }

        self.current_week = 1;
        info!("League reset");
        Ok(())
    }

    /// Add a team with a clean record.
    pub fn create_team(&mut self, name: &str, strength: u32) -> Result<Team, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidInput(
                "team name must not be empty".to_string(),
            ));
        }
        if strength == 0 {
            return Err(LeagueError::InvalidInput(
                "team strength must be greater than 0".to_string(),
            ));
        }

        let team = self.teams.create(Team::new(name, strength))?;
        info!(team_id = %team.id, name = %team.name, strength, "Team created");
        Ok(team)
    }

    pub fn team_by_id(&self, id: TeamId) -> Result<Team, LeagueError> {
        self.teams
            .get(id)?
            .ok_or_else(|| LeagueError::NotFound(format!("team {}", id)))
    }

    pub fn teams(&self) -> Result<Vec<Team>, LeagueError> {
        Ok(self.teams.list_all()?)
    }

    pub fn matches(&self) -> Result<Vec<Match>, LeagueError> {
        Ok(self.matches.list_all()?)
    }

    pub fn matches_by_week(&self, week: u32) -> Result<Vec<Match>, LeagueError> {
        if week == 0 || week > TOTAL_WEEKS {
            return Err(LeagueError::InvalidInput(format!(
                "week must be between 1 and {}, got {}",
                TOTAL_WEEKS, week
            )));
        }
        Ok(self.matches.list_by_week(week)?)
    }

    /// Teams in table order.
    pub fn standings(&self) -> Result<Vec<Team>, LeagueError> {
        Ok(rank_teams(self.teams.list_all()?))
    }

    pub fn snapshot(&self) -> Result<SeasonSnapshot, LeagueError> {
        Ok(SeasonSnapshot {
            teams: self.teams.list_all()?,
            matches: self.matches.list_all()?,
            current_week: self.current_week,
        })
    }

    /// Restore the pre-match records after a partial write. A failure here
    /// leaves the stores inconsistent and is only logged; the caller already
    /// returns the original error.
    fn roll_back(&mut self, unplayed: &Match, home_before: Option<&Team>) {
        if let Some(home) = home_before {
            if let Err(e) = self.teams.update(home) {
                error!(team_id = %home.id, error = %e, "Failed to restore team record");
            }
        }
        if let Err(e) = self.matches.update(unplayed) {
            error!(match_id = %unplayed.id, error = %e, "Failed to restore unplayed match");
        }
        warn!(
            match_id = %unplayed.id,
            week = unplayed.week,
            "Rolled back partially saved match"
        );
    }

    fn week_results(&self, week: u32) -> Result<WeekResults, LeagueError> {
        let mut results = Vec::new();
        for fixture in self.matches.list_by_week(week)? {
            results.push(MatchResult {
                home_team: self.team_by_id(fixture.home_team_id)?.name,
                away_team: self.team_by_id(fixture.away_team_id)?.name,
                home_goals: fixture.home_goals,
                away_goals: fixture.away_goals,
            });
        }
        Ok(WeekResults { week, results })
    }
}

impl SeasonEngine<MemoryTeamStore, MemoryMatchStore> {
    /// Build a private in-memory engine from a snapshot, keeping its week.
    pub fn from_snapshot(
        snapshot: &SeasonSnapshot,
        simulator: MatchSimulator,
        seed: u64,
    ) -> Self {
        Self {
            teams: MemoryTeamStore::from_teams(&snapshot.teams),
            matches: MemoryMatchStore::from_matches(&snapshot.matches),
            simulator,
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_week: snapshot.current_week,
        }
    }
}

/// Work out the current week from persisted matches. An interrupted week is
/// resumed rather than skipped.
fn resume_week<M: MatchStore>(matches: &M) -> Result<u32, StorageError> {
    let max_played = matches.max_week_played()?;
    if max_played == 0 {
        return Ok(1);
    }

    let week_done = matches.list_by_week(max_played)?.iter().all(|m| m.played);
    Ok(if week_done { max_played + 1 } else { max_played })
}
