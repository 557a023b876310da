//! The live league.
//!
//! A single [`SeasonEngine`] behind a reader/writer lock. Mutations take the
//! write half; a league table read holds the read half from the snapshot
//! through the name lookup, so standings, fixtures and forecast all describe
//! the same state.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::RwLock;
use tracing::info;

use super::{LeagueError, MatchSimulator, Predictor, SeasonEngine};
use crate::config::{AppConfig, TeamSeed};
use crate::models::{LeagueTable, Match, Prediction, Team, TeamId, WeekResults};
use crate::storage::{JsonlMatchStore, JsonlTeamStore, MatchStore, StorageConfig, TeamStore};

pub struct League<T = Box<dyn TeamStore>, M = Box<dyn MatchStore>> {
    engine: RwLock<SeasonEngine<T, M>>,
    predictor: Predictor,
    replays: usize,
}

/// The league served by the binary, over JSONL stores.
pub type LiveLeague = League<Box<dyn TeamStore>, Box<dyn MatchStore>>;

impl<T: TeamStore, M: MatchStore> League<T, M> {
    pub fn new(engine: SeasonEngine<T, M>, predictor: Predictor, replays: usize) -> Self {
        Self {
            engine: RwLock::new(engine),
            predictor,
            replays,
        }
    }

    /// Build a league over `teams` and `matches` with the configured
    /// simulation and prediction settings.
    pub fn with_config(teams: T, matches: M, config: &AppConfig) -> Result<Self, LeagueError> {
        let simulator = MatchSimulator::new(config.simulation.home_advantage);
        let rng = match config.simulation.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let engine = SeasonEngine::new(teams, matches, simulator, rng)?;
        let predictor = Predictor::new(
            simulator,
            &config.prediction,
            config.simulation.seed.map(|s| s.wrapping_add(1)),
        );

        Ok(Self::new(engine, predictor, config.prediction.replays))
    }

    /// Seed teams into an empty store and schedule a season if none exists.
    pub async fn bootstrap(&self, seeds: &[TeamSeed]) -> Result<(), LeagueError> {
        let mut engine = self.engine.write().await;

        if engine.teams()?.is_empty() {
            for seed in seeds {
                engine.create_team(&seed.name, seed.strength)?;
            }
            info!(teams = seeds.len(), "Seeded teams");
        }

        if engine.matches()?.is_empty() {
            engine.reset_league()?;
        }
        Ok(())
    }

    pub async fn current_week(&self) -> u32 {
        self.engine.read().await.current_week()
    }

    pub async fn play_week(&self, week: u32) -> Result<(), LeagueError> {
        self.engine.write().await.play_week(week)
    }

    pub async fn play_current_week(&self) -> Result<WeekResults, LeagueError> {
        self.engine.write().await.play_current_week()
    }

    /// Play the rest of the season, returning the matches played and the
    /// week pointer left behind, both read under the same write guard.
    pub async fn simulate_all_weeks(&self) -> Result<(Vec<Match>, u32), LeagueError> {
        let mut engine = self.engine.write().await;
        let played = engine.simulate_all_weeks()?;
        Ok((played, engine.current_week()))
    }

    pub async fn reset_league(&self) -> Result<(), LeagueError> {
        self.engine.write().await.reset_league()
    }

    pub async fn create_team(&self, name: &str, strength: u32) -> Result<Team, LeagueError> {
        self.engine.write().await.create_team(name, strength)
    }

    pub async fn team_by_id(&self, id: TeamId) -> Result<Team, LeagueError> {
        self.engine.read().await.team_by_id(id)
    }

    pub async fn matches_by_week(&self, week: u32) -> Result<Vec<Match>, LeagueError> {
        self.engine.read().await.matches_by_week(week)
    }

    /// League table with a forecast over the configured number of replays.
    pub async fn league_table(&self) -> Result<LeagueTable, LeagueError> {
        self.league_table_with(self.replays).await
    }

    pub async fn league_table_with(&self, replays: usize) -> Result<LeagueTable, LeagueError> {
        let guard = self.engine.read().await;
        let engine = &*guard;

        let snapshot = engine.snapshot()?;
        let teams = engine.standings()?;
        let tally = self.predictor.run(snapshot.clone(), replays).await?;
        let championship_predictions =
            tally.into_predictions(|id| live_team_name(engine, id))?;

        Ok(LeagueTable {
            teams,
            matches: snapshot.matches,
            current_week: snapshot.current_week,
            championship_predictions,
            generated_at: Utc::now(),
        })
    }

    /// Forecast only, without the rest of the table.
    pub async fn predict(&self, replays: usize) -> Result<Vec<Prediction>, LeagueError> {
        let guard = self.engine.read().await;
        let engine = &*guard;
        let tally = self.predictor.run(engine.snapshot()?, replays).await?;
        tally.into_predictions(|id| live_team_name(engine, id))
    }
}

fn live_team_name<T: TeamStore, M: MatchStore>(
    engine: &SeasonEngine<T, M>,
    id: TeamId,
) -> Result<Option<String>, LeagueError> {
    match engine.team_by_id(id) {
        Ok(team) => Ok(Some(team.name)),
        Err(LeagueError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Open the JSONL-backed league under `config.data_dir` and bootstrap it.
pub async fn open_live_league(config: &AppConfig) -> Result<LiveLeague, LeagueError> {
    let storage = StorageConfig::new(config.data_dir.clone());
    let teams: Box<dyn TeamStore> = Box::new(JsonlTeamStore::open(&storage)?);
    let matches: Box<dyn MatchStore> = Box::new(JsonlMatchStore::open(&storage)?);

    let league = League::with_config(teams, matches, config)?;
    league.bootstrap(&config.teams).await?;

    info!(
        data_dir = %config.data_dir.display(),
        current_week = league.current_week().await,
        "League opened"
    );
    Ok(league)
}
