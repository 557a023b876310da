//! Monte Carlo championship forecast.
//!
//! Every replay gets its own in-memory copy of the season snapshot and its
//! own seeded random source, plays the remaining weeks and reports the team
//! on top of the final table. Replays share nothing mutable except the
//! champion tally, which is only reduced after all of them have joined.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{LeagueError, MatchSimulator, SeasonEngine, SeasonSnapshot};
use crate::calculate::leader;
use crate::config::PredictionConfig;
use crate::models::{Prediction, TeamId};

/// Championship counts over a fixed number of replays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionTally {
    replays: usize,
    wins: HashMap<TeamId, u32>,
}

impl ChampionTally {
    pub fn new(replays: usize, wins: HashMap<TeamId, u32>) -> Self {
        Self { replays, wins }
    }

    pub fn replays(&self) -> usize {
        self.replays
    }

    pub fn wins(&self, team_id: TeamId) -> u32 {
        self.wins.get(&team_id).copied().unwrap_or(0)
    }

    pub fn total_wins(&self) -> u64 {
        self.wins.values().map(|&w| u64::from(w)).sum()
    }

    /// Convert counts to percentages of all replays, most likely first.
    ///
    /// `team_name` resolves names from the live store; teams it cannot find
    /// are left out.
    pub fn into_predictions<F>(self, mut team_name: F) -> Result<Vec<Prediction>, LeagueError>
    where
        F: FnMut(TeamId) -> Result<Option<String>, LeagueError>,
    {
        let mut predictions = Vec::with_capacity(self.wins.len());

        for (team_id, wins) in self.wins {
            if wins == 0 {
                continue;
            }
            let Some(team_name) = team_name(team_id)? else {
                warn!(%team_id, "Champion missing from live store, skipping prediction");
                continue;
            };
            predictions.push(Prediction {
                team_id,
                team_name,
                championship_likelihood: f64::from(wins) / self.replays as f64 * 100.0,
            });
        }

        predictions.sort_by(|a, b| {
            b.championship_likelihood
                .total_cmp(&a.championship_likelihood)
                .then_with(|| a.team_id.cmp(&b.team_id))
        });
        Ok(predictions)
    }
}

/// Runs season replays concurrently and tallies their champions.
pub struct Predictor {
    simulator: MatchSimulator,
    max_replays: usize,
    max_concurrency: usize,
    timeout: Duration,
    seeds: Mutex<ChaCha8Rng>,
}

impl Predictor {
    /// `seed` fixes the sequence of replay seeds; `None` draws from OS entropy.
    pub fn new(simulator: MatchSimulator, config: &PredictionConfig, seed: Option<u64>) -> Self {
        let seeds = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            simulator,
            max_replays: config.max_replays,
            max_concurrency: config.max_concurrency.max(1),
            timeout: Duration::from_secs(config.timeout_seconds),
            seeds: Mutex::new(seeds),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replay the rest of the season `replays` times from `snapshot`.
    ///
    /// Any failed replay fails the whole prediction, so the percentages are
    /// always over exactly `replays` seasons. On timeout or failure, replays
    /// already running stop at their next week boundary.
    pub async fn run(
        &self,
        snapshot: SeasonSnapshot,
        replays: usize,
    ) -> Result<ChampionTally, LeagueError> {
        if replays > self.max_replays {
            return Err(LeagueError::InvalidInput(format!(
                "requested {} replays, limit is {}",
                replays, self.max_replays
            )));
        }
        if replays == 0 {
            return Ok(ChampionTally::new(0, HashMap::new()));
        }

        let started = Instant::now();
        let tally = tokio::time::timeout(self.timeout, self.run_replays(snapshot, replays))
            .await
            .map_err(|_| LeagueError::PredictionTimedOut(self.timeout))??;

        info!(
            replays,
            contenders = tally.wins.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prediction complete"
        );
        Ok(tally)
    }

    async fn run_replays(
        &self,
        snapshot: SeasonSnapshot,
        replays: usize,
    ) -> Result<ChampionTally, LeagueError> {
        let seeds = self.draw_seeds(replays);
        let snapshot = Arc::new(snapshot);
        let champions: Arc<DashMap<TeamId, u32>> = Arc::new(DashMap::new());
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let cancel = CancelOnDrop::default();
        let mut tasks = JoinSet::new();

        for (replay, seed) in seeds.into_iter().enumerate() {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| LeagueError::TaskFailed(e.to_string()))?;
            let snapshot = Arc::clone(&snapshot);
            let champions = Arc::clone(&champions);
            let cancelled = cancel.flag();
            let simulator = self.simulator;

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let champion = run_replay(&snapshot, simulator, seed, &cancelled).map_err(|e| {
                    LeagueError::ReplayFailed {
                        replay,
                        source: Box::new(e),
                    }
                })?;
                if let Some(team_id) = champion {
                    *champions.entry(team_id).or_insert(0) += 1;
                }
                Ok::<(), LeagueError>(())
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| LeagueError::TaskFailed(e.to_string()))
                .and_then(|result| result);
            if let Err(e) = outcome {
                tasks.abort_all();
                return Err(e);
            }
        }

        let wins = champions
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        Ok(ChampionTally::new(replays, wins))
    }

    fn draw_seeds(&self, count: usize) -> Vec<u64> {
        let mut rng = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
        (0..count).map(|_| rng.gen()).collect()
    }
}

/// Raises a shared flag when dropped.
///
/// Blocking replay tasks cannot be aborted, so the flag is how a dropped or
/// failed prediction tells the ones still running to stop.
#[derive(Default)]
struct CancelOnDrop(Arc<AtomicBool>);

impl CancelOnDrop {
    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Play one isolated copy of the season to the end and name its champion.
///
/// `cancelled` is checked before each week; once set, the replay stops
/// without a champion.
fn run_replay(
    snapshot: &SeasonSnapshot,
    simulator: MatchSimulator,
    seed: u64,
    cancelled: &AtomicBool,
) -> Result<Option<TeamId>, LeagueError> {
    let mut engine = SeasonEngine::from_snapshot(snapshot, simulator, seed);

    while !engine.is_complete() {
        if cancelled.load(Ordering::Relaxed) {
            debug!(seed, week = engine.current_week(), "Replay cancelled");
            return Err(LeagueError::TaskFailed("replay cancelled".to_string()));
        }
        engine.play_week(engine.current_week())?;
    }

    let teams = engine.teams()?;
    let champion = leader(&teams).map(|t| t.id);
    debug!(seed, champion = ?champion, "Replay finished");
    Ok(champion)
}
