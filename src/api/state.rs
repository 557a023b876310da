use std::sync::Arc;

use crate::season::LiveLeague;

#[derive(Clone)]
pub struct AppState {
    pub league: Arc<LiveLeague>,
}

impl AppState {
    pub fn new(league: LiveLeague) -> Self {
        Self {
            league: Arc::new(league),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    use crate::config::{AppConfig, PredictionConfig, SimulationConfig};
    use crate::season::League;
    use crate::storage::{MatchStore, MemoryMatchStore, MemoryTeamStore, TeamStore};

    let config = AppConfig {
        simulation: SimulationConfig {
            home_advantage: 10,
            seed: Some(99),
        },
        prediction: PredictionConfig {
            replays: 50,
            max_replays: 500,
            max_concurrency: 2,
            timeout_seconds: 30,
        },
        ..AppConfig::default()
    };

    let teams: Box<dyn TeamStore> = Box::new(MemoryTeamStore::new());
    let matches: Box<dyn MatchStore> = Box::new(MemoryMatchStore::new());
    let league = League::with_config(teams, matches, &config).unwrap();
    league.bootstrap(&config.teams).await.unwrap();
    AppState::new(league)
}
