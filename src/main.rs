use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_sim::api::{build_router, cors_layer, state::AppState};
use league_sim::config::AppConfig;
use league_sim::models::{LeagueTable, Match, Team, TeamId};
use league_sim::season::open_live_league;

#[derive(Parser)]
#[command(name = "league-sim")]
#[command(about = "Four-team league simulator with championship forecasts")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the league table with championship forecast
    Table {
        /// Forecast replays (defaults to the configured count)
        #[arg(long)]
        replays: Option<usize>,
    },

    /// Play the current week
    PlayWeek,

    /// Play every remaining week
    SimulateAll,

    /// Reset team records and regenerate fixtures
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting league-sim v{}", env!("CARGO_PKG_VERSION"));

    let league = open_live_league(&config)
        .await
        .context("Failed to open league")?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let cors = cors_layer(&config.server.cors_origin)
                .with_context(|| format!("Invalid CORS origin: {}", config.server.cors_origin))?;
            let app = build_router(AppState::new(league)).layer(cors);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Table { replays } => {
            let table = match replays {
                Some(n) => league.league_table_with(n).await?,
                None => league.league_table().await?,
            };
            print_table(&table);
        }
        Commands::PlayWeek => match league.play_current_week().await {
            Ok(results) => print!("{}", results),
            Err(e) if e.is_league_complete() => println!("{}", e),
            Err(e) => return Err(e.into()),
        },
        Commands::SimulateAll => match league.simulate_all_weeks().await {
            Ok((matches, _)) => {
                let table = league.league_table_with(0).await?;
                print_matches(&matches, &table.teams);
            }
            Err(e) if e.is_league_complete() => {
                println!(
                    "League simulation completed previously. Use `reset` to start a new season."
                )
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Reset => {
            league.reset_league().await?;
            println!("League reset successfully");
        }
    }

    Ok(())
}

fn print_table(table: &LeagueTable) {
    println!("\n=== League Table (week {}) ===", table.current_week);
    println!(
        "{:<4} {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for (i, team) in table.teams.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
            i + 1,
            team.name,
            team.matches_played,
            team.wins,
            team.draws,
            team.losses,
            team.goals_for,
            team.goals_against,
            team.goal_difference(),
            team.points
        );
    }

    if !table.championship_predictions.is_empty() {
        println!("\n=== Championship Forecast ===");
        for p in &table.championship_predictions {
            println!("{:<20} {:>6.2}%", p.team_name, p.championship_likelihood);
        }
    }
}

fn print_matches(matches: &[Match], teams: &[Team]) {
    let name = |id: TeamId| {
        teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("team {}", id))
    };

    let mut week = 0;
    for m in matches {
        if m.week != week {
            week = m.week;
            println!("\nWeek {}:", week);
        }
        println!(
            "  {} vs {}: {} - {}",
            name(m.home_team_id),
            name(m.away_team_id),
            m.home_goals,
            m.away_goals
        );
    }
}
