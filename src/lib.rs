//! # League Sim
//!
//! A four-team football league simulator with a Monte Carlo championship
//! forecast.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, matches, league table views)
//! - **storage**: Team and match stores (in-memory and JSONL)
//! - **calculate**: Standings ordering
//! - **season**: Fixtures, match simulation, the season engine and forecasting
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod season;
pub mod storage;

pub use models::*;
