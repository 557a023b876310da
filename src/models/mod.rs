//! Core data models for the league simulator.

mod fixture;
mod ids;
mod prediction;
mod team;

pub use fixture::*;
pub use ids::*;
pub use prediction::*;
pub use team::*;
