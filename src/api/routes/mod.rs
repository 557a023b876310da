pub mod league;
pub mod teams;
