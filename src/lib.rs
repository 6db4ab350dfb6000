// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod available;
pub mod cadence;
pub mod config;
pub mod identity;
pub mod player;
pub mod roster;
