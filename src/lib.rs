pub mod controller;
pub mod fleet;
pub mod game;
pub mod infra;
pub mod mining;
pub mod state;
pub mod territory;

// Re-export commonly used types for convenience
pub use controller::{Controller, TurnSummary};
pub use infra::{Command, FleetConfig, Position, TaskQuota};
pub use state::{Map, WorldState};
