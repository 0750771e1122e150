mod command;
mod config;
mod default_observer;
mod game_observer;
mod pathfinding;
mod replay;
mod sandbox;
mod types;

pub use command::Command;
pub use config::{BotConfig, BuildSitePolicy, ConfigError, FleetConfig, TaskQuota};
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use pathfinding::Bfs;
pub use replay::ReplayFile;
pub use sandbox::Sandbox;
pub use types::{Bounds, Direction, Position, ResourceType};
