use std::fmt;

use crate::infra::{Direction, Position};
use crate::state::UnitId;

/// A single turn action for a unit or a territory tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move { unit: UnitId, direction: Direction },
    BuildCity { unit: UnitId },
    BuildWorker { at: Position },
    Research { at: Position },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { unit, direction } => write!(f, "m {} {}", unit, direction.as_str()),
            Command::BuildCity { unit } => write!(f, "bcity {}", unit),
            Command::BuildWorker { at } => write!(f, "bw {} {}", at.x, at.y),
            Command::Research { at } => write!(f, "r {} {}", at.x, at.y),
        }
    }
}
