use crate::state::{Map, PlayerState};

/// Everything the engine observes about the game at the start of a turn.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub turn: u32,
    pub map: Map,
    pub player: PlayerState,
}

impl WorldState {
    pub fn new(map: Map, player: PlayerState) -> Self {
        Self {
            turn: 0,
            map,
            player,
        }
    }
}
