use std::fmt;

use crate::infra::{Position, ResourceType};
use crate::state::Map;

/// Total cargo a worker can carry across all resource types.
pub const WORKER_CARGO_CAPACITY: i32 = 100;

/// Cargo a worker spends to found a territory tile.
pub const CITY_BUILD_COST: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cargo {
    pub wood: i32,
    pub coal: i32,
    pub uranium: i32,
}

impl Cargo {
    pub fn total(&self) -> i32 {
        self.wood + self.coal + self.uranium
    }

    pub fn get(&self, kind: ResourceType) -> i32 {
        match kind {
            ResourceType::Wood => self.wood,
            ResourceType::Coal => self.coal,
            ResourceType::Uranium => self.uranium,
        }
    }

    pub fn add(&mut self, kind: ResourceType, amount: i32) {
        match kind {
            ResourceType::Wood => self.wood += amount,
            ResourceType::Coal => self.coal += amount,
            ResourceType::Uranium => self.uranium += amount,
        }
    }
}

/// Snapshot of one of our workers as reported by the game for the current turn.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub position: Position,
    pub cargo: Cargo,
    pub cooldown: f32,
}

impl Unit {
    pub fn new(id: UnitId, position: Position) -> Self {
        Self {
            id,
            position,
            cargo: Cargo::default(),
            cooldown: 0.0,
        }
    }

    pub fn cargo_space_remaining(&self) -> i32 {
        (WORKER_CARGO_CAPACITY - self.cargo.total()).max(0)
    }

    pub fn is_cargo_full(&self) -> bool {
        self.cargo_space_remaining() == 0
    }

    pub fn can_act(&self) -> bool {
        self.cooldown < 1.0
    }

    pub fn can_build(&self, map: &Map) -> bool {
        self.can_act() && self.cargo.total() >= CITY_BUILD_COST && map.is_empty(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_build_requires_full_cargo_and_empty_tile() {
        let map = Map::parse("w..\n...").unwrap();
        let mut unit = Unit::new(UnitId(1), Position::new(1, 0));
        assert!(!unit.can_build(&map));

        unit.cargo.add(ResourceType::Wood, CITY_BUILD_COST);
        assert!(unit.is_cargo_full());
        assert!(unit.can_build(&map));

        unit.position = Position::new(0, 0);
        assert!(!unit.can_build(&map), "resource tile is not buildable");

        unit.position = Position::new(1, 1);
        unit.cooldown = 2.0;
        assert!(!unit.can_build(&map), "unit on cooldown cannot act");
    }
}
