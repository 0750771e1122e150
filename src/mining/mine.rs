use std::collections::HashMap;

use crate::infra::{Position, ResourceType};
use crate::mining::Cluster;
use crate::state::{Map, UnitId};

/// Index of a mine inside the registry; stable for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MineId(pub usize);

/// A resource cluster offering one exclusive mining slot per tile.
///
/// Units first join a mine (an entry with no tile) and pick their tile later,
/// so `slots` holds every member. Assigned tiles are always a subset of `tiles`
/// and no two members share one.
#[derive(Debug, Clone)]
pub struct Mine {
    pub id: MineId,
    pub resource_type: ResourceType,
    tiles: Vec<Position>,
    slots: HashMap<UnitId, Option<Position>>,
}

impl Mine {
    pub fn new(id: MineId, cluster: Cluster) -> Self {
        Self {
            id,
            resource_type: cluster.resource_type,
            tiles: cluster.tiles,
            slots: HashMap::new(),
        }
    }

    pub fn tiles(&self) -> &[Position] {
        &self.tiles
    }

    pub fn member_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_depleted(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn has_opening(&self) -> bool {
        !self.is_depleted() && self.tiles.len() > self.slots.len()
    }

    pub fn contains(&self, tile: &Position) -> bool {
        self.tiles.contains(tile)
    }

    pub fn is_member(&self, unit: UnitId) -> bool {
        self.slots.contains_key(&unit)
    }

    pub fn slot_of(&self, unit: UnitId) -> Option<Position> {
        self.slots.get(&unit).copied().flatten()
    }

    /// Shortest distance from `pos` to any remaining tile.
    pub fn distance_to(&self, pos: &Position) -> Option<i32> {
        self.tiles.iter().map(|tile| tile.distance(pos)).min()
    }

    /// Record membership without picking a tile yet.
    pub fn join(&mut self, unit: UnitId) {
        self.slots.entry(unit).or_insert(None);
    }

    /// Return the unit's tile, assigning the nearest free one if it has none.
    pub fn acquire_slot(&mut self, unit: UnitId, from: &Position) -> Option<Position> {
        if let Some(tile) = self.slot_of(unit) {
            return Some(tile);
        }

        let tile = self
            .tiles
            .iter()
            .filter(|tile| !self.slots.values().any(|slot| slot.as_ref() == Some(*tile)))
            .min_by_key(|tile| tile.distance(from))
            .copied()?;

        self.slots.insert(unit, Some(tile));
        Some(tile)
    }

    pub fn release_slot(&mut self, unit: UnitId) -> bool {
        self.slots.remove(&unit).is_some()
    }

    /// Drop tiles whose resource is gone, evicting the members that held them.
    /// Returns the units that lost their slot.
    pub fn retain_resource_tiles(&mut self, map: &Map) -> Vec<UnitId> {
        self.tiles
            .retain(|tile| map.resource_type(tile) == Some(self.resource_type));
        self.evict_missing_tiles()
    }

    pub fn remove_tile(&mut self, tile: &Position) -> Vec<UnitId> {
        self.tiles.retain(|t| t != tile);
        self.evict_missing_tiles()
    }

    fn evict_missing_tiles(&mut self) -> Vec<UnitId> {
        let evicted: Vec<UnitId> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_some_and(|tile| !self.tiles.contains(&tile)))
            .map(|(unit, _)| *unit)
            .collect();
        for unit in &evicted {
            self.slots.remove(unit);
        }
        evicted
    }

    pub fn assigned_tiles(&self) -> impl Iterator<Item = (UnitId, Position)> + '_ {
        self.slots
            .iter()
            .filter_map(|(unit, slot)| slot.map(|tile| (*unit, tile)))
    }
}
