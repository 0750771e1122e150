use tracing::debug;

use crate::infra::{Position, ResourceType};
use crate::mining::{Mine, MineId, ResourceClusterer};
use crate::state::{Map, PlayerState, UnitId};

/// Owns every mine discovered on the map and hands out mining slots.
///
/// Units refer to mines by [`MineId`] only. A lookup may therefore find a mine
/// that has since been depleted or that no longer lists the unit; callers are
/// expected to re-validate before relying on an old membership.
#[derive(Debug, Clone)]
pub struct MineRegistry {
    mines: Vec<Mine>,
    preferred_resource_type: ResourceType,
}

impl MineRegistry {
    pub fn build(map: &Map) -> Self {
        let mines: Vec<Mine> = ResourceClusterer::scan(map)
            .into_iter()
            .enumerate()
            .map(|(i, cluster)| Mine::new(MineId(i), cluster))
            .collect();

        debug!("Built {} mines", mines.len());
        Self {
            mines,
            preferred_resource_type: ResourceType::Wood,
        }
    }

    pub fn mines(&self) -> &[Mine] {
        &self.mines
    }

    pub fn get(&self, id: MineId) -> Option<&Mine> {
        self.mines.get(id.0)
    }

    pub fn preferred_resource_type(&self) -> ResourceType {
        self.preferred_resource_type
    }

    /// Drop tiles that lost their resource, releasing the slots that pointed at them.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn update(&mut self, map: &Map) {
        for mine in &mut self.mines {
            let before = mine.tiles().len();
            let evicted = mine.retain_resource_tiles(map);
            let removed = before - mine.tiles().len();
            if removed > 0 {
                debug!(
                    "Mine {:?} lost {} tiles ({} left), evicted {:?}",
                    mine.id,
                    removed,
                    mine.tiles().len(),
                    evicted
                );
            }
        }
    }

    /// Highest unlocked tier wins; research never regresses so neither does this.
    pub fn update_preferred_fuel(&mut self, player: &PlayerState) {
        let best = ResourceType::ALL
            .into_iter()
            .filter(|kind| player.researched(*kind))
            .max()
            .unwrap_or(ResourceType::Wood);

        if best > self.preferred_resource_type {
            debug!(
                "Preferred fuel upgraded from {} to {}",
                self.preferred_resource_type, best
            );
            self.preferred_resource_type = best;
        }
    }

    /// Join the nearest mine of `resource_type` that still has an opening.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn place(
        &mut self,
        unit: UnitId,
        position: Position,
        resource_type: ResourceType,
    ) -> Option<MineId> {
        let mut candidates: Vec<(i32, MineId)> = self
            .mines
            .iter()
            .filter(|mine| mine.resource_type == resource_type)
            .filter_map(|mine| mine.distance_to(&position).map(|d| (d, mine.id)))
            .collect();
        candidates.sort_by_key(|(distance, _)| *distance);

        let id = candidates
            .into_iter()
            .map(|(_, id)| id)
            .find(|id| self.mines[id.0].has_opening())?;

        self.mines[id.0].join(unit);
        debug!("Unit {} placed in mine {:?}", unit, id);
        Some(id)
    }

    pub fn acquire_slot(&mut self, id: MineId, unit: UnitId, position: Position) -> Option<Position> {
        self.mines.get_mut(id.0)?.acquire_slot(unit, &position)
    }

    pub fn release_slot(&mut self, id: MineId, unit: UnitId) {
        if let Some(mine) = self.mines.get_mut(id.0)
            && mine.release_slot(unit)
        {
            debug!("Unit {} released from mine {:?}", unit, id);
        }
    }

    /// A unit found its tile empty: drop the tile and the reporter's slot.
    pub fn report_depleted(&mut self, tile: Position, unit: UnitId) {
        for mine in &mut self.mines {
            if mine.contains(&tile) {
                mine.remove_tile(&tile);
                debug!("Unit {} reported {} depleted in mine {:?}", unit, tile, mine.id);
            }
            mine.release_slot(unit);
        }
    }

    pub fn is_member(&self, id: MineId, unit: UnitId) -> bool {
        self.get(id).is_some_and(|mine| mine.is_member(unit))
    }

    pub fn slot_of(&self, id: MineId, unit: UnitId) -> Option<Position> {
        self.get(id).and_then(|mine| mine.slot_of(unit))
    }

    pub fn open_mine_count(&self) -> usize {
        self.mines.iter().filter(|mine| mine.has_opening()).count()
    }
}
