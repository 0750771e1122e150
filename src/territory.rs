use tracing::debug;

use crate::infra::{Command, Position};
use crate::state::{City, CityId, CityTile, Map};

/// A group of contiguous territory tiles owned by the player.
#[derive(Debug, Clone)]
pub struct Territory {
    pub id: CityId,
    pub tiles: Vec<CityTile>,
}

impl Territory {
    fn nearest_tile(&self, point: &Position) -> Option<&CityTile> {
        self.tiles
            .iter()
            .min_by_key(|tile| tile.position.distance(point))
    }
}

/// City layer: where to expand, and how to spend territory tile actions.
#[derive(Debug, Clone, Default)]
pub struct TerritoryCoordinator {
    territories: Vec<Territory>,
}

impl TerritoryCoordinator {
    pub fn new(cities: &[City]) -> Self {
        let mut coordinator = Self::default();
        coordinator.update(cities);
        coordinator
    }

    pub fn update(&mut self, cities: &[City]) {
        self.territories = cities
            .iter()
            .map(|city| Territory {
                id: city.id,
                tiles: city.tiles.clone(),
            })
            .collect();
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn tile_count(&self) -> usize {
        self.territories.iter().map(|t| t.tiles.len()).sum()
    }

    fn tiles(&self) -> impl Iterator<Item = &CityTile> {
        self.territories.iter().flat_map(|t| t.tiles.iter())
    }

    pub fn contains(&self, point: &Position) -> bool {
        self.tiles().any(|tile| tile.position == *point)
    }

    /// Closest tile across every territory.
    pub fn nearest_tile(&self, point: &Position) -> Option<Position> {
        self.territories
            .iter()
            .filter_map(|territory| territory.nearest_tile(point))
            .min_by_key(|tile| tile.position.distance(point))
            .map(|tile| tile.position)
    }

    /// Scan territory tiles from nearest to farthest and return the first free
    /// 4-neighbour (on-grid, no structure, no resource).
    pub fn nearest_buildable_periphery(&self, map: &Map, point: &Position) -> Option<Position> {
        let mut tiles: Vec<Position> = self.tiles().map(|tile| tile.position).collect();
        tiles.sort_by_key(|pos| pos.distance(point));

        tiles
            .iter()
            .flat_map(|tile| tile.neighbors())
            .find(|neighbor| map.is_empty(neighbor))
    }

    /// Every tile that can act either creates a worker, while there are fewer
    /// workers than tiles, or advances research. The worker deficit is shared
    /// across territories first come first served.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn collect_actions(&self, total_tiles: usize, total_units: usize) -> Vec<Command> {
        let mut deficit = total_tiles.saturating_sub(total_units);
        let mut actions = Vec::new();

        for territory in &self.territories {
            for tile in territory.tiles.iter().filter(|tile| tile.can_act()) {
                if deficit > 0 {
                    debug!("Territory {:?} creating worker at {}", territory.id, tile.position);
                    actions.push(Command::BuildWorker { at: tile.position });
                    deficit -= 1;
                } else {
                    actions.push(Command::Research { at: tile.position });
                }
            }
        }

        actions
    }
}
