use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::infra::{Bfs, Command, Direction, Position, ResourceType};
use crate::state::{
    CITY_BUILD_COST, Cargo, City, CityId, CityTile, Map, MapError, PlayerState, Resource, Structure,
    Team, Unit, UnitId, WorldState,
};

/// Cooldown a worker gets after moving or building.
const WORKER_COOLDOWN: f32 = 2.0;

/// Cooldown a territory tile gets after creating a worker or researching.
const CITY_TILE_COOLDOWN: f32 = 10.0;

const OWN_TEAM: Team = Team(0);

fn harvest_rate(kind: ResourceType) -> i32 {
    match kind {
        ResourceType::Wood => 20,
        ResourceType::Coal => 5,
        ResourceType::Uranium => 2,
    }
}

fn fuel_value(kind: ResourceType) -> i32 {
    match kind {
        ResourceType::Wood => 1,
        ResourceType::Coal => 10,
        ResourceType::Uranium => 40,
    }
}

/// In-process game with simplified rules, used to drive the engine without a
/// remote server.
pub struct Sandbox {
    world: WorldState,
    next_unit_id: u32,
    next_city_id: u32,
}

impl Sandbox {
    /// Generate a square map with resource clusters scattered by `seed`, one
    /// territory tile near the centre and a single worker standing on it.
    pub fn generate(seed: u64, size: i32) -> Result<Self, MapError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut map = Map::new(size, size)?;

        let clusters = [
            (ResourceType::Wood, (size / 2).max(2), 300..=500),
            (ResourceType::Coal, (size / 4).max(1), 200..=350),
            (ResourceType::Uranium, (size / 8).max(1), 150..=300),
        ];
        for (kind, count, amounts) in clusters {
            for _ in 0..count {
                let start = Position::new(rng.random_range(0..size), rng.random_range(0..size));
                let length = rng.random_range(2..=6);
                scatter_cluster(&mut rng, &mut map, start, length, kind, amounts.clone());
            }
        }

        let center = Position::new(size / 2, size / 2);
        let start = if map.is_empty(&center) {
            center
        } else {
            Bfs::find_nearest_empty(&map, center).unwrap_or(center)
        };
        map.set_resource(&start, None);
        map.set_structure(&start, Some(Structure { team: OWN_TEAM }));

        let mut player = PlayerState::new(OWN_TEAM);
        player.cities.push(City {
            id: CityId(1),
            fuel: 0,
            tiles: vec![CityTile::new(start)],
        });
        player.units.push(Unit::new(UnitId(1), start));

        debug!("Sandbox generated with seed {}, start at {}", seed, start);

        Ok(Self {
            world: WorldState::new(map, player),
            next_unit_id: 2,
            next_city_id: 2,
        })
    }

    /// Wrap an existing observation; ids continue after the highest ones present.
    #[cfg(test)]
    pub fn from_world(world: WorldState) -> Self {
        let next_unit_id = world.player.units.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let next_city_id = world.player.cities.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        Self {
            world,
            next_unit_id,
            next_city_id,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn turn(&self) -> u32 {
        self.world.turn
    }

    /// Apply one turn of commands in order, then harvest, deposit and cool down.
    #[tracing::instrument(level = "debug", skip_all, fields(turn = self.world.turn))]
    pub fn apply(&mut self, actions: &[Command]) {
        for action in actions {
            let applied = match *action {
                Command::Move { unit, direction } => self.move_unit(unit, direction),
                Command::BuildCity { unit } => self.build_city(unit),
                Command::BuildWorker { at } => self.build_worker(at),
                Command::Research { at } => self.research(at),
            };
            if !applied {
                trace!("Ignored invalid action {}", action);
            }
        }

        self.harvest();
        self.deposit();
        self.cool_down();
        self.world.turn += 1;
    }

    fn is_own_territory(&self, pos: &Position) -> bool {
        self.world
            .map
            .get(pos)
            .and_then(|cell| cell.structure)
            .is_some_and(|structure| structure.team == OWN_TEAM)
    }

    fn unit_index(&self, id: UnitId) -> Option<usize> {
        self.world.player.units.iter().position(|unit| unit.id == id)
    }

    fn tile_mut(&mut self, at: Position) -> Option<&mut CityTile> {
        self.world
            .player
            .cities
            .iter_mut()
            .flat_map(|city| city.tiles.iter_mut())
            .find(|tile| tile.position == at)
    }

    fn move_unit(&mut self, id: UnitId, direction: Direction) -> bool {
        let Some(index) = self.unit_index(id) else {
            return false;
        };
        let unit = &self.world.player.units[index];
        if !unit.can_act() || direction == Direction::Center {
            return false;
        }

        let target = unit.position.translate(direction);
        if !self.world.map.in_bounds(&target) {
            return false;
        }
        let enemy_structure = self
            .world
            .map
            .get(&target)
            .and_then(|cell| cell.structure)
            .is_some_and(|structure| structure.team != OWN_TEAM);
        let occupied = self.world.player.units.iter().any(|u| u.position == target);
        if enemy_structure || (occupied && !self.is_own_territory(&target)) {
            return false;
        }

        let unit = &mut self.world.player.units[index];
        unit.position = target;
        unit.cooldown = WORKER_COOLDOWN;
        true
    }

    fn build_city(&mut self, id: UnitId) -> bool {
        let Some(index) = self.unit_index(id) else {
            return false;
        };
        if !self.world.player.units[index].can_build(&self.world.map) {
            return false;
        }

        let unit = &mut self.world.player.units[index];
        let at = unit.position;
        unit.cargo = spend(unit.cargo, CITY_BUILD_COST);
        unit.cooldown = WORKER_COOLDOWN;
        self.world.map.set_structure(&at, Some(Structure { team: OWN_TEAM }));

        // Join every adjacent territory into the first one found.
        let cities = &mut self.world.player.cities;
        let mut adjacent: Vec<usize> = cities
            .iter()
            .enumerate()
            .filter(|(_, city)| city.tiles.iter().any(|tile| tile.position.is_adjacent(&at)))
            .map(|(i, _)| i)
            .collect();

        match adjacent.first().copied() {
            Some(first) => {
                while let Some(other) = adjacent.pop().filter(|&i| i != first) {
                    let merged = cities.remove(other);
                    cities[first].fuel += merged.fuel;
                    cities[first].tiles.extend(merged.tiles);
                }
                cities[first].tiles.push(CityTile::new(at));
            }
            None => {
                cities.push(City {
                    id: CityId(self.next_city_id),
                    fuel: 0,
                    tiles: vec![CityTile::new(at)],
                });
                self.next_city_id += 1;
            }
        }
        debug!("City built at {}", at);
        true
    }

    fn build_worker(&mut self, at: Position) -> bool {
        if self.world.player.units.len() >= self.world.player.city_tile_count() {
            return false;
        }
        let Some(tile) = self.tile_mut(at).filter(|tile| tile.can_act()) else {
            return false;
        };
        tile.cooldown = CITY_TILE_COOLDOWN;

        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.world.player.units.push(Unit::new(id, at));
        debug!("Worker {} created at {}", id, at);
        true
    }

    fn research(&mut self, at: Position) -> bool {
        let Some(tile) = self.tile_mut(at).filter(|tile| tile.can_act()) else {
            return false;
        };
        tile.cooldown = CITY_TILE_COOLDOWN;
        self.world.player.research_points += 1;
        true
    }

    /// Workers take from their own tile and the four adjacent ones, in that
    /// order, until their cargo is full. Only researched resources are taken.
    fn harvest(&mut self) {
        let map = &mut self.world.map;
        let player = &mut self.world.player;
        let researched: Vec<ResourceType> = ResourceType::ALL
            .into_iter()
            .filter(|kind| player.researched(*kind))
            .collect();

        for unit in &mut player.units {
            let position = unit.position;
            for tile in std::iter::once(position).chain(position.neighbors()) {
                let Some(mut resource) = map.get(&tile).and_then(|cell| cell.resource) else {
                    continue;
                };
                if !researched.contains(&resource.kind) {
                    continue;
                }
                let taken = harvest_rate(resource.kind)
                    .min(unit.cargo_space_remaining())
                    .min(resource.amount);
                if taken == 0 {
                    continue;
                }
                unit.cargo.add(resource.kind, taken);
                resource.amount -= taken;
                map.set_resource(&tile, (resource.amount > 0).then_some(resource));
            }
        }
    }

    fn deposit(&mut self) {
        let map = &self.world.map;
        let player = &mut self.world.player;
        for unit in &mut player.units {
            if unit.cargo.total() == 0
                || !map
                    .get(&unit.position)
                    .and_then(|cell| cell.structure)
                    .is_some_and(|structure| structure.team == OWN_TEAM)
            {
                continue;
            }
            let fuel: i32 = ResourceType::ALL
                .into_iter()
                .map(|kind| unit.cargo.get(kind) * fuel_value(kind))
                .sum();
            if let Some(city) = player
                .cities
                .iter_mut()
                .find(|city| city.tiles.iter().any(|tile| tile.position == unit.position))
            {
                city.fuel += fuel;
            }
            unit.cargo = Cargo::default();
        }
    }

    fn cool_down(&mut self) {
        for unit in &mut self.world.player.units {
            unit.cooldown = (unit.cooldown - 1.0).max(0.0);
        }
        for tile in self
            .world
            .player
            .cities
            .iter_mut()
            .flat_map(|city| city.tiles.iter_mut())
        {
            tile.cooldown = (tile.cooldown - 1.0).max(0.0);
        }
    }
}

/// Remove `cost` from the cargo, wood first.
fn spend(mut cargo: Cargo, cost: i32) -> Cargo {
    let mut remaining = cost;
    for kind in ResourceType::ALL {
        let taken = cargo.get(kind).min(remaining);
        cargo.add(kind, -taken);
        remaining -= taken;
    }
    cargo
}

/// Random walk from `start`, placing resources on every empty tile it visits.
fn scatter_cluster(
    rng: &mut StdRng,
    map: &mut Map,
    start: Position,
    length: usize,
    kind: ResourceType,
    amounts: std::ops::RangeInclusive<i32>,
) {
    let mut current = start;
    for _ in 0..length {
        if map.is_empty(&current) {
            let amount = rng.random_range(amounts.clone());
            map.set_resource(&current, Some(Resource { kind, amount }));
        }
        let direction = Direction::CARDINALS[rng.random_range(0..Direction::CARDINALS.len())];
        let next = current.translate(direction);
        if map.in_bounds(&next) {
            current = next;
        }
    }
}
