use tracing::debug;

use crate::fleet::{FleetCoordinator, Objective, TurnContext};
use crate::infra::{Command, FleetConfig, TaskQuota};
use crate::mining::MineRegistry;
use crate::state::WorldState;
use crate::territory::TerritoryCoordinator;

/// Aggregate counts describing the player's position after a turn's update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnSummary {
    pub turn: u32,
    pub workers: usize,
    pub builders: usize,
    pub gatherers: usize,
    pub resting: usize,
    pub territory_tiles: usize,
    pub research_points: i32,
    pub open_mines: usize,
}

/// Session object holding every piece of cross-turn state.
///
/// Created on the first turn, then updated in place with each new observation.
#[derive(Debug, Clone)]
pub struct Controller {
    registry: MineRegistry,
    fleet: FleetCoordinator,
    territory: TerritoryCoordinator,
    config: FleetConfig,
    summary: TurnSummary,
}

impl Controller {
    pub fn new(world: &WorldState, config: FleetConfig) -> Self {
        let mut controller = Self {
            registry: MineRegistry::build(&world.map),
            fleet: FleetCoordinator::new(config.task_quota),
            territory: TerritoryCoordinator::default(),
            config,
            summary: TurnSummary::default(),
        };
        controller.update(world);
        controller
    }

    pub fn registry(&self) -> &MineRegistry {
        &self.registry
    }

    pub fn fleet(&self) -> &FleetCoordinator {
        &self.fleet
    }

    pub fn territory(&self) -> &TerritoryCoordinator {
        &self.territory
    }

    pub fn summary(&self) -> TurnSummary {
        self.summary
    }

    #[tracing::instrument(level = "debug", skip_all, fields(turn = world.turn))]
    pub fn update(&mut self, world: &WorldState) {
        self.registry.update(&world.map);
        self.registry.update_preferred_fuel(&world.player);
        self.territory.update(&world.player.cities);
        self.fleet.update(&world.player.units, &mut self.registry);

        self.summary = TurnSummary {
            turn: world.turn,
            workers: self.fleet.len(),
            builders: self.fleet.count(Objective::BuildCity),
            gatherers: self.fleet.count(Objective::GatherFuel),
            resting: self.fleet.count(Objective::Rest),
            territory_tiles: self.territory.tile_count(),
            research_points: world.player.research_points,
            open_mines: self.registry.open_mine_count(),
        };
        debug!("{:?}", self.summary);
    }

    pub fn set_task_quota(&mut self, quota: TaskQuota) {
        self.config.task_quota = quota;
        self.fleet.set_quota(quota, &mut self.registry);
    }

    /// Worker commands first, then territory commands.
    #[tracing::instrument(level = "debug", skip_all, fields(turn = world.turn))]
    pub fn collect_actions(&mut self, world: &WorldState) -> Vec<Command> {
        let mut ctx = TurnContext {
            map: &world.map,
            registry: &mut self.registry,
            territory: &self.territory,
            build_site: self.config.build_site,
        };
        let mut actions = self.fleet.collect_actions(&mut ctx);
        actions.extend(
            self.territory
                .collect_actions(self.territory.tile_count(), self.fleet.len()),
        );
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Direction, Position};
    use crate::state::{City, CityId, CityTile, Map, PlayerState, Team, Unit, UnitId};

    fn world(ascii: &str, units: &[(u32, i32, i32)]) -> WorldState {
        let map = Map::parse(ascii).unwrap();
        let mut player = PlayerState::new(Team(0));
        let tiles: Vec<CityTile> = map
            .iter()
            .filter(|(_, cell)| cell.structure.is_some_and(|s| s.team == Team(0)))
            .map(|(pos, _)| CityTile::new(pos))
            .collect();
        if !tiles.is_empty() {
            player.cities.push(City {
                id: CityId(1),
                fuel: 0,
                tiles,
            });
        }
        player.units = units
            .iter()
            .map(|&(id, x, y)| Unit::new(UnitId(id), Position::new(x, y)))
            .collect();
        WorldState::new(map, player)
    }

    #[test]
    fn test_first_turn_sends_worker_to_mine_and_city_researches() {
        let world = world("C..\n...\n..w", &[(1, 0, 0)]);
        let mut controller = Controller::new(&world, FleetConfig::default());

        let actions = controller.collect_actions(&world);
        assert_eq!(
            actions,
            vec![
                Command::Move {
                    unit: UnitId(1),
                    direction: Direction::East,
                },
                Command::Research {
                    at: Position::new(0, 0)
                },
            ]
        );

        let summary = controller.summary();
        assert_eq!(summary.workers, 1);
        assert_eq!(summary.builders, 1);
        assert_eq!(summary.territory_tiles, 1);
    }

    #[test]
    fn test_territory_creates_workers_while_short() {
        let world = world("CC.\n...\nw..", &[]);
        let mut controller = Controller::new(&world, FleetConfig::default());
        let actions = controller.collect_actions(&world);
        assert_eq!(
            actions,
            vec![
                Command::BuildWorker {
                    at: Position::new(0, 0)
                },
                Command::BuildWorker {
                    at: Position::new(1, 0)
                },
            ]
        );
    }

    #[test]
    fn test_quota_change_moves_workers_home() {
        let world = world("C...w", &[(1, 3, 0)]);
        let mut controller = Controller::new(&world, FleetConfig::default());
        controller.collect_actions(&world);
        assert_eq!(controller.registry().open_mine_count(), 0);

        controller.set_task_quota(TaskQuota::new(0.0, 0.0, 1.0));
        assert_eq!(controller.registry().open_mine_count(), 1);

        let actions = controller.collect_actions(&world);
        assert_eq!(
            actions[0],
            Command::Move {
                unit: UnitId(1),
                direction: Direction::West,
            }
        );
    }
}
