use std::collections::HashSet;

use tracing::{debug, info};

use crate::fleet::{Objective, TurnContext, WorkerController};
use crate::infra::{Command, Position, TaskQuota};
use crate::mining::MineRegistry;
use crate::state::{Unit, UnitId};

/// Owns one controller per live worker, in the order the workers first appeared.
#[derive(Debug, Clone)]
pub struct FleetCoordinator {
    workers: Vec<WorkerController>,
    quota: TaskQuota,
}

impl FleetCoordinator {
    pub fn new(quota: TaskQuota) -> Self {
        Self {
            workers: Vec::new(),
            quota,
        }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn workers(&self) -> &[WorkerController] {
        &self.workers
    }

    pub fn get(&self, id: UnitId) -> Option<&WorkerController> {
        self.workers.iter().find(|worker| worker.id() == id)
    }

    pub fn quota(&self) -> TaskQuota {
        self.quota
    }

    pub fn count(&self, objective: Objective) -> usize {
        self.workers
            .iter()
            .filter(|worker| worker.objective() == objective)
            .count()
    }

    /// Sync the roster with this turn's units: drop lost workers (releasing
    /// their mines), refresh survivors and append newcomers. Objectives are
    /// reassigned whenever the roster size changes.
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn update(&mut self, units: &[Unit], registry: &mut MineRegistry) {
        let before = self.workers.len();

        let live: HashSet<UnitId> = units.iter().map(|unit| unit.id).collect();
        self.workers.retain_mut(|worker| {
            if live.contains(&worker.id()) {
                return true;
            }
            debug!("Worker {} lost", worker.id());
            worker.release_mine(registry);
            false
        });
        let survivors = self.workers.len();

        for unit in units {
            match self.workers.iter_mut().find(|worker| worker.id() == unit.id) {
                Some(worker) => worker.update(unit.clone()),
                None => {
                    debug!("Worker {} added at {}", unit.id, unit.position);
                    self.workers.push(WorkerController::new(unit.clone()));
                }
            }
        }

        if survivors != before || self.workers.len() != survivors {
            self.reassign_quotas(registry);
        }
    }

    pub fn set_quota(&mut self, quota: TaskQuota, registry: &mut MineRegistry) {
        self.quota = quota;
        self.reassign_quotas(registry);
    }

    /// Split the roster by index: the first block builds, the next gathers
    /// and the rest rest. Block sizes are ceiling-rounded.
    pub fn reassign_quotas(&mut self, registry: &mut MineRegistry) {
        let total = self.workers.len();
        let builders = ceil_share(self.quota.build, total);
        let gatherers = ceil_share(self.quota.gather, total);

        for (i, worker) in self.workers.iter_mut().enumerate() {
            let objective = if i < builders {
                Objective::BuildCity
            } else if i < builders + gatherers {
                Objective::GatherFuel
            } else {
                Objective::Rest
            };
            worker.set_objective(objective, registry);
        }

        info!(
            "Objectives reassigned for {} workers: {} build, {} gather",
            total,
            builders.min(total),
            gatherers.min(total.saturating_sub(builders))
        );
    }

    /// Run every worker's decision in roster order. A move onto a tile already
    /// claimed by an earlier worker this turn is dropped; that worker stays put.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn collect_actions(&mut self, ctx: &mut TurnContext) -> Vec<Command> {
        let mut claimed: HashSet<Position> = HashSet::new();
        let mut actions = Vec::new();

        for worker in &mut self.workers {
            let decision = worker.decide(ctx);
            if let Some(step) = decision.step
                && !claimed.insert(step)
            {
                debug!("Worker {} move onto {} suppressed", worker.id(), step);
                continue;
            }
            if let Some(command) = decision.command {
                actions.push(command);
            }
        }

        actions
    }
}

fn ceil_share(proportion: f64, total: usize) -> usize {
    (proportion * total as f64).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{BuildSitePolicy, Direction};
    use crate::state::{City, CityId, CityTile, Map};
    use crate::territory::TerritoryCoordinator;

    fn units(positions: &[(u32, i32, i32)]) -> Vec<Unit> {
        positions
            .iter()
            .map(|&(id, x, y)| Unit::new(UnitId(id), Position::new(x, y)))
            .collect()
    }

    fn objectives(fleet: &FleetCoordinator) -> Vec<Objective> {
        fleet.workers().iter().map(|w| w.objective()).collect()
    }

    #[test]
    fn test_quota_partitions_by_index_with_ceiling() {
        let map = Map::parse("...").unwrap();
        let mut registry = MineRegistry::build(&map);
        let mut fleet = FleetCoordinator::new(TaskQuota::new(0.5, 0.25, 0.25));
        fleet.update(&units(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)]), &mut registry);

        // ceil(1.5) = 2 builders, ceil(0.75) = 1 gatherer.
        assert_eq!(
            objectives(&fleet),
            vec![Objective::BuildCity, Objective::BuildCity, Objective::GatherFuel]
        );

        fleet.set_quota(TaskQuota::new(0.0, 0.4, 0.6), &mut registry);
        assert_eq!(
            objectives(&fleet),
            vec![Objective::GatherFuel, Objective::GatherFuel, Objective::Rest]
        );
        assert_eq!(fleet.count(Objective::Rest), 1);
    }

    #[test]
    fn test_roster_keeps_first_seen_order_and_releases_lost_workers() {
        let map = Map::parse("w.w").unwrap();
        let mut registry = MineRegistry::build(&map);
        let mut fleet = FleetCoordinator::new(TaskQuota::new(1.0, 0.0, 0.0));
        fleet.update(&units(&[(7, 1, 0), (3, 1, 0)]), &mut registry);

        let territory = TerritoryCoordinator::default();
        let mut ctx = TurnContext {
            map: &map,
            registry: &mut registry,
            territory: &territory,
            build_site: BuildSitePolicy::NearestEmpty,
        };
        fleet.collect_actions(&mut ctx);
        assert_eq!(registry.open_mine_count(), 0);

        fleet.update(&units(&[(3, 1, 0), (9, 1, 0)]), &mut registry);
        let ids: Vec<UnitId> = fleet.workers().iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec![UnitId(3), UnitId(9)]);
        assert_eq!(registry.open_mine_count(), 1, "lost worker's mine reopened");
    }

    #[test]
    fn test_second_move_onto_same_tile_is_suppressed() {
        let map = Map::parse(
            "
            ...
            ...
            .C.
            ",
        )
        .unwrap();
        let mut registry = MineRegistry::build(&map);
        let territory = TerritoryCoordinator::new(&[City {
            id: CityId(1),
            fuel: 0,
            tiles: vec![CityTile::new(Position::new(1, 2))],
        }]);

        // Both resting workers head home; west one steps east, north one steps south.
        let mut fleet = FleetCoordinator::new(TaskQuota::new(0.0, 0.0, 1.0));
        fleet.update(&units(&[(1, 0, 1), (2, 1, 0)]), &mut registry);

        let mut ctx = TurnContext {
            map: &map,
            registry: &mut registry,
            territory: &territory,
            build_site: BuildSitePolicy::NearestEmpty,
        };
        let actions = fleet.collect_actions(&mut ctx);
        assert_eq!(
            actions,
            vec![Command::Move {
                unit: UnitId(1),
                direction: Direction::East,
            }]
        );
        assert_eq!(
            fleet.get(UnitId(2)).unwrap().destination(),
            Some(Position::new(1, 2)),
            "suppressed worker keeps its destination"
        );
    }
}
