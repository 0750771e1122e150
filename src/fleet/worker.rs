use tracing::debug;

use crate::fleet::MovementRouter;
use crate::infra::{Bfs, BuildSitePolicy, Command, Direction, Position, ResourceType};
use crate::mining::{MineId, MineRegistry};
use crate::state::{Map, Unit, UnitId};
use crate::territory::TerritoryCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Objective {
    BuildCity,
    GatherFuel,
    Rest,
}

/// Shared state a worker reads and mutates while deciding its turn.
pub struct TurnContext<'a> {
    pub map: &'a Map,
    pub registry: &'a mut MineRegistry,
    pub territory: &'a TerritoryCoordinator,
    pub build_site: BuildSitePolicy,
}

/// What a worker wants to do this turn. `step` is the tile a move lands on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decision {
    pub command: Option<Command>,
    pub step: Option<Position>,
}

impl Decision {
    fn idle() -> Self {
        Self::default()
    }
}

/// Per-unit objective state machine.
///
/// The mine is referenced by id only; the registry stays the owner and the
/// membership is re-validated every turn before it is used.
#[derive(Debug, Clone)]
pub struct WorkerController {
    unit: Unit,
    objective: Objective,
    mine: Option<MineId>,
    destination: Option<Position>,
}

impl WorkerController {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            objective: Objective::BuildCity,
            mine: None,
            destination: None,
        }
    }

    pub fn id(&self) -> UnitId {
        self.unit.id
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn mine(&self) -> Option<MineId> {
        self.mine
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    /// Refresh the unit snapshot for a new turn.
    pub fn update(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Switch objective, releasing the mine and clearing the destination.
    pub fn set_objective(&mut self, objective: Objective, registry: &mut MineRegistry) {
        if self.objective == objective {
            return;
        }
        debug!(
            "Worker {} objective {:?} -> {:?}",
            self.unit.id, self.objective, objective
        );
        self.release_mine(registry);
        self.destination = None;
        self.objective = objective;
    }

    pub fn release_mine(&mut self, registry: &mut MineRegistry) {
        if let Some(id) = self.mine.take() {
            registry.release_slot(id, self.unit.id);
        }
    }

    /// Parked on own territory with nothing to do.
    pub fn is_resting(&self, territory: &TerritoryCoordinator) -> bool {
        self.objective == Objective::Rest && territory.contains(&self.unit.position)
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(unit = %self.unit.id, objective = ?self.objective))]
    pub fn decide(&mut self, ctx: &mut TurnContext) -> Decision {
        self.check_mining_spot(ctx);

        if !self.unit.can_act() {
            return Decision::idle();
        }

        self.check_fuel_upgrade(ctx);
        self.assign_mine(ctx);
        self.check_arrival();

        if self.destination.is_none()
            && self.objective == Objective::BuildCity
            && self.unit.can_build(ctx.map)
        {
            debug!("Worker {} building city at {}", self.unit.id, self.unit.position);
            return Decision {
                command: Some(Command::BuildCity { unit: self.unit.id }),
                step: None,
            };
        }

        if self.destination.is_none() {
            self.assign_destination(ctx);
        }

        self.movement(ctx.map)
    }

    /// Drop stale mine references and report a depleted tile we are standing on.
    fn check_mining_spot(&mut self, ctx: &mut TurnContext) {
        let Some(id) = self.mine else {
            return;
        };

        let live = ctx
            .registry
            .get(id)
            .is_some_and(|mine| !mine.is_depleted() && mine.is_member(self.unit.id));
        if !live {
            debug!("Worker {} lost its place in mine {:?}", self.unit.id, id);
            self.mine = None;
            self.destination = None;
            return;
        }

        let position = self.unit.position;
        if ctx.registry.slot_of(id, self.unit.id) == Some(position) && !ctx.map.has_resource(&position) {
            ctx.registry.report_depleted(position, self.unit.id);
            self.mine = None;
        }
    }

    fn check_fuel_upgrade(&mut self, ctx: &mut TurnContext) {
        if self.objective != Objective::GatherFuel {
            return;
        }
        let preferred = ctx.registry.preferred_resource_type();
        let Some(current) = self
            .mine
            .and_then(|id| ctx.registry.get(id))
            .map(|mine| mine.resource_type)
        else {
            return;
        };

        if current < preferred {
            debug!(
                "Worker {} switching fuel from {} to {}",
                self.unit.id, current, preferred
            );
            self.release_mine(ctx.registry);
            self.destination = None;
            self.mine = ctx
                .registry
                .place(self.unit.id, self.unit.position, preferred);
        }
    }

    fn assign_mine(&mut self, ctx: &mut TurnContext) {
        if self.destination.is_some() || self.mine.is_some() {
            return;
        }
        let resource_type = match self.objective {
            Objective::BuildCity => ResourceType::Wood,
            Objective::GatherFuel => ctx.registry.preferred_resource_type(),
            Objective::Rest => return,
        };

        self.mine = ctx
            .registry
            .place(self.unit.id, self.unit.position, resource_type);
        if self.mine.is_none() {
            debug!(
                "Unable to place worker {} in a {} mine",
                self.unit.id, resource_type
            );
        }
    }

    fn check_arrival(&mut self) {
        if self.destination == Some(self.unit.position) {
            debug!("Worker {} arrived at {}", self.unit.id, self.unit.position);
            self.destination = None;
        }
    }

    fn assign_destination(&mut self, ctx: &mut TurnContext) {
        let position = self.unit.position;

        if self.objective == Objective::Rest {
            if !ctx.territory.contains(&position) {
                self.destination = ctx.territory.nearest_tile(&position);
            }
            return;
        }

        if self.unit.is_cargo_full() {
            self.release_mine(ctx.registry);
            self.destination = match self.objective {
                Objective::GatherFuel => ctx.territory.nearest_tile(&position),
                _ => self.build_site(ctx),
            };
            debug!(
                "Worker {} is at max cargo, heading to {:?}",
                self.unit.id, self.destination
            );
            return;
        }

        let Some(id) = self.mine else {
            return;
        };
        match ctx.registry.acquire_slot(id, self.unit.id, position) {
            Some(spot) if spot != position => self.destination = Some(spot),
            Some(_) => {}
            None => {
                // The mine shrank after we joined; leave it so the next turn places us again.
                debug!("Worker {} found no free tile in mine {:?}", self.unit.id, id);
                self.release_mine(ctx.registry);
            }
        }
    }

    fn build_site(&self, ctx: &TurnContext) -> Option<Position> {
        let position = self.unit.position;
        let periphery = match ctx.build_site {
            BuildSitePolicy::Periphery => ctx
                .territory
                .nearest_buildable_periphery(ctx.map, &position),
            BuildSitePolicy::NearestEmpty => None,
        };
        periphery.or_else(|| Bfs::find_nearest_empty(ctx.map, position))
    }

    fn movement(&mut self, map: &Map) -> Decision {
        let Some(destination) = self.destination else {
            return Decision::idle();
        };

        let avoid_city = self.objective == Objective::BuildCity && self.unit.is_cargo_full();
        let direction = MovementRouter::step_toward(map, self.unit.position, destination, avoid_city);
        if direction == Direction::Center {
            self.destination = None;
            return Decision::idle();
        }

        Decision {
            command: Some(Command::Move {
                unit: self.unit.id,
                direction,
            }),
            step: Some(self.unit.position.translate(direction)),
        }
    }
}
