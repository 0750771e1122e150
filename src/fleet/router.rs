use crate::infra::{Direction, Position};
use crate::state::Map;

/// Single-step routing, recomputed from scratch every turn.
pub struct MovementRouter;

impl MovementRouter {
    /// First cardinal (north, east, south, west) that strictly shortens the
    /// distance to `destination`, or `Center` when already there.
    pub fn direction_to(origin: Position, destination: Position) -> Direction {
        let mut closest = origin.distance(&destination);
        let mut best = Direction::Center;
        for direction in Direction::CARDINALS {
            let distance = origin.translate(direction).distance(&destination);
            if distance < closest {
                closest = distance;
                best = direction;
            }
        }
        best
    }

    /// Step toward `destination`. With `avoid_city` set the step never lands on a
    /// structure when a perpendicular detour or the backward step is available.
    #[tracing::instrument(level = "trace", skip(map))]
    pub fn step_toward(
        map: &Map,
        origin: Position,
        destination: Position,
        avoid_city: bool,
    ) -> Direction {
        let direct = Self::direction_to(origin, destination);
        if !avoid_city || direct == Direction::Center {
            return direct;
        }

        let is_open = |pos: &Position| map.in_bounds(pos) && !map.has_structure(pos);

        if is_open(&origin.translate(direct)) {
            return direct;
        }

        let mut detour: Option<(i32, Direction)> = None;
        for alternative in direct.perpendicular() {
            let step = origin.translate(alternative);
            if !is_open(&step) {
                continue;
            }
            let distance = step.distance(&destination);
            if detour.is_none_or(|(best, _)| distance < best) {
                detour = Some((distance, alternative));
            }
        }

        match detour {
            Some((_, direction)) => {
                tracing::trace!(?direct, ?direction, "Detouring around territory");
                direction
            }
            None => direct.opposite(),
        }
    }
}
