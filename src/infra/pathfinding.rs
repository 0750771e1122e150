use std::collections::{HashSet, VecDeque};

use crate::infra::Position;
use crate::state::Map;

pub struct Bfs;

impl Bfs {
    /// Breadth-first search over on-grid 4-neighbours, returning the first
    /// position (the start included) that satisfies `accept`.
    #[tracing::instrument(level = "trace", skip(map, accept), fields(start_x = start.x, start_y = start.y))]
    pub fn find_nearest<F>(map: &Map, start: Position, accept: F) -> Option<Position>
    where
        F: Fn(&Position) -> bool,
    {
        if !map.in_bounds(&start) {
            return None;
        }

        let mut queue = VecDeque::from([start]);
        let mut visited: HashSet<Position> = HashSet::from([start]);

        while let Some(current) = queue.pop_front() {
            if accept(&current) {
                tracing::trace!(visited = visited.len(), "Match found");
                return Some(current);
            }

            for neighbor in current.neighbors() {
                if map.in_bounds(&neighbor) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Nearest on-grid tile with neither a structure nor a resource.
    pub fn find_nearest_empty(map: &Map, start: Position) -> Option<Position> {
        Self::find_nearest(map, start, |pos| map.is_empty(pos))
    }
}
