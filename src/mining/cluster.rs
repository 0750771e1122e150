use std::collections::VecDeque;

use tracing::debug;

use crate::infra::{Position, ResourceType};
use crate::state::Map;

/// A maximal 4-connected group of same-type resource tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub resource_type: ResourceType,
    /// Tiles in flood-fill discovery order.
    pub tiles: Vec<Position>,
}

pub struct ResourceClusterer;

impl ResourceClusterer {
    /// Partition every resource tile of `map` into connected same-type clusters.
    #[tracing::instrument(level = "debug", skip(map), fields(width = map.width, height = map.height))]
    pub fn scan(map: &Map) -> Vec<Cluster> {
        let mut visited = vec![false; (map.width * map.height) as usize];
        let index = |pos: &Position| (pos.y * map.width + pos.x) as usize;
        let mut clusters = Vec::new();

        for start in map.positions() {
            if visited[index(&start)] {
                continue;
            }
            visited[index(&start)] = true;

            let Some(resource_type) = map.resource_type(&start) else {
                continue;
            };

            let mut tiles = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                tiles.push(current);
                for neighbor in current.neighbors() {
                    if !map.in_bounds(&neighbor) || visited[index(&neighbor)] {
                        continue;
                    }
                    // Tiles of another type stay unvisited so they can seed their own cluster.
                    if map.resource_type(&neighbor) == Some(resource_type) {
                        visited[index(&neighbor)] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            clusters.push(Cluster {
                resource_type,
                tiles,
            });
        }

        debug!("Found {} resource clusters", clusters.len());
        clusters
    }
}
