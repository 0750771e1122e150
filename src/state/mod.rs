mod map;
mod player_state;
mod unit;
mod world_state;

pub use map::{Cell, Map, MapError, Resource, Structure, Team};
pub use player_state::{
    City, CityId, CityTile, PlayerState, COAL_RESEARCH_POINTS, URANIUM_RESEARCH_POINTS,
};
pub use unit::{Cargo, Unit, UnitId, CITY_BUILD_COST, WORKER_CARGO_CAPACITY};
pub use world_state::WorldState;
