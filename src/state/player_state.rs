use crate::infra::{Position, ResourceType};
use crate::state::{Team, Unit};

/// Research points needed before coal can be harvested.
pub const COAL_RESEARCH_POINTS: i32 = 50;

/// Research points needed before uranium can be harvested.
pub const URANIUM_RESEARCH_POINTS: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(pub u32);

#[derive(Debug, Clone)]
pub struct CityTile {
    pub position: Position,
    pub cooldown: f32,
}

impl CityTile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            cooldown: 0.0,
        }
    }

    pub fn can_act(&self) -> bool {
        self.cooldown < 1.0
    }
}

/// A contiguous group of territory tiles.
#[derive(Debug, Clone)]
pub struct City {
    pub id: CityId,
    pub fuel: i32,
    pub tiles: Vec<CityTile>,
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub team: Team,
    pub research_points: i32,
    pub units: Vec<Unit>,
    pub cities: Vec<City>,
}

impl PlayerState {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            research_points: 0,
            units: Vec::new(),
            cities: Vec::new(),
        }
    }

    pub fn researched(&self, kind: ResourceType) -> bool {
        match kind {
            ResourceType::Wood => true,
            ResourceType::Coal => self.research_points >= COAL_RESEARCH_POINTS,
            ResourceType::Uranium => self.research_points >= URANIUM_RESEARCH_POINTS,
        }
    }

    pub fn city_tile_count(&self) -> usize {
        self.cities.iter().map(|city| city.tiles.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_unlocks_tiers_in_order() {
        let mut player = PlayerState::new(Team(0));
        assert!(player.researched(ResourceType::Wood));
        assert!(!player.researched(ResourceType::Coal));

        player.research_points = COAL_RESEARCH_POINTS;
        assert!(player.researched(ResourceType::Coal));
        assert!(!player.researched(ResourceType::Uranium));

        player.research_points = URANIUM_RESEARCH_POINTS;
        assert!(player.researched(ResourceType::Uranium));
    }
}
