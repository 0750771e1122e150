use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn neighbors(&self) -> [Position; 4] {
        [
            self.translate(Direction::North),
            self.translate(Direction::East),
            self.translate(Direction::South),
            self.translate(Direction::West),
        ]
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }

    pub fn translate(&self, direction: Direction) -> Position {
        match direction {
            Direction::North => Position::new(self.x, self.y - 1),
            Direction::East => Position::new(self.x + 1, self.y),
            Direction::South => Position::new(self.x, self.y + 1),
            Direction::West => Position::new(self.x - 1, self.y),
            Direction::Center => *self,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Center,
}

impl Direction {
    /// Cardinal directions in the order ties are broken when stepping.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::Center => Direction::Center,
        }
    }

    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::East | Direction::West => [Direction::North, Direction::South],
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::Center => [Direction::Center, Direction::Center],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::East => "e",
            Direction::South => "s",
            Direction::West => "w",
            Direction::Center => "c",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Bounds of a `width` x `height` grid anchored at the origin.
    pub fn from_size(width: i32, height: i32) -> Self {
        Self {
            min_x: 0,
            max_x: width - 1,
            min_y: 0,
            max_y: height - 1,
        }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }
}

/// Fuel bearing resources, ordered by research tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Wood,
    Coal,
    Uranium,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [ResourceType::Wood, ResourceType::Coal, ResourceType::Uranium];
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Wood => "wood",
            ResourceType::Coal => "coal",
            ResourceType::Uranium => "uranium",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perpendicular_and_opposite_cover_all_cardinals() {
        for dir in Direction::CARDINALS {
            let [a, b] = dir.perpendicular();
            let mut seen = vec![dir, a, b, dir.opposite()];
            seen.sort_by_key(|d| d.as_str());
            seen.dedup();
            assert_eq!(seen.len(), 4, "{:?} does not span all cardinals", dir);
        }
    }

    #[test]
    fn test_bounds_from_size() {
        let bounds = Bounds::from_size(3, 2);
        assert!(bounds.contains(&Position::new(2, 1)));
        assert!(!bounds.contains(&Position::new(3, 1)));
        assert!(!bounds.contains(&Position::new(0, -1)));
    }

    #[test]
    fn test_resource_tiers_are_ordered() {
        assert!(ResourceType::Uranium > ResourceType::Coal);
        assert!(ResourceType::Coal > ResourceType::Wood);
    }
}
