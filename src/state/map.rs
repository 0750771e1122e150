use thiserror::Error;

use crate::infra::{Bounds, Position, ResourceType};

/// Resource amount given to tiles created from ASCII maps.
const PARSED_RESOURCE_AMOUNT: i32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("expected {expected} cells for the map, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown map glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Team(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceType,
    pub amount: i32,
}

/// A territory tile standing on the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Structure {
    pub team: Team,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub resource: Option<Resource>,
    pub structure: Option<Structure>,
}

/// Number of cells for positive dimensions whose product fits an `i32`.
fn cell_count(width: i32, height: i32) -> Result<usize, MapError> {
    if width <= 0 || height <= 0 {
        return Err(MapError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .map(|count| count as usize)
        .ok_or(MapError::InvalidDimensions { width, height })
}

#[derive(Clone, Debug)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Map {
    pub fn new(width: i32, height: i32) -> Result<Self, MapError> {
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); cell_count(width, height)?],
        })
    }

    /// Build a map from row-major cells, rejecting inconsistent dimensions.
    pub fn from_cells(width: i32, height: i32, cells: Vec<Cell>) -> Result<Self, MapError> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(MapError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse an ASCII map: `.` empty, `w`/`c`/`u` wood/coal/uranium,
    /// `C` a territory tile of team 0 and `E` one of team 1.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().map_or(0, |row| row.chars().count());

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let resource = |kind| Cell {
                    resource: Some(Resource {
                        kind,
                        amount: PARSED_RESOURCE_AMOUNT,
                    }),
                    structure: None,
                };
                let structure = |team| Cell {
                    resource: None,
                    structure: Some(Structure { team: Team(team) }),
                };
                let cell = match glyph {
                    '.' => Cell::default(),
                    'w' => resource(ResourceType::Wood),
                    'c' => resource(ResourceType::Coal),
                    'u' => resource(ResourceType::Uranium),
                    'C' => structure(0),
                    'E' => structure(1),
                    _ => return Err(MapError::UnknownGlyph { glyph, x, y }),
                };
                cells.push(cell);
            }
        }

        Self::from_cells(width as i32, rows.len() as i32, cells)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.width, self.height)
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        self.bounds().contains(pos)
    }

    fn index(&self, pos: &Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn get(&self, pos: &Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: &Position) -> Option<&mut Cell> {
        self.index(pos).map(|i| &mut self.cells[i])
    }

    pub fn has_resource(&self, pos: &Position) -> bool {
        self.get(pos)
            .and_then(|cell| cell.resource)
            .is_some_and(|resource| resource.amount > 0)
    }

    pub fn resource_type(&self, pos: &Position) -> Option<ResourceType> {
        self.get(pos)
            .and_then(|cell| cell.resource)
            .filter(|resource| resource.amount > 0)
            .map(|resource| resource.kind)
    }

    pub fn has_structure(&self, pos: &Position) -> bool {
        self.get(pos).is_some_and(|cell| cell.structure.is_some())
    }

    /// On-grid, no structure and no resource.
    pub fn is_empty(&self, pos: &Position) -> bool {
        self.in_bounds(pos) && !self.has_structure(pos) && !self.has_resource(pos)
    }

    pub fn set_resource(&mut self, pos: &Position, resource: Option<Resource>) {
        if let Some(cell) = self.get_mut(pos) {
            cell.resource = resource;
        }
    }

    pub fn set_structure(&mut self, pos: &Position, structure: Option<Structure>) {
        if let Some(cell) = self.get_mut(pos) {
            cell.structure = structure;
        }
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.positions().zip(self.cells.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_resources_and_structures() {
        let map = Map::parse(
            "
            w.C
            .uE
            ",
        )
        .unwrap();

        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!(map.resource_type(&Position::new(0, 0)), Some(ResourceType::Wood));
        assert_eq!(map.resource_type(&Position::new(1, 1)), Some(ResourceType::Uranium));
        assert!(map.has_structure(&Position::new(2, 0)));
        assert!(map.has_structure(&Position::new(2, 1)));
        assert!(map.is_empty(&Position::new(1, 0)));
        assert!(!map.is_empty(&Position::new(3, 0)), "off-grid is never empty");
    }

    #[test]
    fn test_malformed_maps_are_rejected() {
        assert_eq!(
            Map::parse("..\n...").unwrap_err(),
            MapError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 3
            }
        );
        assert_eq!(
            Map::from_cells(2, 2, vec![Cell::default(); 3]).unwrap_err(),
            MapError::CellCountMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(matches!(
            Map::new(0, 4),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Map::parse(".x"),
            Err(MapError::UnknownGlyph { glyph: 'x', .. })
        ));
        assert!(Map::parse("").is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert_eq!(
            Map::new(i32::MAX, 2).unwrap_err(),
            MapError::InvalidDimensions {
                width: i32::MAX,
                height: 2
            }
        );
        assert!(matches!(
            Map::from_cells(65_536, 65_536, Vec::new()),
            Err(MapError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_exhausted_resource_is_not_reported() {
        let mut map = Map::parse("w").unwrap();
        let pos = Position::new(0, 0);
        map.set_resource(
            &pos,
            Some(Resource {
                kind: ResourceType::Wood,
                amount: 0,
            }),
        );
        assert!(!map.has_resource(&pos));
        assert_eq!(map.resource_type(&pos), None);
    }

    #[test]
    fn test_positions_are_row_major() {
        let map = Map::new(2, 2).unwrap();
        let positions: Vec<Position> = map.positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1)
            ]
        );
    }
}
