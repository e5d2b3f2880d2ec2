use glam::IVec3;

/// One of the six face neighbor directions in a 3D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    South = 1,
    East = 2,
    North = 3,
    West = 4,
    Down = 5,
}

/// Vertical relation of a neighbor to the voxel being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborRole {
    Upper,
    SameLevel,
    Lower,
}

/// Liquid neighbor visit order: upper, then the four horizontals, then lower.
/// The order decides which neighbor wins ties during family resolution.
pub const LIQUID_DIRECTIONS: [Direction; 6] = [
    Direction::Up,
    Direction::South,
    Direction::East,
    Direction::North,
    Direction::West,
    Direction::Down,
];

impl Direction {
    /// Offset vector for this direction. Y-up convention: Down = (0,-1,0).
    pub fn offset(self) -> IVec3 {
        match self {
            Direction::Up => IVec3::new(0, 1, 0),
            Direction::South => IVec3::new(0, 0, 1),
            Direction::East => IVec3::new(1, 0, 0),
            Direction::North => IVec3::new(0, 0, -1),
            Direction::West => IVec3::new(-1, 0, 0),
            Direction::Down => IVec3::new(0, -1, 0),
        }
    }

    /// Role a neighbor in this direction plays for liquid propagation.
    pub fn role(self) -> NeighborRole {
        match self {
            Direction::Up => NeighborRole::Upper,
            Direction::Down => NeighborRole::Lower,
            _ => NeighborRole::SameLevel,
        }
    }
}
