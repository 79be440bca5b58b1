use std::fmt;

/// One of the four cardinal directions.
///
/// The discriminants follow the clockwise encoding used by the AI
/// (0 = north, 1 = east, 2 = south, 3 = west), so turning is modulo-4 arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All directions in encoding order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn from_index(index: u8) -> Self {
        Direction::ALL[(index % 4) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Rotate by -90 degrees.
    pub fn rotate_left(self) -> Self {
        Direction::from_index(self.index() + 3)
    }

    /// Rotate by +90 degrees.
    pub fn rotate_right(self) -> Self {
        Direction::from_index(self.index() + 1)
    }

    pub fn opposite(self) -> Self {
        Direction::from_index(self.index() + 2)
    }

    /// Unit step `(dx, dy)` with y growing southwards.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Inverse of [`Direction::delta`]. Anything that is not a unit cardinal vector yields `None`.
    pub fn from_delta(dx: i8, dy: i8) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::East => write!(f, "east"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
        }
    }
}
