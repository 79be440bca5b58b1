use std::fmt;

use crate::maze::Direction;

/// Open/closed state of the four walls around a cell, packed as a 4-bit mask.
///
/// A set bit means the wall in that direction is open (passable).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls(u8);

impl Walls {
    /// All four walls closed.
    pub const CLOSED: Walls = Walls(0);

    fn bit(direction: Direction) -> u8 {
        1 << direction.index()
    }

    pub fn is_open(self, direction: Direction) -> bool {
        self.0 & Walls::bit(direction) != 0
    }

    pub fn open(&mut self, direction: Direction) {
        self.0 |= Walls::bit(direction);
    }

    /// Number of open walls.
    pub fn open_count(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// A dead end has at most one way in or out.
    pub fn is_dead_end(self) -> bool {
        self.open_count() <= 1
    }

    /// Open directions, in [`Direction::ALL`] order.
    pub fn open_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.is_open(d))
    }
}

impl fmt::Display for Walls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |d: Direction, c: char| if self.is_open(d) { c } else { '.' };
        write!(
            f,
            "{}{}{}{}",
            flag(Direction::North, 'N'),
            flag(Direction::East, 'E'),
            flag(Direction::South, 'S'),
            flag(Direction::West, 'W'),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_walls() {
        let mut walls = Walls::CLOSED;
        assert!(walls.is_dead_end());
        walls.open(Direction::South);
        assert!(walls.is_dead_end());
        assert_eq!(walls.to_string(), "..S.");
        walls.open(Direction::East);
        walls.open(Direction::East);
        assert!(walls.is_open(Direction::East));
        assert!(!walls.is_open(Direction::West));
        assert_eq!(walls.open_count(), 2);
        assert!(!walls.is_dead_end());
        assert_eq!(
            walls.open_directions().collect::<Vec<_>>(),
            vec![Direction::East, Direction::South]
        );
        assert_eq!(walls.to_string(), ".ES.");
    }
}
