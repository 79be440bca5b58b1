pub mod cell;
mod direction;

use std::collections::VecDeque;

pub use cell::Walls;
pub use direction::Direction;

/// The maze data model: a `width x height` array of wall masks.
///
/// Every wall is stored twice, once on each side. All mutation goes through
/// [`Maze::open_wall`], which keeps both halves in sync, so the mask of a cell in
/// direction `d` always equals its neighbor's mask in `d.opposite()`.
/// Walls on the outer boundary are never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Box<[Walls]>,
    width: u8,
    height: u8,
}

impl Maze {
    /// Creates a new maze with the given width and height, all walls closed.
    pub fn new(width: u8, height: u8) -> Self {
        Maze {
            cells: vec![Walls::CLOSED; width as usize * height as usize].into_boxed_slice(),
            width,
            height,
        }
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Checks if the maze has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: (u8, u8)) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    /// Linear id of a cell, `y * width + x`.
    pub fn cell_id(&self, coord: (u8, u8)) -> usize {
        coord.1 as usize * self.width as usize + coord.0 as usize
    }

    /// Inverse of [`Maze::cell_id`].
    pub fn coord_of(&self, id: usize) -> (u8, u8) {
        let width = self.width as usize;
        ((id % width) as u8, (id / width) as u8)
    }

    /// Iterates all coordinates in linear-id order.
    pub fn coords(&self) -> impl Iterator<Item = (u8, u8)> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// The adjacent coordinate in `direction`, if it lies inside the maze.
    pub fn neighbor(&self, coord: (u8, u8), direction: Direction) -> Option<(u8, u8)> {
        let (dx, dy) = direction.delta();
        let x = coord.0.checked_add_signed(dx)?;
        let y = coord.1.checked_add_signed(dy)?;
        self.is_in_bounds((x, y)).then_some((x, y))
    }

    /// Whether the wall on the `direction` side of `coord` is open.
    /// Out-of-bounds coordinates have no open walls.
    pub fn is_open(&self, coord: (u8, u8), direction: Direction) -> bool {
        self.is_in_bounds(coord) && self[coord].is_open(direction)
    }

    /// Opens the wall between `from` and its neighbor in `direction`, on both sides.
    ///
    /// # Returns
    /// `true` if a wall was opened, `false` if it was already open
    ///
    /// # Panics
    /// * If `from` is out of bounds
    /// * If the neighbor in `direction` lies outside the maze
    pub fn open_wall(&mut self, from: (u8, u8), direction: Direction) -> bool {
        if !self.is_in_bounds(from) {
            panic!("The given coordinate is out of bounds");
        }
        let Some(to) = self.neighbor(from, direction) else {
            panic!("Cannot open a boundary wall ({:?} {})", from, direction);
        };
        if self[from].is_open(direction) {
            return false;
        }
        self[from].open(direction);
        self[to].open(direction.opposite());
        true
    }

    /// Closes every wall in the maze.
    pub fn fill_walls(&mut self) {
        self.cells.fill(Walls::CLOSED);
    }

    /// Number of open walls around `coord`.
    pub fn open_count(&self, coord: (u8, u8)) -> u8 {
        self[coord].open_count()
    }

    /// Directions in which `coord` has an open wall, in [`Direction::ALL`] order.
    pub fn open_directions(&self, coord: (u8, u8)) -> impl Iterator<Item = Direction> + use<> {
        self[coord].open_directions()
    }

    /// Number of passages, counting each open wall pair once (east and south halves only).
    pub fn edge_count(&self) -> usize {
        self.coords()
            .map(|c| {
                let walls = self[c];
                walls.is_open(Direction::East) as usize + walls.is_open(Direction::South) as usize
            })
            .sum()
    }

    /// Checks that both halves of every wall agree and the boundary is closed.
    pub fn is_symmetric(&self) -> bool {
        self.coords().all(|c| {
            Direction::ALL
                .into_iter()
                .all(|d| match self.neighbor(c, d) {
                    Some(n) => self[c].is_open(d) == self[n].is_open(d.opposite()),
                    None => !self[c].is_open(d),
                })
        })
    }

    /// Checks that every cell is reachable from (0, 0) through open walls.
    pub fn is_connected(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.len()];
        let mut queue = VecDeque::from([(0u8, 0u8)]);
        seen[0] = true;
        let mut reached = 1;
        while let Some(current) = queue.pop_front() {
            for next in self
                .open_directions(current)
                .filter_map(|d| self.neighbor(current, d))
            {
                let id = self.cell_id(next);
                if !seen[id] {
                    seen[id] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        reached == self.len()
    }

    /// A perfect maze is a spanning tree of the cell graph: symmetric walls,
    /// connected, and exactly `cells - 1` passages.
    pub fn is_perfect(&self) -> bool {
        self.is_symmetric() && self.edge_count() + 1 == self.len() && self.is_connected()
    }
}

impl std::ops::Index<(u8, u8)> for Maze {
    type Output = Walls;

    fn index(&self, index: (u8, u8)) -> &Self::Output {
        &self.cells[self.cell_id(index)]
    }
}

impl std::ops::IndexMut<(u8, u8)> for Maze {
    fn index_mut(&mut self, index: (u8, u8)) -> &mut Self::Output {
        let id = self.cell_id(index);
        &mut self.cells[id]
    }
}
