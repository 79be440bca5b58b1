use std::collections::VecDeque;

use crate::maze::Maze;

/// Set of cells within sight, kept both as a membership mask over cell ids
/// and as a list sorted by cell id for deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    width: u8,
    mask: Box<[bool]>,
    cells: Vec<(u8, u8)>,
}

impl VisibleSet {
    fn empty(maze: &Maze) -> Self {
        VisibleSet {
            width: maze.width(),
            mask: vec![false; maze.len()].into_boxed_slice(),
            cells: Vec::new(),
        }
    }

    pub fn contains(&self, coord: (u8, u8)) -> bool {
        let idx = coord.1 as usize * self.width as usize + coord.0 as usize;
        coord.0 < self.width && self.mask.get(idx).copied().unwrap_or(false)
    }

    /// Visible cells in ascending cell-id order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Breadth-first search from `from` through open walls, up to `radius` steps.
///
/// Every returned cell is at most `radius` passages away from `from`, and `from`
/// itself is always included when it lies inside the maze.
pub fn compute_visible_cells(maze: &Maze, from: (u8, u8), radius: u8) -> VisibleSet {
    let mut visible = VisibleSet::empty(maze);
    if !maze.is_in_bounds(from) {
        return visible;
    }

    let mut queue = VecDeque::from([(from, 0u8)]);
    visible.mask[maze.cell_id(from)] = true;
    while let Some((current, dist)) = queue.pop_front() {
        if dist == radius {
            continue;
        }
        for next in maze
            .open_directions(current)
            .filter_map(|d| maze.neighbor(current, d))
        {
            let id = maze.cell_id(next);
            if !visible.mask[id] {
                visible.mask[id] = true;
                queue.push_back((next, dist + 1));
            }
        }
    }

    visible.cells = visible
        .mask
        .iter()
        .enumerate()
        .filter(|&(_, seen)| *seen)
        .map(|(id, _)| maze.coord_of(id))
        .collect();
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generators::{Generator, generate_maze, get_rng},
        maze::Direction,
    };

    /// Shortest passage distance from `from` to every cell, `None` if unreachable.
    fn distances(maze: &Maze, from: (u8, u8)) -> Vec<Option<usize>> {
        let mut dist = vec![None; maze.len()];
        dist[maze.cell_id(from)] = Some(0);
        let mut queue = VecDeque::from([from]);
        while let Some(c) = queue.pop_front() {
            let d = dist[maze.cell_id(c)].unwrap();
            for n in maze.open_directions(c).filter_map(|dir| maze.neighbor(c, dir)) {
                if dist[maze.cell_id(n)].is_none() {
                    dist[maze.cell_id(n)] = Some(d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    #[test]
    fn test_straight_corridor() {
        let mut maze = Maze::new(8, 1);
        (0..7).for_each(|x| {
            maze.open_wall((x, 0), Direction::East);
        });
        let visible = compute_visible_cells(&maze, (1, 0), 3);
        assert_eq!(
            visible.iter().collect::<Vec<_>>(),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]
        );
        assert!(visible.contains((4, 0)));
        assert!(!visible.contains((5, 0)));
    }

    #[test]
    fn test_closed_cell_sees_only_itself() {
        let maze = Maze::new(4, 4);
        let visible = compute_visible_cells(&maze, (2, 2), 5);
        assert_eq!(visible.len(), 1);
        assert!(visible.contains((2, 2)));
        assert!(compute_visible_cells(&maze, (9, 9), 5).is_empty());
    }

    #[test]
    fn test_visibility_matches_passage_distance() {
        for seed in 0..10 {
            let mut maze = Maze::new(16, 16);
            generate_maze(&mut maze, Generator::Hilbert, &mut get_rng(Some(seed)));
            let from = (5, 9);
            let radius = 5;
            let visible = compute_visible_cells(&maze, from, radius);
            let dist = distances(&maze, from);
            assert!(visible.contains(from));
            for c in maze.coords() {
                let within = dist[maze.cell_id(c)].is_some_and(|d| d <= radius as usize);
                assert_eq!(visible.contains(c), within, "seed {} cell {:?}", seed, c);
            }
        }
    }
}
