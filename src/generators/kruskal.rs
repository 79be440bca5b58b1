use crate::maze::{Direction, Maze};
use rand::{Rng, seq::SliceRandom};

/// Disjoint-set forest over cell ids, with union by rank and path halving.
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Point every other node on the path to its grandparent
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `x` and `y`. Returns `false` if they were already joined.
    pub fn unite(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false; // Already in same set
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        true
    }
}

/// Passage between a cell and its east or south neighbor.
/// Only those two directions are used so every wall pair has exactly one `Edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: (u8, u8),
    pub direction: Direction,
}

impl Edge {
    pub fn east(from: (u8, u8)) -> Self {
        Edge {
            from,
            direction: Direction::East,
        }
    }

    pub fn south(from: (u8, u8)) -> Self {
        Edge {
            from,
            direction: Direction::South,
        }
    }

    /// The other endpoint.
    pub fn to(&self) -> (u8, u8) {
        match self.direction {
            Direction::East => (self.from.0 + 1, self.from.1),
            _ => (self.from.0, self.from.1 + 1),
        }
    }
}

/// Every wall between two adjacent cells of a `width x height` maze, row by row.
pub fn grid_edges(width: u8, height: u8) -> Vec<Edge> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            [
                (x + 1 < width).then(|| Edge::east((x, y))),
                (y + 1 < height).then(|| Edge::south((x, y))),
            ]
        })
        .flatten()
        .collect()
}

/// Result of a union-find pass.
#[derive(Debug)]
pub struct SpanningTree {
    /// Accepted edges, forced ones first.
    pub edges: Vec<Edge>,
    /// Forced edges skipped because their endpoints were already joined.
    pub dropped_forced: usize,
}

impl SpanningTree {
    /// Whether the accepted edges connect every one of `cell_count` cells.
    pub fn is_complete(&self, cell_count: usize) -> bool {
        self.edges.len() + 1 == cell_count
    }

    /// Closes every wall of `maze`, then opens exactly the accepted edges.
    pub fn carve(&self, maze: &mut Maze) {
        maze.fill_walls();
        for edge in &self.edges {
            maze.open_wall(edge.from, edge.direction);
        }
    }
}

/// Kruskal-style pass: accept `forced` edges first, then `candidates` in the given order,
/// skipping any edge whose endpoints are already connected. Stops once the tree spans
/// all `width * height` cells or the candidates run out.
pub fn spanning_tree(width: u8, height: u8, forced: &[Edge], candidates: &[Edge]) -> SpanningTree {
    let total_cells = width as usize * height as usize;
    let id = |c: (u8, u8)| c.1 as usize * width as usize + c.0 as usize;
    let mut uf = UnionFind::new(total_cells);
    let mut edges = Vec::with_capacity(total_cells.saturating_sub(1));
    let mut dropped_forced = 0;

    for edge in forced {
        if uf.unite(id(edge.from), id(edge.to())) {
            edges.push(*edge);
        } else {
            dropped_forced += 1;
        }
    }

    for edge in candidates {
        if edges.len() + 1 >= total_cells {
            break;
        }
        if uf.unite(id(edge.from), id(edge.to())) {
            edges.push(*edge);
        }
    }

    SpanningTree {
        edges,
        dropped_forced,
    }
}

pub fn randomized_kruskal<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    if maze.is_empty() {
        return;
    }

    // Collect all possible edges (walls between adjacent cells) and shuffle them
    let mut edges = grid_edges(maze.width(), maze.height());
    edges.shuffle(rng);

    spanning_tree(maze.width(), maze.height(), &[], &edges).carve(maze);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(6);
        assert!(uf.unite(0, 1));
        assert!(uf.unite(2, 3));
        assert!(uf.unite(1, 3));
        assert!(!uf.unite(0, 2));
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(0), uf.find(4));
    }

    #[test]
    fn test_union_find_long_chain() {
        // A long chain must not blow the stack
        let size = 100_000;
        let mut uf = UnionFind::new(size);
        for i in 1..size {
            uf.unite(i - 1, i);
        }
        assert_eq!(uf.find(0), uf.find(size - 1));
    }

    #[test]
    fn test_grid_edges() {
        let edges = grid_edges(3, 2);
        // 2 horizontal pairs per row * 2 rows + 3 vertical pairs
        assert_eq!(edges.len(), 7);
        assert!(edges.iter().all(|e| e.to().0 < 3 && e.to().1 < 2));
    }

    #[test]
    fn test_forced_cycle_is_dropped() {
        let forced = [
            Edge::east((0, 0)),
            Edge::south((1, 0)),
            Edge::east((0, 1)),
            Edge::south((0, 0)),
        ];
        let tree = spanning_tree(2, 2, &forced, &grid_edges(2, 2));
        assert_eq!(tree.dropped_forced, 1);
        assert!(tree.is_complete(4));
        assert_eq!(&tree.edges[..], &forced[..3]);
    }

    #[test]
    fn test_randomized_kruskal() {
        let mut maze = Maze::new(9, 5);
        randomized_kruskal(&mut maze, &mut get_rng(Some(7)));
        assert!(maze.is_perfect());
    }
}
