use rand::Rng;

use crate::{
    generators::kruskal::{Edge, spanning_tree},
    maze::{Direction, Maze},
};

/// Maps a position `d` along the Hilbert curve to `(x, y)` on a `2^n x 2^n` grid.
///
/// Iterative d2xy: at every scale `s` two bits of `d` pick a quadrant, and the
/// coordinates gathered so far are rotated/reflected into it.
pub fn hilbert_index_to_xy(n: u32, d: u32) -> (u8, u8) {
    let (mut x, mut y) = (0u32, 0u32);
    let mut t = d;
    let mut s = 1u32;
    while s < (1 << n) {
        let rx = 1 & (t >> 1);
        let ry = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t >>= 2;
        s <<= 1;
    }
    (x as u8, y as u8)
}

/// The full curve over a `2^n x 2^n` grid, `d = 0..4^n`.
pub fn generate_hilbert_order(n: u32) -> Vec<(u8, u8)> {
    (0..1u32 << (2 * n))
        .map(|d| hilbert_index_to_xy(n, d))
        .collect()
}

/// Carves one passage per cell, walking cells in Hilbert order and linking each
/// to a random neighbor that comes later on the curve.
///
/// Consecutive curve positions are always adjacent, so every cell but the last has
/// at least one later neighbor and the pass produces a spanning tree. The result is
/// still checked, and a defective maze is completed with a union-find pass.
///
/// # Panics
/// If the maze is not square with a power-of-two side.
pub fn hilbert_maze<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    if maze.is_empty() {
        return;
    }
    let side = maze.width();
    if side != maze.height() || !side.is_power_of_two() {
        panic!(
            "Hilbert generation needs a square maze with a power-of-two side, got {}x{}",
            maze.width(),
            maze.height()
        );
    }

    let order = generate_hilbert_order(side.trailing_zeros());
    let mut index_of = vec![0usize; maze.len()];
    for (k, &coord) in order.iter().enumerate() {
        index_of[maze.cell_id(coord)] = k;
    }

    maze.fill_walls();

    for (k, &coord) in order.iter().enumerate() {
        let later = [
            Direction::East,
            Direction::West,
            Direction::South,
            Direction::North,
        ]
        .into_iter()
        .filter(|&d| {
            maze.neighbor(coord, d)
                .is_some_and(|n| index_of[maze.cell_id(n)] > k)
        })
        .collect::<Vec<_>>();

        if later.is_empty() {
            continue;
        }
        let direction = later[rng.random_range(0..later.len())];
        maze.open_wall(coord, direction);
    }

    if !maze.is_perfect() {
        tracing::warn!(
            "[generate] Hilbert pass left {} passages for {} cells, completing with union-find",
            maze.edge_count(),
            maze.len()
        );
        repair(maze);
    }
}

/// Keeps the existing passages where possible and joins whatever is left disconnected.
fn repair(maze: &mut Maze) {
    let forced = maze
        .coords()
        .flat_map(|c| [Edge::east(c), Edge::south(c)])
        .filter(|e| maze.is_open(e.from, e.direction))
        .collect::<Vec<_>>();
    let candidates = super::grid_edges(maze.width(), maze.height());
    spanning_tree(maze.width(), maze.height(), &forced, &candidates).carve(maze);
}
