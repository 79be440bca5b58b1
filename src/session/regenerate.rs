use rand::{Rng, seq::SliceRandom};

use crate::{
    error::RegenerationError,
    generators::{Edge, SpanningTree, grid_edges, spanning_tree},
    maze::Maze,
    session::{memory::VisitMemory, visibility::VisibleSet},
};

/// Cells whose passages should survive a rebuild: visible now, or still remembered.
pub fn preserved_cells(maze: &Maze, memory: &VisitMemory, visible: &VisibleSet) -> Vec<bool> {
    maze.coords()
        .map(|c| visible.contains(c) || memory.is_remembered(c))
        .collect()
}

/// Open passages touching at least one preserved cell, each wall pair listed once.
pub fn forced_edges(maze: &Maze, preserved: &[bool]) -> Vec<Edge> {
    maze.coords()
        .flat_map(|c| [Edge::east(c), Edge::south(c)])
        .filter(|e| {
            maze.is_open(e.from, e.direction)
                && (preserved[maze.cell_id(e.from)] || preserved[maze.cell_id(e.to())])
        })
        .collect()
}

/// Rebuilds the whole maze as a fresh spanning tree that keeps the passages of
/// preserved cells and re-randomizes everything else.
///
/// Forced passages are accepted first and dropped only where they would close a
/// cycle. When `maze` is already a perfect maze its forced passages are a sub-forest,
/// so none are dropped. The rebuilt maze is validated before it is returned.
pub fn rebuild_preserving<R: Rng + ?Sized>(
    maze: &Maze,
    memory: &VisitMemory,
    visible: &VisibleSet,
    rng: &mut R,
) -> Result<Maze, RegenerationError> {
    let preserved = preserved_cells(maze, memory, visible);
    let forced = forced_edges(maze, &preserved);

    let mut candidates = grid_edges(maze.width(), maze.height());
    candidates.shuffle(rng);

    let tree = spanning_tree(maze.width(), maze.height(), &forced, &candidates);
    if tree.dropped_forced > 0 {
        tracing::debug!(
            "[regenerate] dropped {} of {} forced passages to avoid cycles",
            tree.dropped_forced,
            forced.len()
        );
    }
    carve_checked(&tree, maze.width(), maze.height())
}

/// Carves `tree` into a fresh `width x height` maze, refusing anything that is not
/// a perfect maze.
pub fn carve_checked(
    tree: &SpanningTree,
    width: u8,
    height: u8,
) -> Result<Maze, RegenerationError> {
    let mut rebuilt = Maze::new(width, height);
    if !tree.is_complete(rebuilt.len()) {
        return Err(RegenerationError::IncompleteTree {
            edges: tree.edges.len(),
            cells: rebuilt.len(),
        });
    }
    tree.carve(&mut rebuilt);
    if !rebuilt.is_perfect() {
        return Err(RegenerationError::InvariantViolation);
    }
    Ok(rebuilt)
}
