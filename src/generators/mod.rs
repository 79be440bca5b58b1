use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

mod hilbert;
mod kruskal;

pub use hilbert::{generate_hilbert_order, hilbert_index_to_xy, hilbert_maze};
pub use kruskal::{Edge, SpanningTree, UnionFind, grid_edges, randomized_kruskal, spanning_tree};

use crate::maze::Maze;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    /// One passage per cell towards a later cell along the Hilbert curve.
    #[default]
    Hilbert,
    Kruskal,
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Hilbert => write!(f, "Hilbert Curve"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
        }
    }
}

/// Carve a perfect maze into `maze` with the selected algorithm.
/// Any existing passages are discarded first.
pub fn generate_maze<R: Rng + ?Sized>(maze: &mut Maze, generator: Generator, rng: &mut R) {
    match generator {
        Generator::Hilbert => hilbert_maze(maze, rng),
        Generator::Kruskal => randomized_kruskal(maze, rng),
    }
    tracing::debug!(
        "[generate] {} carved {} passages in a {}x{} maze",
        generator,
        maze.edge_count(),
        maze.width(),
        maze.height()
    );
}
