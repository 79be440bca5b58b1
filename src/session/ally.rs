use rand::Rng;

use crate::maze::{Direction, Maze};

/// Weight of each open wall at the destination, steering away from dead ends.
const OPENNESS_WEIGHT: f64 = 0.2;
/// Upper bound (exclusive) of the random jitter that breaks up back-and-forth loops.
const JITTER: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ally {
    pub pos: (u8, u8),
}

impl Ally {
    pub fn new(pos: (u8, u8)) -> Self {
        Ally { pos }
    }
}

/// Heuristic value of stepping onto `dest`: closer to the player and more open is better.
pub fn score_destination(maze: &Maze, dest: (u8, u8), player: (u8, u8), jitter: f64) -> f64 {
    let distance = dest.0.abs_diff(player.0) as f64 + dest.1.abs_diff(player.1) as f64;
    -distance + OPENNESS_WEIGHT * maze.open_count(dest) as f64 + jitter
}

/// Picks uniformly among the destinations tied at the highest score.
pub fn pick_best<R: Rng + ?Sized>(scored: &[((u8, u8), f64)], rng: &mut R) -> Option<(u8, u8)> {
    let mut best_score = f64::NEG_INFINITY;
    let mut best = Vec::new();
    for &(dest, score) in scored {
        if score > best_score {
            best_score = score;
            best.clear();
            best.push(dest);
        } else if score == best_score {
            best.push(dest);
        }
    }
    match best.len() {
        0 => None,
        n => Some(best[rng.random_range(0..n)]),
    }
}

/// Moves the ally one step through an open wall towards the player.
/// Returns the new position, or `None` when the ally is walled in.
pub fn update_ally<R: Rng + ?Sized>(
    ally: &mut Ally,
    maze: &Maze,
    player: (u8, u8),
    rng: &mut R,
) -> Option<(u8, u8)> {
    let scored = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ]
    .into_iter()
    .filter(|&d| maze.is_open(ally.pos, d))
    .filter_map(|d| maze.neighbor(ally.pos, d))
    .map(|dest| {
        let jitter = rng.random_range(0.0..JITTER);
        (dest, score_destination(maze, dest, player, jitter))
    })
    .collect::<Vec<_>>();

    let Some(dest) = pick_best(&scored, rng) else {
        tracing::debug!("[ally] trapped at {:?}", ally.pos);
        return None;
    };
    ally.pos = dest;
    Some(dest)
}
