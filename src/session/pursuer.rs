use rand::Rng;

use crate::maze::{Direction, Maze};

/// Upper bound for the pursuer's noise awareness.
pub const MAX_NOISE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pursuer {
    pub pos: (u8, u8),
    pub facing: Direction,
    /// Steps taken per tick while charging.
    pub charge_distance: u8,
    /// Raised when the maze rearranges under the pursuer; any noise triggers a charge.
    pub noise: u8,
}

impl Pursuer {
    pub fn new(pos: (u8, u8), facing: Direction, charge_distance: u8) -> Self {
        Pursuer {
            pos,
            facing,
            charge_distance,
            noise: 0,
        }
    }
}

/// What the pursuer did during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuerMode {
    /// Charged along `facing`, `steps` cells. `spotted` is `None` when noise alone triggered it.
    Alert {
        spotted: Option<Direction>,
        steps: u8,
    },
    /// Wandered one step, or stayed put if boxed in.
    Patrol(Option<Direction>),
}

/// Casts a ray from `from` along `direction`, advancing only through open walls.
fn sees_player_in_direction(
    maze: &Maze,
    from: (u8, u8),
    direction: Direction,
    player: (u8, u8),
) -> bool {
    let mut current = from;
    while maze.is_open(current, direction) {
        let Some(next) = maze.neighbor(current, direction) else {
            break;
        };
        if next == player {
            return true;
        }
        current = next;
    }
    false
}

/// First direction, in [`Direction::ALL`] order, with an unobstructed straight view of the player.
pub fn detect_player_direction(
    maze: &Maze,
    from: (u8, u8),
    player: (u8, u8),
) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&d| sees_player_in_direction(maze, from, d, player))
}

/// Whether stepping from `from` in `direction` lands on a cell with more than one exit.
fn leads_past_dead_end(maze: &Maze, from: (u8, u8), direction: Direction) -> bool {
    maze.neighbor(from, direction)
        .is_some_and(|next| !maze[next].is_dead_end())
}

/// Advances the pursuer by one tick.
///
/// Noise from `regenerated` cells under the pursuer, or a sighting of the player,
/// puts it on alert: it charges up to `charge_distance` cells straight ahead and
/// stops on walls or on the player. Otherwise it patrols, preferring forward, left
/// or right turns that do not end in a dead end and backing up only when boxed in.
pub fn update_pursuer<R: Rng + ?Sized>(
    pursuer: &mut Pursuer,
    maze: &Maze,
    player: (u8, u8),
    regenerated: &[(u8, u8)],
    rng: &mut R,
) -> PursuerMode {
    if regenerated.contains(&pursuer.pos) {
        pursuer.noise = (pursuer.noise + 1).min(MAX_NOISE);
        tracing::debug!("[pursuer] heard the maze shift, noise {}", pursuer.noise);
    }

    let spotted = detect_player_direction(maze, pursuer.pos, player);
    if spotted.is_some() || pursuer.noise > 0 {
        if let Some(direction) = spotted {
            pursuer.facing = direction;
        }
        let mut steps = 0;
        while steps < pursuer.charge_distance && pursuer.pos != player {
            let Some(next) = maze
                .neighbor(pursuer.pos, pursuer.facing)
                .filter(|_| maze.is_open(pursuer.pos, pursuer.facing))
            else {
                break;
            };
            pursuer.pos = next;
            steps += 1;
        }
        pursuer.noise = 0;
        tracing::debug!(
            "[pursuer] charged {} {} steps to {:?} (spotted: {:?})",
            pursuer.facing,
            steps,
            pursuer.pos,
            spotted
        );
        return PursuerMode::Alert { spotted, steps };
    }

    let facing = pursuer.facing;
    let mut choices = [facing, facing.rotate_left(), facing.rotate_right()]
        .into_iter()
        .filter(|&d| maze.is_open(pursuer.pos, d))
        .filter(|&d| leads_past_dead_end(maze, pursuer.pos, d))
        .collect::<Vec<_>>();
    if choices.is_empty() && maze.is_open(pursuer.pos, facing.opposite()) {
        choices.push(facing.opposite());
    }

    if choices.is_empty() {
        tracing::debug!("[pursuer] no way out of {:?}, waiting", pursuer.pos);
        return PursuerMode::Patrol(None);
    }
    let direction = choices[rng.random_range(0..choices.len())];
    if let Some(next) = maze.neighbor(pursuer.pos, direction) {
        pursuer.pos = next;
        pursuer.facing = direction;
    }
    PursuerMode::Patrol(Some(direction))
}
