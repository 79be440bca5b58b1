pub mod ally;
pub mod memory;
pub mod player;
pub mod pursuer;
pub mod regenerate;
pub mod visibility;

use rand::rngs::StdRng;

use crate::{
    error::RegenerationError,
    generators::{Generator, generate_maze},
    maze::{Direction, Maze},
};
use ally::{Ally, update_ally};
use memory::VisitMemory;
use player::{Player, move_player};
use pursuer::{Pursuer, update_pursuer};
use regenerate::rebuild_preserving;
use visibility::{VisibleSet, compute_visible_cells};

/// Tunable parameters of one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    /// The maze is `2^iters` cells on each side.
    pub iters: u8,
    pub forget_threshold: u32,
    pub visibility_radius: u8,
    pub charge_distance: u8,
    /// Whether an ally roams the maze. Without one, the player heads for a fixed goal.
    pub ally: bool,
    pub generator: Generator,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            iters: 5,
            forget_threshold: 32,
            visibility_radius: 5,
            charge_distance: 3,
            ally: true,
            generator: Generator::Hilbert,
        }
    }
}

impl Rules {
    pub fn side(&self) -> u8 {
        1 << self.iters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The player reached the ally (or the goal when playing alone).
    Won,
    /// The pursuer caught the player.
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Read-only view of a session handed to the renderer after each tick.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub maze: &'a Maze,
    pub memory: &'a VisitMemory,
    pub visible: &'a VisibleSet,
    /// Cells whose rediscovery rebuilt the maze during the last tick.
    pub regenerated: &'a [(u8, u8)],
    pub player: (u8, u8),
    pub pursuer: (u8, u8),
    pub pursuer_facing: Direction,
    pub ally: Option<(u8, u8)>,
    pub goal: (u8, u8),
    pub status: GameStatus,
    pub move_count: u32,
}

/// One game: owns the maze, the player's memory, every entity and the random source.
pub struct GameSession {
    rules: Rules,
    maze: Maze,
    memory: VisitMemory,
    visible: VisibleSet,
    regenerated: Vec<(u8, u8)>,
    player: Player,
    pursuer: Pursuer,
    ally: Option<Ally>,
    goal: (u8, u8),
    status: GameStatus,
    rng: StdRng,
}

impl GameSession {
    /// Set up a new game with:
    /// * A freshly generated perfect maze of `2^iters` cells per side.
    /// * The player in the top left corner, the pursuer in the middle facing west,
    ///   and the ally (or goal) in the bottom right corner.
    ///
    /// All randomness for the whole game is drawn from `rng`.
    pub fn new(rules: Rules, mut rng: StdRng) -> Self {
        let side = rules.side();
        let mut maze = Maze::new(side, side);
        generate_maze(&mut maze, rules.generator, &mut rng);

        let start = (0, 0);
        let corner = (side - 1, side - 1);
        let mut memory = VisitMemory::new(side, side, rules.forget_threshold);
        memory.mark_seen(start);

        let mut session = GameSession {
            rules,
            maze,
            memory,
            visible: VisibleSet::default(),
            regenerated: Vec::new(),
            player: Player::new(start),
            pursuer: Pursuer::new((side / 2, side / 2), Direction::West, rules.charge_distance),
            ally: rules.ally.then(|| Ally::new(corner)),
            goal: corner,
            status: GameStatus::InProgress,
            rng,
        };
        session.refresh_visibility();
        tracing::info!(
            "[session] new {}x{} game, forget threshold {}, ally {}",
            side,
            side,
            rules.forget_threshold,
            rules.ally
        );
        session
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn memory(&self) -> &VisitMemory {
        &self.memory
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn player(&self) -> (u8, u8) {
        self.player.pos
    }

    pub fn ally(&self) -> Option<(u8, u8)> {
        self.ally.map(|a| a.pos)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            maze: &self.maze,
            memory: &self.memory,
            visible: &self.visible,
            regenerated: &self.regenerated,
            player: self.player.pos,
            pursuer: self.pursuer.pos,
            pursuer_facing: self.pursuer.facing,
            ally: self.ally(),
            goal: self.goal,
            status: self.status,
            move_count: self.memory.move_count(),
        }
    }

    /// Advances the world by one player move.
    ///
    /// Returns `false`, leaving everything untouched, if the game is over or the move
    /// is blocked. Otherwise the player moves, then the pursuer, then the ally, then
    /// sight and memory catch up with the new positions. The outcome is decided once,
    /// after every phase has run.
    pub fn tick(&mut self, direction: Direction) -> bool {
        if self.status.is_over() {
            return false;
        }
        if !move_player(&mut self.player, &self.maze, &mut self.memory, direction) {
            tracing::debug!("[session] move {} from {:?} blocked", direction, self.player.pos);
            return false;
        }

        // Noise comes from the cells rebuilt during the previous tick
        update_pursuer(
            &mut self.pursuer,
            &self.maze,
            self.player.pos,
            &self.regenerated,
            &mut self.rng,
        );
        if let Some(ally) = self.ally.as_mut() {
            update_ally(ally, &self.maze, self.player.pos, &mut self.rng);
        }

        self.regenerated.clear();
        self.refresh_visibility();
        self.update_status();
        true
    }

    /// Moves the player by a unit step `(dx, dy)`, with y growing southwards.
    /// Anything but a unit cardinal step is rejected like a blocked move.
    pub fn move_by(&mut self, dx: i8, dy: i8) -> bool {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.tick(direction),
            None => false,
        }
    }

    /// Scans what the player can see, rebuilding the maze for every visible cell
    /// that had been forgotten, then marks the visible cells as seen.
    ///
    /// A rebuild keeps every visible passage but may open new ones next to visible
    /// cells, so the scan repeats until no rebuild happens. Each pass only looks at
    /// cells not yet seen this tick, which bounds the number of rebuilds.
    fn refresh_visibility(&mut self) {
        let radius = self.rules.visibility_radius;
        let now = self.memory.move_count();
        let mut visible = compute_visible_cells(&self.maze, self.player.pos, radius);
        loop {
            let mut rebuilt = false;
            for coord in visible.iter() {
                if self.memory.last_seen(coord) == Some(now) {
                    continue;
                }
                if self.memory.is_forgotten(coord) {
                    rebuilt |= self.regenerate(coord);
                }
                self.memory.mark_seen(coord);
            }
            if !rebuilt {
                break;
            }
            visible = compute_visible_cells(&self.maze, self.player.pos, radius);
        }
        self.visible = visible;
    }

    /// Rebuilds the maze around the player's current view, triggered by `trigger`.
    /// Returns whether a new maze was installed.
    fn regenerate(&mut self, trigger: (u8, u8)) -> bool {
        let visible =
            compute_visible_cells(&self.maze, self.player.pos, self.rules.visibility_radius);
        let rebuilt = rebuild_preserving(&self.maze, &self.memory, &visible, &mut self.rng);
        self.install_rebuild(trigger, rebuilt)
    }

    /// Installs a rebuilt maze. On a failed rebuild the current maze stays in place
    /// and `trigger` is not flagged.
    fn install_rebuild(
        &mut self,
        trigger: (u8, u8),
        rebuilt: Result<Maze, RegenerationError>,
    ) -> bool {
        match rebuilt {
            Ok(maze) => {
                self.maze = maze;
                self.regenerated.push(trigger);
                tracing::info!(
                    "[session] maze rebuilt at tick {}, triggered by {:?}",
                    self.memory.move_count(),
                    trigger
                );
                true
            }
            Err(e) => {
                tracing::error!("[session] regeneration at {:?} failed: {}", trigger, e);
                false
            }
        }
    }

    /// Checks for capture first, then for reaching the ally or goal.
    /// Returns whether the game is over.
    fn update_status(&mut self) -> bool {
        let target = self.ally().unwrap_or(self.goal);
        if self.player.pos == self.pursuer.pos {
            self.status = GameStatus::Lost;
        } else if self.player.pos == target {
            self.status = GameStatus::Won;
        }
        if self.status.is_over() {
            tracing::info!(
                "[session] game over after {} moves: {:?}",
                self.memory.move_count(),
                self.status
            );
        }
        self.status.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;

    fn rules(iters: u8) -> Rules {
        Rules {
            iters,
            forget_threshold: 4,
            ..Rules::default()
        }
    }

    /// Any legal move for the player, preferring the first open direction.
    fn some_move(session: &GameSession) -> Direction {
        session
            .maze()
            .open_directions(session.player())
            .next()
            .unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(Rules::default(), get_rng(Some(1)));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.maze.width(), 32);
        assert!(snapshot.maze.is_perfect());
        assert_eq!(snapshot.player, (0, 0));
        assert_eq!(snapshot.pursuer, (16, 16));
        assert_eq!(snapshot.pursuer_facing, Direction::West);
        assert_eq!(snapshot.ally, Some((31, 31)));
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert_eq!(snapshot.move_count, 0);
        assert!(snapshot.visible.contains((0, 0)));
        assert!(snapshot.visible.iter().all(|c| snapshot.memory.last_seen(c) == Some(0)));
    }

    #[test]
    fn test_blocked_move_is_a_no_op() {
        let mut session = GameSession::new(rules(3), get_rng(Some(2)));
        let before = session.maze().clone();
        // North and west of the corner are always outside the maze
        assert!(!session.tick(Direction::North));
        assert!(!session.tick(Direction::West));
        assert_eq!(session.player(), (0, 0));
        assert_eq!(session.memory().move_count(), 0);
        assert_eq!(session.maze(), &before);
    }

    #[test]
    fn test_invariants_hold_through_a_long_game() {
        for seed in 0..20 {
            let mut session = GameSession::new(rules(4), get_rng(Some(seed)));
            let mut rng = get_rng(Some(seed + 1000));
            for _ in 0..300 {
                if session.status().is_over() {
                    break;
                }
                let dirs = session.maze().open_directions(session.player()).collect::<Vec<_>>();
                let dir = dirs[rand::Rng::random_range(&mut rng, 0..dirs.len())];
                assert!(session.tick(dir));
                let snapshot = session.snapshot();
                assert!(snapshot.maze.is_perfect(), "seed {}", seed);
                assert!(snapshot.visible.contains(snapshot.player));
                assert!(snapshot.visible.iter().all(|c| snapshot.memory.is_remembered(c)));
            }
        }
    }

    #[test]
    fn test_forgotten_cells_trigger_regeneration() {
        let mut session = GameSession::new(rules(3), get_rng(Some(5)));
        let seen_at_start = session.snapshot().visible.iter().collect::<Vec<_>>();
        let passages = seen_at_start
            .iter()
            .flat_map(|&c| session.maze().open_directions(c).map(move |d| (c, d)))
            .collect::<Vec<_>>();

        // Let everything seen so far slip out of memory
        (0..10).for_each(|_| {
            session.memory.advance();
        });
        assert!(seen_at_start.iter().all(|&c| session.memory().is_forgotten(c)));
        session.refresh_visibility();

        // Every rediscovered cell rebuilt the maze once
        assert_eq!(session.regenerated, seen_at_start);
        assert!(session.maze().is_perfect());
        // The cells in view kept their passages
        assert!(passages.iter().all(|&(c, d)| session.maze().is_open(c, d)));
        let snapshot = session.snapshot();
        assert!(snapshot.visible.iter().all(|c| snapshot.memory.last_seen(c) == Some(10)));
    }

    #[test]
    fn test_regenerated_marker_clears_next_tick() {
        let mut session = GameSession::new(rules(3), get_rng(Some(6)));
        session.regenerated.push((3, 3));
        // Park the pursuer out of reach so the game keeps going
        session.pursuer.charge_distance = 0;
        let dir = some_move(&session);
        assert!(session.tick(dir));
        assert!(session.snapshot().regenerated.is_empty());
    }

    #[test]
    fn test_finished_game_ignores_input() {
        let mut session = GameSession::new(rules(1), get_rng(Some(3)));
        session.pursuer.pos = (1, 0);
        session.ally = Some(Ally::new((1, 0)));
        // Force a finish by standing on the pursuer
        session.player.pos = (1, 0);
        assert!(session.update_status());
        assert_eq!(session.status(), GameStatus::Lost);
        let dir = some_move(&session);
        assert!(!session.tick(dir));
    }

    #[test]
    fn test_reaching_goal_without_ally_wins() {
        let mut session = GameSession::new(
            Rules {
                iters: 1,
                ally: false,
                ..Rules::default()
            },
            get_rng(Some(4)),
        );
        assert_eq!(session.ally(), None);
        // Park the pursuer where it cannot interfere
        session.pursuer.pos = (0, 0);
        session.pursuer.charge_distance = 0;
        session.player.pos = (1, 0);
        if session.maze().is_open((1, 0), Direction::South) {
            assert!(session.tick(Direction::South));
            assert_eq!(session.status(), GameStatus::Won);
        } else {
            assert!(!session.tick(Direction::South));
            assert_eq!(session.status(), GameStatus::InProgress);
        }
    }

    #[test]
    fn test_capture_beats_reaching_the_ally() {
        let mut session = GameSession::new(rules(2), get_rng(Some(7)));
        // Open corridor along the top row, with every column hanging off it
        let mut maze = Maze::new(4, 4);
        for x in 0..3 {
            maze.open_wall((x, 0), Direction::East);
        }
        for x in 0..4 {
            for y in 0..3 {
                maze.open_wall((x, y), Direction::South);
            }
        }
        assert!(maze.is_perfect());
        session.maze = maze;
        session.ally = Some(Ally::new((1, 0)));
        session.pursuer = Pursuer::new((3, 0), Direction::West, 3);

        // The player steps onto the ally, but the pursuer charges down the corridor
        assert!(session.tick(Direction::East));
        assert_eq!(session.player(), (1, 0));
        assert_eq!(session.snapshot().pursuer, (1, 0));
        assert_eq!(session.status(), GameStatus::Lost);
    }

    #[test]
    fn test_failed_rebuild_keeps_the_maze() {
        let mut session = GameSession::new(rules(3), get_rng(Some(8)));
        let before = session.maze().clone();
        assert!(!session.install_rebuild((2, 2), Err(RegenerationError::InvariantViolation)));
        assert!(!session.install_rebuild(
            (2, 2),
            Err(RegenerationError::IncompleteTree { edges: 3, cells: 64 })
        ));
        assert_eq!(session.maze(), &before);
        assert!(session.snapshot().regenerated.is_empty());
    }

    #[test]
    fn test_move_by_unit_steps_only() {
        let mut session = GameSession::new(rules(3), get_rng(Some(9)));
        session.pursuer.charge_distance = 0;
        assert!(!session.move_by(1, 1));
        assert!(!session.move_by(0, 0));
        assert!(!session.move_by(-1, 0));
        assert_eq!(session.memory().move_count(), 0);

        let (dx, dy) = some_move(&session).delta();
        let target = (session.player().0 as i8 + dx, session.player().1 as i8 + dy);
        assert!(session.move_by(dx, dy));
        assert_eq!(session.player(), (target.0 as u8, target.1 as u8));
        assert_eq!(session.memory().move_count(), 1);
    }
}
