use crate::{
    maze::{Direction, Maze},
    session::memory::VisitMemory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub pos: (u8, u8),
}

impl Player {
    pub fn new(pos: (u8, u8)) -> Self {
        Player { pos }
    }
}

/// Attempt to move the player one cell in `direction`.
///
/// Rejected when the destination is outside the maze or the wall in between is
/// closed; nothing changes in that case. On success the tick advances and the
/// destination is recorded as seen at the new tick.
pub fn move_player(
    player: &mut Player,
    maze: &Maze,
    memory: &mut VisitMemory,
    direction: Direction,
) -> bool {
    let Some(new_pos) = maze.neighbor(player.pos, direction) else {
        return false;
    };
    if !maze.is_open(player.pos, direction) {
        return false;
    }
    player.pos = new_pos;
    memory.advance();
    memory.mark_seen(new_pos);
    tracing::debug!("[player] moved {} to {:?}", direction, new_pos);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Maze {
        // (0,0) - (1,0) - (2,0), with (0,1) (1,1) (2,1) hanging below (2,0)
        let mut maze = Maze::new(3, 2);
        maze.open_wall((0, 0), Direction::East);
        maze.open_wall((1, 0), Direction::East);
        maze.open_wall((2, 0), Direction::South);
        maze.open_wall((2, 1), Direction::West);
        maze.open_wall((1, 1), Direction::West);
        maze
    }

    #[test]
    fn test_rejected_moves_change_nothing() {
        let maze = corridor();
        let mut memory = VisitMemory::new(3, 2, 8);
        let mut player = Player::new((0, 0));
        memory.mark_seen((0, 0));

        // Out of bounds
        assert!(!move_player(&mut player, &maze, &mut memory, Direction::North));
        assert!(!move_player(&mut player, &maze, &mut memory, Direction::West));
        // Closed wall
        assert!(!move_player(&mut player, &maze, &mut memory, Direction::South));

        assert_eq!(player.pos, (0, 0));
        assert_eq!(memory.move_count(), 0);
        assert_eq!(memory.last_seen((0, 1)), None);
    }

    #[test]
    fn test_successful_move_marks_destination() {
        let maze = corridor();
        let mut memory = VisitMemory::new(3, 2, 8);
        let mut player = Player::new((0, 0));
        memory.mark_seen((0, 0));

        assert!(move_player(&mut player, &maze, &mut memory, Direction::East));
        assert_eq!(player.pos, (1, 0));
        assert_eq!(memory.move_count(), 1);
        assert_eq!(memory.last_seen((1, 0)), Some(1));
        // Only the destination is touched
        assert_eq!(memory.last_seen((0, 0)), Some(0));
        assert_eq!(memory.last_seen((2, 0)), None);
    }
}
