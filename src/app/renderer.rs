use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    app::tile::{Brightness, Tile, TileGrid},
    maze::Direction,
    session::{GameStatus, Snapshot},
};

/// Size of the terminal picture for a `width x height` maze.
pub fn picture_size(width: u8, height: u8) -> (u16, u16) {
    (width as u16 * 2 + 1, height as u16 * 2 + 1)
}

/// How bright the player's knowledge of `cell` is, `None` if nothing is known.
fn cell_brightness(snapshot: &Snapshot<'_>, cell: (u8, u8)) -> Option<Brightness> {
    if snapshot.visible.contains(cell) {
        return Some(Brightness::MAX);
    }
    snapshot.memory.fade(cell).map(Tile::brightness)
}

/// Maze cell on one side of a picture line: `coord` is the picture coordinate along
/// one axis, and the cell before (`before = true`) or after it is returned if in range.
fn adjacent_index(coord: u16, before: bool, len: u8) -> Option<u8> {
    let index = if before {
        (coord / 2).checked_sub(1)?
    } else {
        coord / 2
    };
    (index < len as u16).then_some(index as u8)
}

/// Fills `picture` with the tiles of `snapshot`: known cells and the walls around
/// them, unknown space, and the entities on top.
pub fn compose(snapshot: &Snapshot<'_>, picture: &mut TileGrid) {
    let maze = snapshot.maze;
    let (width, height) = (maze.width(), maze.height());

    for py in 0..picture.height() {
        for px in 0..picture.width() {
            let xs = [adjacent_index(px, true, width), adjacent_index(px, false, width)];
            let ys = [adjacent_index(py, true, height), adjacent_index(py, false, height)];

            let tile = match (px % 2, py % 2) {
                // Maze cell
                (1, 1) => {
                    let cell = ((px / 2) as u8, (py / 2) as u8);
                    match cell_brightness(snapshot, cell) {
                        Some(_) if snapshot.regenerated.contains(&cell) => Tile::Regenerated,
                        Some(b) => Tile::Floor(b),
                        None => Tile::Unknown,
                    }
                }
                // Wall between two cells of the same row
                (0, 1) => {
                    let y = (py / 2) as u8;
                    wall_tile(snapshot, xs[0].map(|x| (x, y)), xs[1].map(|x| (x, y)), Direction::East)
                }
                // Wall between two cells of the same column
                (1, 0) => {
                    let x = (px / 2) as u8;
                    wall_tile(snapshot, ys[0].map(|y| (x, y)), ys[1].map(|y| (x, y)), Direction::South)
                }
                // Wall corner, lit by the brightest of the up to four cells around it
                _ => xs
                    .iter()
                    .flatten()
                    .flat_map(|&x| ys.iter().flatten().map(move |&y| (x, y)))
                    .filter_map(|c| cell_brightness(snapshot, c))
                    .max()
                    .map_or(Tile::Unknown, Tile::Wall),
            };
            picture.set((px, py), tile);
        }
    }

    let entities = [
        snapshot.ally.is_none().then_some((snapshot.goal, Tile::Goal)),
        snapshot.ally.map(|pos| (pos, Tile::Ally)),
        Some((snapshot.pursuer, Tile::Pursuer)),
        Some((snapshot.player, Tile::Player)),
    ];
    for (pos, tile) in entities.into_iter().flatten() {
        picture.set((pos.0 as u16 * 2 + 1, pos.1 as u16 * 2 + 1), tile);
    }
}

/// Tile for the wall between `before` and `after`, where `after` lies in `direction`
/// from `before`. Either side may be outside the maze.
fn wall_tile(
    snapshot: &Snapshot<'_>,
    before: Option<(u8, u8)>,
    after: Option<(u8, u8)>,
    direction: Direction,
) -> Tile {
    let brightness = [before, after]
        .into_iter()
        .flatten()
        .filter_map(|c| cell_brightness(snapshot, c))
        .max();
    match (brightness, before) {
        (None, _) => Tile::Unknown,
        (Some(b), Some(cell)) if after.is_some() && snapshot.maze.is_open(cell, direction) => {
            Tile::Floor(b)
        }
        (Some(b), _) => Tile::Wall(b),
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Last picture drawn, `None` until the first draw or after a reset
    picture: Option<TileGrid>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            picture: None,
        }
    }

    /// Forget the last picture so the next draw repaints everything.
    pub fn reset(&mut self) -> std::io::Result<()> {
        self.picture = None;
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        self.stdout.flush()
    }

    /// Check if terminal size is sufficient for a picture of the given dimensions.
    /// If not, display a message and return Ok(false).
    pub fn check_size(&mut self, width: u16, height: u16) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        if term_width < width * Tile::TILE_WIDTH || term_height < height + 1 {
            let msg = format!(
                "Terminal size is too small ({}x{}) for the maze ({}x{}) to display. Please resize the terminal.\r\n",
                term_width,
                term_height,
                width * Tile::TILE_WIDTH,
                height + 1
            );
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
                style::PrintStyledContent(
                    "Press Esc to exit...\r\n"
                        .with(Color::Blue)
                        .attribute(Attribute::Bold)
                )
            )?;
            self.stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Draw the snapshot, writing only the tiles that changed since the previous draw,
    /// followed by the status line.
    pub fn draw(&mut self, snapshot: &Snapshot<'_>) -> std::io::Result<()> {
        let (width, height) = picture_size(snapshot.maze.width(), snapshot.maze.height());
        if self
            .picture
            .as_ref()
            .is_none_or(|p| p.width() != width || p.height() != height)
        {
            self.picture = Some(TileGrid::new(width, height, Tile::Unknown));
        }
        let Some(picture) = self.picture.as_mut() else {
            return Ok(());
        };
        compose(snapshot, picture);

        for (x, y) in picture.take_changes() {
            queue!(
                self.stdout,
                cursor::MoveTo(x * Tile::TILE_WIDTH, y),
                style::Print(picture[(x, y)])
            )?;
        }

        let status = status_line(snapshot);
        self.log(height, Some(status))
    }

    /// Write `msg` on the line below the picture, cut to the terminal width.
    /// `None` just clears the line.
    pub fn log(&mut self, row: u16, msg: Option<StyledContent<String>>) -> std::io::Result<()> {
        let (term_width, _) = terminal::size().unwrap_or((u16::MAX, 0));
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        if let Some(msg) = msg {
            let (text, _) = msg.content().unicode_truncate(term_width as usize);
            let truncated = StyledContent::new(*msg.style(), text.to_string());
            self.stdout.queue(style::PrintStyledContent(truncated))?;
        }
        self.stdout.flush()
    }
}

fn status_line(snapshot: &Snapshot<'_>) -> StyledContent<String> {
    let target = if snapshot.ally.is_some() {
        "Find your ally"
    } else {
        "Reach the goal"
    };
    match snapshot.status {
        GameStatus::InProgress => format!(
            "Moves: {}  {} before the pursuer finds you. Esc: quit",
            snapshot.move_count, target
        )
        .with(Color::Cyan),
        GameStatus::Won => format!(
            "You made it in {} moves! Enter: play again, Esc: quit",
            snapshot.move_count
        )
        .with(Color::Green)
        .attribute(Attribute::Bold),
        GameStatus::Lost => format!(
            "Caught by the pursuer after {} moves. Enter: play again, Esc: quit",
            snapshot.move_count
        )
        .with(Color::Red)
        .attribute(Attribute::Bold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generators::get_rng,
        session::{GameSession, Rules},
    };

    fn picture_of(snapshot: &Snapshot<'_>) -> TileGrid {
        let (w, h) = picture_size(snapshot.maze.width(), snapshot.maze.height());
        let mut picture = TileGrid::new(w, h, Tile::Unknown);
        compose(snapshot, &mut picture);
        picture
    }

    #[test]
    fn test_adjacent_index() {
        assert_eq!(adjacent_index(0, true, 4), None);
        assert_eq!(adjacent_index(0, false, 4), Some(0));
        assert_eq!(adjacent_index(4, true, 4), Some(1));
        assert_eq!(adjacent_index(8, false, 4), None);
        assert_eq!(adjacent_index(8, true, 4), Some(3));
    }

    #[test]
    fn test_compose_start_of_game() {
        let session = GameSession::new(
            Rules {
                iters: 3,
                ..Rules::default()
            },
            get_rng(Some(8)),
        );
        let snapshot = session.snapshot();
        let picture = picture_of(&snapshot);
        assert_eq!((picture.width(), picture.height()), (17, 17));
        assert_eq!(picture[(1, 1)], Tile::Player);
        assert_eq!(picture[(15, 15)], Tile::Ally);
        assert_eq!(picture[(9, 9)], Tile::Pursuer);
        // The outer corner next to the player is a lit wall
        assert_eq!(picture[(0, 0)], Tile::Wall(Brightness::MAX));

        for c in snapshot.maze.coords() {
            let p = (c.0 as u16 * 2 + 1, c.1 as u16 * 2 + 1);
            if [snapshot.player, snapshot.pursuer, (7, 7)].contains(&c) {
                continue;
            }
            let expected = if snapshot.visible.contains(c) {
                Tile::Floor(Brightness::MAX)
            } else {
                Tile::Unknown
            };
            assert_eq!(picture[p], expected, "cell {:?}", c);
        }
    }

    #[test]
    fn test_open_walls_render_as_floor() {
        let session = GameSession::new(
            Rules {
                iters: 2,
                visibility_radius: 20,
                ..Rules::default()
            },
            get_rng(Some(9)),
        );
        let snapshot = session.snapshot();
        // Every path in a 4x4 maze is shorter than the radius
        assert_eq!(snapshot.visible.len(), 16);
        let picture = picture_of(&snapshot);
        for c in snapshot.maze.coords() {
            let east = (c.0 as u16 * 2 + 2, c.1 as u16 * 2 + 1);
            let expected = if snapshot.maze.is_open(c, Direction::East) {
                Tile::Floor(Brightness::MAX)
            } else {
                Tile::Wall(Brightness::MAX)
            };
            assert_eq!(picture[east], expected, "east of {:?}", c);
        }
    }
}
