use crossterm::style::{Color, Stylize};

use std::fmt;

/// How well the player knows a spot: 255 for in sight, fading towards 0 as the memory ages.
pub type Brightness = u8;

/// One character cell pair of the terminal picture of the maze.
///
/// The picture is a `(2w + 1) x (2h + 1)` grid: maze cells sit at odd coordinates,
/// the walls between them at mixed ones and wall corners at even ones.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum Tile {
    /// Never seen, or forgotten.
    #[default]
    Unknown,
    Wall(Brightness),
    Floor(Brightness),
    /// A cell whose rediscovery rebuilt the maze this tick.
    Regenerated,
    Player,
    Pursuer,
    Ally,
    Goal,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const TILE_WIDTH: u16 = 2;

    /// Brightness of a memory whose fade factor is `fade` (1.0 = seen this tick).
    /// Faded memories never drop below a dim floor so they stay distinguishable
    /// from unknown space.
    pub fn brightness(fade: f32) -> Brightness {
        (64.0 + fade.clamp(0.0, 1.0) * 191.0) as Brightness
    }
}

/// Scales an RGB color by `brightness / 255`.
fn shade(rgb: (u8, u8, u8), brightness: Brightness) -> Color {
    let scale = |c: u8| (c as u16 * brightness as u16 / 255) as u8;
    Color::Rgb {
        r: scale(rgb.0),
        g: scale(rgb.1),
        b: scale(rgb.2),
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Unknown => "░░".with(Color::DarkGrey),
            Tile::Wall(b) => "██".with(shade((230, 230, 230), *b)),
            Tile::Floor(b) => "  ".on(shade((110, 110, 70), *b)),
            Tile::Regenerated => "  ".on(Color::Magenta),
            Tile::Player => "🟩".with(Color::Green),
            Tile::Pursuer => "🟥".with(Color::Red),
            Tile::Ally => "🟪".with(Color::Magenta),
            Tile::Goal => "🟨".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::TILE_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// The terminal picture, tracking which tiles changed since the last flush.
pub struct TileGrid {
    data: Box<[Tile]>,
    width: u16,
    height: u16,
    changes: Vec<(u16, u16)>,
}

impl TileGrid {
    /// A grid filled with `tile`, with every position marked as changed
    /// so the first flush paints the whole picture.
    pub fn new(width: u16, height: u16, tile: Tile) -> Self {
        let data = vec![tile; width as usize * height as usize].into_boxed_slice();
        TileGrid {
            data,
            width,
            height,
            changes: (0..height)
                .flat_map(|y| (0..width).map(move |x| (x, y)))
                .collect(),
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn set(&mut self, coord: (u16, u16), tile: Tile) {
        let idx = self.ravel_index(coord.0, coord.1);
        if self.data[idx] != tile {
            self.data[idx] = tile;
            self.changes.push(coord);
        }
    }

    /// Positions changed since the previous call, in the order they changed.
    pub fn take_changes(&mut self) -> Vec<(u16, u16)> {
        std::mem::take(&mut self.changes)
    }
}

impl std::ops::Index<(u16, u16)> for TileGrid {
    type Output = Tile;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tile_renders() {
        // Display checks the glyph width itself in debug builds
        for tile in [
            Tile::Unknown,
            Tile::Wall(255),
            Tile::Floor(10),
            Tile::Regenerated,
            Tile::Player,
            Tile::Pursuer,
            Tile::Ally,
            Tile::Goal,
        ] {
            assert!(!tile.to_string().is_empty());
        }
    }

    #[test]
    fn test_brightness_range() {
        assert_eq!(Tile::brightness(1.0), 255);
        assert_eq!(Tile::brightness(0.0), 64);
        assert!(Tile::brightness(0.5) > 64 && Tile::brightness(0.5) < 255);
    }

    #[test]
    fn test_changes_are_tracked() {
        let mut grid = TileGrid::new(3, 2, Tile::Unknown);
        assert_eq!(grid.take_changes().len(), 6);
        grid.set((1, 1), Tile::Unknown);
        grid.set((2, 0), Tile::Player);
        grid.set((0, 1), Tile::Wall(200));
        assert_eq!(grid.take_changes(), vec![(2, 0), (0, 1)]);
        assert!(grid.take_changes().is_empty());
        assert_eq!(grid[(2, 0)], Tile::Player);
    }
}
