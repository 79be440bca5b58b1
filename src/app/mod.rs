mod renderer;
pub mod tile;

use std::io::{Stdout, Write};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use renderer::{Renderer, compose, picture_size};

use crate::{
    config::GameConfig,
    generators::{Generator, get_rng},
    session::{GameSession, GameStatus, Rules},
};

/// What the player asked for with one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Unit step, y growing southwards.
    Move { dx: i8, dy: i8 },
    SwitchGenerator,
    Restart,
    Quit,
}

/// Map a key to an intent. Keys without a meaning return `None` and are ignored.
pub fn intent_for_key(code: KeyCode) -> Option<Intent> {
    let step = |dx, dy| Some(Intent::Move { dx, dy });
    match code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => step(0, -1),
        KeyCode::Down | KeyCode::Char('s' | 'S') => step(0, 1),
        KeyCode::Left | KeyCode::Char('a' | 'A') => step(-1, 0),
        KeyCode::Right | KeyCode::Char('d' | 'D') => step(1, 0),
        KeyCode::Tab => Some(Intent::SwitchGenerator),
        KeyCode::Enter => Some(Intent::Restart),
        KeyCode::Esc => Some(Intent::Quit),
        _ => None,
    }
}

/// The generator after `current` in the intro screen's cycle.
pub fn next_generator(current: Generator) -> Generator {
    match current {
        Generator::Hilbert => Generator::Kruskal,
        Generator::Kruskal => Generator::Hilbert,
    }
}

/// A terminal event the game reacts to.
enum Input {
    Intent(Intent),
    Resize,
}

/// Block until a key press with a meaning, or a resize.
fn next_input() -> std::io::Result<Input> {
    loop {
        match event::read()? {
            event::Event::Key(event::KeyEvent {
                code,
                kind: event::KeyEventKind::Press,
                ..
            }) => {
                if let Some(intent) = intent_for_key(code) {
                    return Ok(Input::Intent(intent));
                }
            }
            event::Event::Resize(_, _) => return Ok(Input::Resize),
            _ => {}
        }
    }
}

#[derive(Debug, PartialEq)]
enum GameRunResult {
    /// Game finished and the user wants another one
    Restart,
    /// Game is canceled by user
    Canceled,
}

pub struct App {
    config: GameConfig,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        App { config }
    }

    /// Enter raw mode and the alternate screen. A panic hook puts the terminal back
    /// before the default hook prints the panic.
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = App::restore_terminal(&mut std::io::stdout());
            default_hook(info);
        }));
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()
    }

    /// Leave the alternate screen and raw mode.
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()
    }

    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let Some(generator) = self.intro(stdout)? else {
            return Ok(());
        };

        let rules = Rules {
            generator,
            ..self.config.rules
        };
        tracing::info!(
            "[app] Starting game with maze size {}x{} and generator {}",
            rules.side(),
            rules.side(),
            generator
        );

        let mut renderer = Renderer::new();
        loop {
            let session = GameSession::new(rules, get_rng(self.config.seed));
            if App::play(&mut renderer, session)? == GameRunResult::Canceled {
                break;
            }
            tracing::info!("[app] Restarting game...");
        }
        tracing::info!("[app] Game was canceled by user, exiting...");
        Ok(())
    }

    /// Title, controls and generator choice. Returns `None` if the user leaves.
    fn intro(&self, stdout: &mut Stdout) -> std::io::Result<Option<Generator>> {
        execute!(
            stdout,
            style::PrintStyledContent(
                "Mazemory\r\n\r\n"
                    .with(Color::Yellow)
                    .attribute(Attribute::Reverse)
            ),
            style::PrintStyledContent(
                "Reach your ally. Corridors you forget rearrange themselves, and something is hunting you.\r\n\r\n"
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
            ),
            style::PrintStyledContent("  ←/→/↑/↓ or WASD: Step one cell\r\n".with(Color::Cyan)),
            style::PrintStyledContent("  Tab: Switch maze generator\r\n".with(Color::Cyan)),
            style::PrintStyledContent("  Enter: Start / play again\r\n".with(Color::Cyan)),
            style::PrintStyledContent("  Esc: Exit game\r\n\r\n".with(Color::Cyan)),
        )?;

        let mut generator = self.config.rules.generator;
        loop {
            execute!(
                stdout,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                style::PrintStyledContent(
                    format!("Maze generator: {}", generator)
                        .with(Color::Green)
                        .attribute(Attribute::Bold)
                ),
            )?;
            match next_input()? {
                Input::Intent(Intent::SwitchGenerator) => generator = next_generator(generator),
                Input::Intent(Intent::Restart) => return Ok(Some(generator)),
                Input::Intent(Intent::Quit) => return Ok(None),
                _ => {}
            }
        }
    }

    /// Show the game at the current terminal size. While the terminal is too small,
    /// wait for a resize that fits or for Esc. Returns false if the user left.
    fn redraw(renderer: &mut Renderer, session: &GameSession) -> std::io::Result<bool> {
        let (width, height) = picture_size(session.maze().width(), session.maze().height());
        loop {
            renderer.reset()?;
            if renderer.check_size(width, height)? {
                renderer.draw(&session.snapshot())?;
                return Ok(true);
            }
            loop {
                match next_input()? {
                    Input::Intent(Intent::Quit) => return Ok(false),
                    Input::Resize => break,
                    Input::Intent(_) => {}
                }
            }
        }
    }

    /// Play one game until the user quits, or restarts after it is decided.
    fn play(renderer: &mut Renderer, mut session: GameSession) -> std::io::Result<GameRunResult> {
        if !App::redraw(renderer, &session)? {
            return Ok(GameRunResult::Canceled);
        }

        loop {
            let intent = match next_input()? {
                Input::Intent(intent) => intent,
                Input::Resize => {
                    if !App::redraw(renderer, &session)? {
                        return Ok(GameRunResult::Canceled);
                    }
                    continue;
                }
            };

            match intent {
                Intent::Quit => return Ok(GameRunResult::Canceled),
                Intent::Restart if session.status().is_over() => {
                    return Ok(GameRunResult::Restart);
                }
                Intent::Move { dx, dy } => {
                    if session.move_by(dx, dy) {
                        renderer.draw(&session.snapshot())?;
                        match session.status() {
                            GameStatus::Won => tracing::info!("[app] Player won"),
                            GameStatus::Lost => tracing::info!("[app] Player was caught"),
                            GameStatus::InProgress => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
