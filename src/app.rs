//! Game state and the terminal event loop that drives it.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::board::{Board, Status};
use crate::difficulty::Difficulty;
use crate::error::Result;
use crate::generator::{self, GeneratorConfig};
use crate::input::{translate_event, Dir, InputAction};

/// Outcome of the current game, driving the overlay and input gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Win,
    Lose,
}

/// Owns one playable board plus cursor/clock/difficulty state. Pure game
/// logic, independent of the terminal so it can be driven from tests.
///
/// `preset` is only the difficulty the `D` key cycles through; `config` is
/// the dimensions actually in play, which may start out overridden (by a
/// CLI flag) ahead of whatever `preset` names.
pub struct App {
    preset: Difficulty,
    config: GeneratorConfig,
    board: Board,
    cursor: (usize, usize),
    status: GameStatus,
    started_at: Instant,
    rng: StdRng,
    should_quit: bool,
}

impl App {
    /// Fails with [`crate::error::Error::Generation`] if `difficulty`'s
    /// parameters can't be placed guess-free within the generator's retry
    /// budget; the host should report this and let the user retry or pick a
    /// smaller preset rather than treat it as a bug.
    pub fn new(difficulty: Difficulty) -> Result<Self> {
        Self::from_config(difficulty, Self::config_for(difficulty))
    }

    /// Starts from an explicit board configuration (a CLI override), while
    /// `D` still cycles through the ordinary difficulty presets afterward.
    pub fn with_config(config: GeneratorConfig, seed: Option<u64>) -> Result<Self> {
        Self::from_config_seeded(Difficulty::Easy, config, seed)
    }

    fn config_for(difficulty: Difficulty) -> GeneratorConfig {
        let (width, height, mines) = difficulty.parameters();
        GeneratorConfig::new(width, height, mines, difficulty.topology())
    }

    fn from_config(preset: Difficulty, config: GeneratorConfig) -> Result<Self> {
        Self::from_config_seeded(preset, config, None)
    }

    fn from_config_seeded(
        preset: Difficulty,
        config: GeneratorConfig,
        seed: Option<u64>,
    ) -> Result<Self> {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Self::fresh_board(&config, &mut rng)?;
        Ok(Self {
            preset,
            config,
            board,
            cursor: (0, 0),
            status: GameStatus::Playing,
            started_at: Instant::now(),
            rng,
            should_quit: false,
        })
    }

    fn fresh_board(config: &GeneratorConfig, rng: &mut StdRng) -> Result<Board> {
        let start_idx = (config.height / 2) * config.width + config.width / 2;
        generator::generate(config, start_idx, rng, |_| {})
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.preset
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mines_total(&self) -> usize {
        self.config.mines
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Most actions are infallible; `Restart`/`ChangeDifficulty` reach back
    /// into the generator and can fail if the target configuration turns out
    /// to be unsatisfiable within the retry budget. The event loop surfaces
    /// that failure the same way `main` surfaces a startup failure.
    pub fn handle(&mut self, action: InputAction) -> Result<()> {
        match action {
            InputAction::Move(dir) => self.move_cursor(dir),
            InputAction::Reveal => self.reveal_cursor(),
            InputAction::Flag => self.flag_cursor(),
            InputAction::Chord => self.chord_cursor(),
            InputAction::Restart => self.restart()?,
            InputAction::ChangeDifficulty => self.change_difficulty()?,
            InputAction::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn cursor_idx(&self) -> usize {
        let (x, y) = self.cursor;
        y * self.config.width + x
    }

    fn move_cursor(&mut self, dir: Dir) {
        let (width, height) = (self.config.width, self.config.height);
        let (x, y) = self.cursor;
        self.cursor = match dir {
            Dir::Left => ((x + width - 1) % width, y),
            Dir::Right => ((x + 1) % width, y),
            Dir::Up => (x, (y + height - 1) % height),
            Dir::Down => (x, (y + 1) % height),
        };
    }

    fn reveal_cursor(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        let idx = self.cursor_idx();
        if self.board.open(idx) {
            self.status = GameStatus::Lose;
        } else if self.board.check_win() {
            self.status = GameStatus::Win;
        }
    }

    fn flag_cursor(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.board.toggle_flag(self.cursor_idx());
    }

    /// Opens every hidden, unflagged neighbour of an already-opened numbered
    /// cell once its flagged neighbours match its count. Convenience for
    /// clearing an already-deduced pocket without revisiting every cell.
    fn chord_cursor(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        let idx = self.cursor_idx();
        if self.board.status(idx) != Status::Opened {
            return;
        }
        let count = self.board.neighbor_mine_count(idx);
        if count <= 0 {
            return;
        }
        let neighbours: Vec<usize> = self.board.topology().neighbours(idx).to_vec();
        let flagged = neighbours
            .iter()
            .filter(|&&n| self.board.status(n) == Status::Flagged)
            .count();
        if flagged as i8 != count {
            return;
        }

        for n in neighbours {
            if self.board.status(n) == Status::Hidden && self.board.open(n) {
                self.status = GameStatus::Lose;
            }
        }
        if self.status == GameStatus::Playing && self.board.check_win() {
            self.status = GameStatus::Win;
        }
    }

    fn restart(&mut self) -> Result<()> {
        self.board = Self::fresh_board(&self.config, &mut self.rng)?;
        self.cursor = (0, 0);
        self.status = GameStatus::Playing;
        self.started_at = Instant::now();
        Ok(())
    }

    fn change_difficulty(&mut self) -> Result<()> {
        self.preset = self.preset.cycle();
        self.config = Self::config_for(self.preset);
        self.restart()
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(120);
        let result = self.event_loop(&mut terminal, tick_rate);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        tick_rate: Duration,
    ) -> Result<()> {
        let mut last_tick = Instant::now();
        while !self.should_quit {
            terminal.draw(|f| crate::ui::draw_app(f, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Some(action) = translate_event(event::read()?) {
                    self.handle(action)?;
                }
            }
            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }
        }
        Ok(())
    }
}
