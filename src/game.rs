use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Result};
use crossterm::event::KeyEvent;
use log::{error, info};

use crate::config::Cli;
use crate::engine::{Engine, GameState};
use crate::input::{is_ctrl_c, map_key, KeyAction};
use crate::snake::Direction;
use crate::term::TermManager;
use crate::TermInt;

const POLL_INTERVAL_MS: u64 = 5;

const DEAD_SNAKE_CHAR: char = 'X';

/// Whether the player wants another session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives sessions of the engine on the terminal: reads keys, ticks at a
/// fixed rate and draws the grid after every tick.
pub struct SnakeGame {
    grid_size: (TermInt, TermInt),
    tick_interval: Duration,
    paused: bool,
    term: TermManager,
    engine: Engine,
    sessions: u32,
    best_length: usize,
}

impl SnakeGame {
    pub fn new(cli: &Cli) -> Result<Self> {
        let term = TermManager::new()?;
        let grid_size = cli.grid_size(term.get_terminal_size());

        let engine = Engine::new(grid_size.0, grid_size.1, rand::thread_rng())?;

        let needed = Cli::required_terminal(grid_size);
        let (term_w, term_h) = term.get_terminal_size();
        if needed.0 > term_w || needed.1 > term_h {
            bail!(
                "a {}x{} grid needs a {}x{} terminal, this one is {}x{}",
                grid_size.0, grid_size.1, needed.0, needed.1, term_w, term_h
            );
        }

        info!("grid is {}x{}, ticking every {:?}", grid_size.0, grid_size.1, cli.tick_interval());

        Ok(SnakeGame {
            grid_size,
            tick_interval: cli.tick_interval(),
            paused: false,
            term,
            engine,
            sessions: 0,
            best_length: 0,
        })
    }

    /// Runs the intro and then sessions until the player quits. The
    /// terminal is restored whatever the outcome.
    pub fn run(&mut self) -> Result<()> {
        let result = self.run_sessions();

        if let Err(e) = self.term.restore() {
            error!("failed to restore the terminal: {:#}", e);
        }

        result
    }

    fn run_sessions(&mut self) -> Result<()> {
        self.term.setup()?;

        if self.show_intro()? == Flow::Quit {
            return Ok(());
        }

        while self.play()? == Flow::Continue {}

        info!("quitting after {} sessions, best length {}", self.sessions, self.best_length);
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    pub fn play(&mut self) -> Result<Flow> {
        if self.sessions > 0 {
            self.engine.reset();
        }
        self.sessions += 1;
        self.paused = false;

        self.term.clear()?;
        self.term.draw_borders(self.grid_size)?;
        self.draw()?;

        let mut dir_change: Option<Direction> = None;
        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match map_key(&key_ev) {
                    KeyAction::Turn(dir) => dir_change = Some(dir),
                    KeyAction::TogglePause => self.toggle_pause()?,
                    KeyAction::Quit => return Ok(Flow::Quit),
                    KeyAction::Ignore => {}
                }
            }

            if self.paused {
                last_step = Instant::now();
                continue;
            }

            if last_step.elapsed() < self.tick_interval {
                continue;
            }
            last_step = Instant::now();

            let state = self.engine.tick_with(&mut dir_change);
            self.draw()?;

            if state.is_over() {
                self.game_over(state)?;
                break;
            }
        }

        // Quit if the user CTRL+C's after the game
        let key = self.term.read_key_blocking()?;
        Ok(after_game(&key))
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw(&mut self) -> Result<()> {
        self.term.draw_grid(&self.engine.snapshot_grid())?;
        let status = format!(
            " Length: {}   Game: {}   Best: {}",
            self.engine.length(),
            self.sessions,
            self.best_length
        );
        self.term.draw_line(self.grid_size.1 + 2, &status)
    }

    fn game_over(&mut self, state: GameState) -> Result<()> {
        let score = self.engine.length();
        self.best_length = self.best_length.max(score);
        info!("game {} over: {:?} with length {}", self.sessions, state, score);

        let won = state == GameState::Won;
        if !won {
            let grid = self.engine.grid();
            let body: Vec<_> = self.engine.snake().body().iter()
                .map(|seg| seg.pos)
                .filter(|&pos| grid.contains(pos))
                .collect();
            for pos in body {
                self.term.draw_tile(pos, DEAD_SNAKE_CHAR)?;
            }
            self.term.flush()?;
        }

        let s = if won {"You won!"} else {"Game over!"};
        self.term.show_message(&[
            s,
            &*format!("Length: {}", score),
            &*format!("Best: {}", self.best_length),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

fn after_game(key: &KeyEvent) -> Flow {
    if is_ctrl_c(key) {
        Flow::Quit
    } else {
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_any_key_but_ctrl_c_continues() {
        let enter = KeyEvent { code: KeyCode::Enter, modifiers: KeyModifiers::NONE };
        let c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::NONE };
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };

        assert_eq!(after_game(&enter), Flow::Continue);
        assert_eq!(after_game(&c), Flow::Continue);
        assert_eq!(after_game(&ctrl_c), Flow::Quit);
    }
}
