//! Per-tick state machine tying the grid, the snake and the food together.
//!
//! A tick never rejects a move. Running off the grid or into the body is
//! detected afterwards and ends the session as [`GameState::Lost`].

use log::{debug, info, warn};
use rand::rngs::ThreadRng;

use crate::food::{self, Food, RandomSource};
use crate::grid::{Grid, GridError};
use crate::input::InputSource;
use crate::snake::{Direction, Snake};
use crate::{Coords, TermInt};

const START_POS: Coords = (1, 1);
const START_DIRECTION: Direction = Direction::Right;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameState {
    Running,
    Won,
    Lost,
}

impl GameState {
    pub fn is_over(self) -> bool {
        self != GameState::Running
    }
}

/// One game session. Owns every entity it touches; a new session is started
/// with [`Engine::reset`] or [`Engine::resize`].
pub struct Engine<R = ThreadRng> {
    grid: Grid,
    snake: Snake,
    food: Option<Food>,
    state: GameState,
    ticks: u64,
    rng: R,
}

impl<R: RandomSource> Engine<R> {
    /// Starts a session with a one-segment snake in the top-left corner
    /// heading right.
    pub fn new(width: TermInt, height: TermInt, rng: R) -> Result<Self, GridError> {
        let grid = Grid::new(width, height)?;
        let snake = Snake::new(START_POS, 1, START_DIRECTION);

        let mut engine = Engine { grid, snake, food: None, state: GameState::Running, ticks: 0, rng };
        engine.place_food();
        engine.start();
        Ok(engine)
    }

    /// Starts a session from an explicit snake and food. Food lying on the
    /// snake is dropped.
    pub fn with_layout(
        width: TermInt,
        height: TermInt,
        snake: Snake,
        food: Option<Coords>,
        rng: R,
    ) -> Result<Self, GridError> {
        let grid = Grid::new(width, height)?;
        let food = match food {
            Some(pos) if snake.occupies(pos) => {
                warn!("food at {:?} overlaps the snake and was discarded", pos);
                None
            }
            other => other.map(Food::at),
        };

        let mut engine = Engine { grid, snake, food, state: GameState::Running, ticks: 0, rng };
        engine.start();
        Ok(engine)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Segment count, reported as the session score.
    pub fn length(&self) -> usize {
        self.snake.len()
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot_grid(&self) -> Vec<Vec<char>> {
        self.grid.snapshot()
    }

    /// Reallocates the grid and starts a new session on it. Nothing changes
    /// if the dimensions are rejected.
    pub fn resize(&mut self, width: TermInt, height: TermInt) -> Result<(), GridError> {
        self.grid.resize(width, height)?;
        self.snake = Snake::new(START_POS, 1, START_DIRECTION);
        self.place_food();
        self.start();
        Ok(())
    }

    pub fn reset(&mut self) {
        let (width, height) = (self.grid.width(), self.grid.height());
        if let Err(e) = self.resize(width, height) {
            // The current dimensions were validated when the grid was built.
            warn!("could not restart session: {}", e);
        }
    }

    pub fn tick_with<I: InputSource + ?Sized>(&mut self, input: &mut I) -> GameState {
        let turn = input.poll_direction();
        self.tick(turn)
    }

    /// Advances the session by one cell, applying `turn` first if given.
    pub fn tick(&mut self, turn: Option<Direction>) -> GameState {
        if self.state.is_over() {
            return self.state;
        }

        if let Some(dir) = turn {
            self.snake.set_direction(dir);
        }

        let moved = self.snake.move_step();
        self.ticks += 1;

        for seg in self.snake.body() {
            self.grid.set_tile(seg.pos, seg.glyph);
        }
        if moved.new_head != moved.old_tail || self.snake.len() == 1 {
            self.grid.clear_tile(moved.old_tail);
        }

        if self.food.map(|f| f.pos) == Some(moved.new_head) {
            self.snake.grow(moved.old_tail);
            let tail = self.snake.body()[self.snake.len() - 1];
            self.grid.set_tile(tail.pos, tail.glyph);
            debug!("food eaten at {:?}, length is now {}", moved.new_head, self.snake.len());

            self.place_food();
        }

        self.evaluate();
        if self.state.is_over() {
            info!(
                "session ended {:?} after {} ticks with length {}",
                self.state,
                self.ticks,
                self.snake.len()
            );
        }

        self.state
    }

    fn start(&mut self) {
        self.ticks = 0;

        for seg in self.snake.body() {
            self.grid.set_tile(seg.pos, seg.glyph);
        }
        if let Some(f) = self.food {
            self.grid.set_tile(f.pos, f.glyph);
        }

        self.evaluate();
        info!(
            "session started on a {}x{} grid with length {}",
            self.grid.width(),
            self.grid.height(),
            self.snake.len()
        );
    }

    fn place_food(&mut self) {
        self.food = food::spawn(&self.grid, &self.snake, &mut self.rng);
        if let Some(f) = self.food {
            self.grid.set_tile(f.pos, f.glyph);
        }
    }

    fn evaluate(&mut self) {
        self.state = if self.snake.has_self_collision() || !self.grid.contains(self.snake.head()) {
            GameState::Lost
        } else if self.snake.len() == self.grid.area() {
            GameState::Won
        } else {
            GameState::Running
        };
    }
}
