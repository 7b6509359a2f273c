use log::debug;
use rand::Rng;

use crate::{grid::Grid, snake::Snake, Coords};

pub const APPLE_CHAR: char = 'O';

/// Source of uniform integers, the only randomness the simulation consumes.
pub trait RandomSource {
    /// Uniform integer in `low..=high`.
    fn pick(&mut self, low: i32, high: i32) -> i32;
}

impl<R: Rng> RandomSource for R {
    fn pick(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..=high)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Food {
    pub pos: Coords,
    pub glyph: char,
}

impl Food {
    pub fn at(pos: Coords) -> Self {
        Food { pos, glyph: APPLE_CHAR }
    }
}

/// Picks a random tile not covered by the snake, or `None` when the snake
/// fills the whole grid.
pub fn spawn<R: RandomSource + ?Sized>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Food> {
    if snake.len() >= grid.area() {
        debug!("grid is full, no food spawned");
        return None;
    }

    let (max_x, max_y) = (i32::from(grid.width()), i32::from(grid.height()));
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let pos = (rng.pick(1, max_x), rng.pick(1, max_y));

        if !snake.occupies(pos) {
            debug!("food spawned at {:?} after {} draws", pos, attempts);
            return Some(Food::at(pos));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_pick_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<i32> = (0..200).map(|_| rng.pick(1, 2)).collect();

        assert!(draws.iter().all(|&v| v == 1 || v == 2));
        assert!(draws.contains(&1));
        assert!(draws.contains(&2));
    }

    #[test]
    fn test_spawn_avoids_snake() {
        let grid = Grid::new(3, 2).unwrap();
        let snake = Snake::from_positions(
            vec![(1, 1), (2, 1), (3, 1), (3, 2), (2, 2)],
            Direction::Left,
        )
        .unwrap();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let food = spawn(&grid, &snake, &mut rng).unwrap();
            assert_eq!(food.pos, (1, 2));
            assert_eq!(food.glyph, APPLE_CHAR);
        }
    }

    #[test]
    fn test_spawn_stays_in_bounds() {
        let grid = Grid::new(5, 4).unwrap();
        let snake = Snake::new((3, 3), 1, Direction::Up);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let food = spawn(&grid, &snake, &mut rng).unwrap();
            assert!(grid.contains(food.pos));
            assert_ne!(food.pos, snake.head());
        }
    }

    #[test]
    fn test_full_grid_spawns_nothing() {
        let grid = Grid::new(2, 2).unwrap();
        let snake = Snake::from_positions(
            vec![(1, 1), (2, 1), (2, 2), (1, 2)],
            Direction::Up,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(spawn(&grid, &snake, &mut rng), None);
    }
}
