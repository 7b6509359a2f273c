use std::{error::Error, fmt};

use log::trace;

use crate::{Coords, TermInt};

pub const MIN_WIDTH: TermInt = 2;
pub const MAX_WIDTH: TermInt = 70;
pub const MIN_HEIGHT: TermInt = 2;
pub const MAX_HEIGHT: TermInt = 30;

pub const EMPTY_CHAR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    InvalidWidth { width: TermInt },
    InvalidHeight { height: TermInt },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidWidth { width } => write!(
                f,
                "grid width {} is outside {}..={}",
                width, MIN_WIDTH, MAX_WIDTH
            ),
            GridError::InvalidHeight { height } => write!(
                f,
                "grid height {} is outside {}..={}",
                height, MIN_HEIGHT, MAX_HEIGHT
            ),
        }
    }
}

impl Error for GridError {}

/// Bounded tile array addressed with 1-indexed coordinates.
///
/// Tiles are stored row-major; nothing outside `[1, width] x [1, height]`
/// is ever written.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: TermInt,
    height: TermInt,
    tiles: Vec<char>,
}

impl Grid {
    pub fn new(width: TermInt, height: TermInt) -> Result<Self, GridError> {
        validate(width, height)?;
        Ok(Grid { width, height, tiles: blank_tiles(width, height) })
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn default_glyph(&self) -> char {
        EMPTY_CHAR
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.index(pos).is_some()
    }

    pub fn tile(&self, pos: Coords) -> Option<char> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// Writes `glyph` at `pos`. Out-of-bounds writes are ignored and
    /// reported by returning `false`.
    pub fn set_tile(&mut self, pos: Coords, glyph: char) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.tiles[i] = glyph;
                true
            }
            None => {
                trace!("ignored write of {:?} outside the grid at {:?}", glyph, pos);
                false
            }
        }
    }

    pub fn clear_tile(&mut self, pos: Coords) -> bool {
        self.set_tile(pos, EMPTY_CHAR)
    }

    /// Reallocates the grid at the new size, every tile blank. On error the
    /// grid is left as it was.
    pub fn resize(&mut self, width: TermInt, height: TermInt) -> Result<(), GridError> {
        validate(width, height)?;
        self.width = width;
        self.height = height;
        self.tiles = blank_tiles(width, height);
        Ok(())
    }

    /// Full glyph matrix, one `Vec` per row from top to bottom.
    pub fn snapshot(&self) -> Vec<Vec<char>> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    fn index(&self, (x, y): Coords) -> Option<usize> {
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        if x < 1 || y < 1 || x > w || y > h {
            return None;
        }

        Some(w as usize * (y - 1) as usize + (x - 1) as usize)
    }
}

fn validate(width: TermInt, height: TermInt) -> Result<(), GridError> {
    if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
        return Err(GridError::InvalidWidth { width });
    }
    if !(MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
        return Err(GridError::InvalidHeight { height });
    }
    Ok(())
}

fn blank_tiles(width: TermInt, height: TermInt) -> Vec<char> {
    vec![EMPTY_CHAR; width as usize * height as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_with_default_glyph() {
        let grid = Grid::new(3, 2).unwrap();
        assert_eq!(grid.snapshot(), vec![vec![' '; 3], vec![' '; 3]]);
        assert_eq!(grid.area(), 6);
    }

    #[test]
    fn test_dimension_bounds() {
        assert!(Grid::new(MIN_WIDTH, MIN_HEIGHT).is_ok());
        assert!(Grid::new(MAX_WIDTH, MAX_HEIGHT).is_ok());
        assert_eq!(Grid::new(1, 5), Err(GridError::InvalidWidth { width: 1 }));
        assert_eq!(Grid::new(71, 5), Err(GridError::InvalidWidth { width: 71 }));
        assert_eq!(Grid::new(5, 31), Err(GridError::InvalidHeight { height: 31 }));
        assert_eq!(Grid::new(5, 0), Err(GridError::InvalidHeight { height: 0 }));
    }

    #[test]
    fn test_set_tile_is_one_indexed() {
        let mut grid = Grid::new(3, 2).unwrap();
        assert!(grid.set_tile((1, 1), 'a'));
        assert!(grid.set_tile((3, 2), 'b'));
        assert_eq!(grid.snapshot(), vec![vec!['a', ' ', ' '], vec![' ', ' ', 'b']]);
        assert_eq!(grid.tile((3, 2)), Some('b'));
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut grid = Grid::new(3, 3).unwrap();
        let before = grid.clone();

        for pos in [(0, 1), (1, 0), (4, 1), (1, 4), (-1, -1)] {
            assert!(!grid.set_tile(pos, '#'));
            assert_eq!(grid.tile(pos), None);
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn test_resize_is_destructive() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_tile((2, 2), '#');

        grid.resize(5, 3).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert!(grid.snapshot().iter().flatten().all(|&c| c == EMPTY_CHAR));
    }

    #[test]
    fn test_failed_resize_keeps_grid() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_tile((2, 2), '#');
        let before = grid.clone();

        assert!(grid.resize(4, 99).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_error_message() {
        let err = Grid::new(80, 10).unwrap_err();
        assert_eq!(err.to_string(), "grid width 80 is outside 2..=70");
    }
}
