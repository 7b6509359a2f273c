//! Snake on a bounded tile grid, rendered as single-character glyphs.
//!
//! The simulation core (`grid`, `snake`, `food`, `engine`) performs no I/O;
//! `input`, `term` and `game` drive it from a terminal.

pub mod config;
pub mod engine;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (i32, i32);
