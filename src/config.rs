use std::{path::PathBuf, time::Duration};

use clap::Parser;
use log::LevelFilter;

use crate::grid::{MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};
use crate::TermInt;

pub const DEFAULT_SPEED: u64 = 8;

// Frame columns plus the frame rows and the status line.
const CHROME_WIDTH: TermInt = 2;
const CHROME_HEIGHT: TermInt = 3;

#[derive(Parser, Debug, Clone)]
#[command(name = "tilesnake")]
#[command(version, about = "Snake on a tile grid, in the terminal")]
pub struct Cli {
    /// Grid width in tiles. Defaults to what fits in the terminal.
    #[arg(long, value_name = "TILES")]
    pub width: Option<TermInt>,

    /// Grid height in tiles. Defaults to what fits in the terminal.
    #[arg(long, value_name = "TILES")]
    pub height: Option<TermInt>,

    /// Game updates per second.
    #[arg(
        long,
        value_name = "TICKS",
        default_value_t = DEFAULT_SPEED,
        value_parser = clap::value_parser!(u64).range(1..=60)
    )]
    pub speed: u64,

    /// File the log is written to; the screen belongs to the game.
    #[arg(long, value_name = "PATH", default_value = "tilesnake.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.speed.max(1))
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Grid size for a terminal of `terminal` cells. Dimensions given on the
    /// command line are passed through unchecked; missing ones are fitted
    /// to the terminal and clamped to the grid bounds.
    pub fn grid_size(&self, terminal: (TermInt, TermInt)) -> (TermInt, TermInt) {
        let width = self.width.unwrap_or_else(|| {
            terminal.0.saturating_sub(CHROME_WIDTH).clamp(MIN_WIDTH, MAX_WIDTH)
        });
        let height = self.height.unwrap_or_else(|| {
            terminal.1.saturating_sub(CHROME_HEIGHT).clamp(MIN_HEIGHT, MAX_HEIGHT)
        });
        (width, height)
    }

    /// Terminal cells needed to show a grid of the given size.
    pub fn required_terminal(size: (TermInt, TermInt)) -> (TermInt, TermInt) {
        (size.0 + CHROME_WIDTH, size.1 + CHROME_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tilesnake"]).unwrap();
        assert_eq!(cli.width, None);
        assert_eq!(cli.height, None);
        assert_eq!(cli.speed, DEFAULT_SPEED);
        assert_eq!(cli.log_file, PathBuf::from("tilesnake.log"));
        assert_eq!(cli.log_level(), LevelFilter::Info);
        assert_eq!(cli.tick_interval(), Duration::from_millis(125));
    }

    #[test]
    fn test_speed_range() {
        assert!(Cli::try_parse_from(["tilesnake", "--speed", "0"]).is_err());
        assert!(Cli::try_parse_from(["tilesnake", "--speed", "61"]).is_err());

        let cli = Cli::try_parse_from(["tilesnake", "--speed", "20", "-v"]).unwrap();
        assert_eq!(cli.tick_interval(), Duration::from_millis(50));
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_explicit_size_is_not_clamped() {
        let cli = Cli::try_parse_from(["tilesnake", "--width", "100", "--height", "1"]).unwrap();
        assert_eq!(cli.grid_size((200, 60)), (100, 1));
    }

    #[test]
    fn test_size_fitted_to_terminal() {
        let cli = Cli::try_parse_from(["tilesnake"]).unwrap();
        assert_eq!(cli.grid_size((40, 20)), (38, 17));
        assert_eq!(cli.grid_size((200, 60)), (MAX_WIDTH, MAX_HEIGHT));
        assert_eq!(cli.grid_size((1, 1)), (MIN_WIDTH, MIN_HEIGHT));

        let cli = Cli::try_parse_from(["tilesnake", "--height", "10"]).unwrap();
        assert_eq!(cli.grid_size((40, 20)), (38, 10));
    }

    #[test]
    fn test_required_terminal() {
        assert_eq!(Cli::required_terminal((38, 17)), (40, 20));
    }
}
