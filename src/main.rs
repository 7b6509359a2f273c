use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{Config, WriteLogger};

use tilesnake::config::Cli;
use tilesnake::game::SnakeGame;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs go to a file
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("starting tilesnake");

    let mut game = SnakeGame::new(&cli)?;
    game.run()
}
