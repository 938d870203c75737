#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Shifting Maze in the terminal.

mod app;
mod board;
mod config;
mod input;
mod messages;

use std::{io, num::NonZeroUsize, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use shifting_maze_core::StageIndex;
use shifting_maze_persistence::SaveFile;
use tracing_subscriber::EnvFilter;

use crate::{app::App, config::Config};

/// Command-line arguments accepted by the Shifting Maze binary.
#[derive(Debug, Parser)]
#[command(name = "shifting-maze", about = "Play Shifting Maze in the terminal")]
struct Cli {
    /// Configuration file to read instead of `shifting-maze.toml`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Folder holding one sub-folder per stage.
    #[arg(long, value_name = "DIR")]
    worlds: Option<PathBuf>,
    /// JSON file recording unlock progress.
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
    /// Unlocked stage to start on, counted from 1.
    #[arg(long, value_name = "N")]
    stage: Option<NonZeroUsize>,
}

/// Entry point for the Shifting Maze command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let worlds_dir = cli.worlds.unwrap_or_else(|| config.worlds_dir.clone());
    let save_file = cli.save.unwrap_or_else(|| config.save_file.clone());

    let stages = shifting_maze_catalog::load_stages(&worlds_dir, config.grid_size())
        .with_context(|| format!("failed to load stages from {}", worlds_dir.display()))?;
    let mut app = App::new(stages, SaveFile::new(save_file))?;

    if let Some(stage) = cli.stage {
        let stage = StageIndex::new(stage.get() - 1);
        app.start_at(stage)
            .with_context(|| format!("cannot start on stage {}", stage.get() + 1))?;
    }

    let stdin = io::stdin();
    app.run(stdin.lock(), io::stdout().lock())
}
