#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loads the Shifting Maze stage catalog from a folder tree.
//!
//! The catalog root holds one folder per stage, ordered by folder name. Each
//! stage folder holds `world*.txt` files, ordered by file name. A world file
//! starts with the baseline switch interval on its own line, followed by one
//! line of cell symbols per maze row:
//!
//! ```text
//! 3
//! S0001
//! 1+0-0
//! 000G1
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use shifting_maze_core::{ChangeInterval, GridError, GridSize, MazeGrid, Stage, StageError, World};
use tracing::{debug, info, warn};

const WORLD_FILE_PREFIX: &str = "world";
const WORLD_FILE_EXTENSION: &str = ".txt";

/// Errors raised while loading the stage catalog.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The catalog root folder does not exist.
    #[error("worlds folder {} does not exist", .0.display())]
    MissingFolder(PathBuf),
    /// A folder or file could not be read.
    #[error("failed to read {}", .path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A world file is malformed.
    #[error("world file {} is malformed", .path.display())]
    World {
        /// Path of the malformed world file.
        path: PathBuf,
        /// Specific formatting problem.
        #[source]
        source: WorldSourceError,
    },
    /// The worlds of a stage do not form a valid stage.
    #[error("stage `{name}` is invalid")]
    Stage {
        /// Name of the offending stage folder.
        name: String,
        /// Specific validation failure.
        #[source]
        source: StageError,
    },
    /// The catalog root contains no stage folders.
    #[error("worlds folder {} contains no stages", .0.display())]
    NoStages(PathBuf),
}

/// Formatting problems within a single world source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldSourceError {
    /// The source contains no lines at all.
    #[error("the world source is empty")]
    Empty,
    /// The first line is not a positive integer.
    #[error("the first line must be a positive integer, found `{0}`")]
    InvalidInterval(String),
    /// The layout exceeds the configured grid size.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parses a single world source into a world of the provided grid size.
pub fn parse_world(source: &str, size: GridSize) -> Result<World, WorldSourceError> {
    let source = source.trim_start_matches('\u{feff}');
    let mut lines = source.lines();
    let header = lines.next().ok_or(WorldSourceError::Empty)?.trim();
    let change_interval = header
        .parse::<u32>()
        .ok()
        .and_then(ChangeInterval::new)
        .ok_or_else(|| WorldSourceError::InvalidInterval(header.to_owned()))?;

    let mut rows: Vec<&str> = lines.map(str::trim).collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        let _ = rows.pop();
    }

    let grid = MazeGrid::from_symbol_rows(size, rows)?;
    Ok(World::new(grid, change_interval))
}

/// Loads every stage below `root`, validating each against the provided grid size.
pub fn load_stages(root: impl AsRef<Path>, size: GridSize) -> Result<Vec<Stage>, LoadError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(LoadError::MissingFolder(root.to_path_buf()));
    }

    let stage_dirs = sorted_entries(root, |path, _| path.is_dir())?;
    if stage_dirs.is_empty() {
        return Err(LoadError::NoStages(root.to_path_buf()));
    }

    let stages = stage_dirs
        .iter()
        .map(|(path, name)| load_stage(path, name, size))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        root = %root.display(),
        stages = stages.len(),
        "loaded maze catalog"
    );
    Ok(stages)
}

/// Loads a single stage folder, using `name` as the stage name.
pub fn load_stage(dir: &Path, name: &str, size: GridSize) -> Result<Stage, LoadError> {
    let world_files = sorted_entries(dir, |path, file_name| {
        path.is_file()
            && file_name.starts_with(WORLD_FILE_PREFIX)
            && file_name.ends_with(WORLD_FILE_EXTENSION)
    })?;

    let mut worlds = Vec::with_capacity(world_files.len());
    for (path, _) in world_files {
        let source = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let world = parse_world(&source, size).map_err(|source| LoadError::World {
            path: path.clone(),
            source,
        })?;
        debug!(
            path = %path.display(),
            change_interval = world.change_interval().get(),
            "loaded world"
        );
        worlds.push(world);
    }

    Stage::new(name, worlds).map_err(|source| LoadError::Stage {
        name: name.to_owned(),
        source,
    })
}

fn sorted_entries(
    dir: &Path,
    mut keep: impl FnMut(&Path, &str) -> bool,
) -> Result<Vec<(PathBuf, String)>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "skipping entry with a non UTF-8 name");
            continue;
        };
        let name = name.to_owned();
        if keep(&path, &name) {
            entries.push((path, name));
        }
    }

    entries.sort_by(|(_, left), (_, right)| left.cmp(right));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shifting_maze_core::{Cell, CellCoord, DEFAULT_GRID_SIZE};

    #[test]
    fn parse_world_reads_interval_and_pads_layout() {
        let world = parse_world("3\nS0+\n1-G\n", DEFAULT_GRID_SIZE).expect("world parses");

        assert_eq!(world.change_interval().get(), 3);
        let grid = world.grid();
        assert_eq!(grid.cell(CellCoord::new(0, 0)), Some(Cell::Start));
        assert_eq!(grid.cell(CellCoord::new(2, 0)), Some(Cell::PlusTile));
        assert_eq!(grid.cell(CellCoord::new(1, 1)), Some(Cell::MinusTile));
        assert_eq!(grid.cell(CellCoord::new(2, 1)), Some(Cell::Goal));
        assert_eq!(grid.cell(CellCoord::new(3, 0)), Some(Cell::Wall));
        assert_eq!(grid.cell(CellCoord::new(0, 9)), Some(Cell::Wall));
    }

    #[test]
    fn parse_world_trims_whitespace_and_trailing_blank_lines() {
        let world = parse_world("\u{feff} 2 \r\n  S0  \r\n\r\n\r\n", DEFAULT_GRID_SIZE)
            .expect("world parses");
        assert_eq!(world.change_interval().get(), 2);
        assert_eq!(world.grid().cell(CellCoord::new(1, 0)), Some(Cell::Floor));
    }

    #[test]
    fn parse_world_rejects_bad_headers() {
        assert_eq!(
            parse_world("", DEFAULT_GRID_SIZE),
            Err(WorldSourceError::Empty)
        );
        assert_eq!(
            parse_world("three\nS0", DEFAULT_GRID_SIZE),
            Err(WorldSourceError::InvalidInterval("three".to_owned()))
        );
        assert_eq!(
            parse_world("0\nS0", DEFAULT_GRID_SIZE),
            Err(WorldSourceError::InvalidInterval("0".to_owned()))
        );
        assert_eq!(
            parse_world("-2\nS0", DEFAULT_GRID_SIZE),
            Err(WorldSourceError::InvalidInterval("-2".to_owned()))
        );
    }

    #[test]
    fn parse_world_rejects_oversized_layouts() {
        let result = parse_world("1\nS00", GridSize::new(2, 2));
        assert_eq!(
            result,
            Err(WorldSourceError::Grid(GridError::TooWide {
                row: 0,
                width: 3,
                max: 2
            }))
        );
    }
}
