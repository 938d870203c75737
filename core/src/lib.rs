#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Shifting Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the session executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Maze data ([`Stage`], [`World`], [`MazeGrid`])
//! is immutable once constructed and validated here, so the session never has
//! to re-check catalog invariants.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Shifting Maze.";

/// Grid dimensions used by the reference stage set.
pub const DEFAULT_GRID_SIZE: GridSize = GridSize::new(10, 10);

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests that the player advance a single cell in the specified direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Restores the session to the state preceding the most recent accepted move.
    Undo,
    /// Re-applies the state most recently discarded by an undo.
    Redo,
    /// Restarts the provided stage from its first world and start cell.
    Reset {
        /// Stage that should become active.
        stage: StageIndex,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    MoveApplied {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
        /// Number of moves made in the active world, including this one.
        move_count: u32,
    },
    /// Reports that a move request was rejected without mutating the session.
    MoveRejected {
        /// Direction provided in the move request.
        direction: Direction,
        /// Specific reason the move failed.
        reason: InvalidMove,
    },
    /// Reports that the cell the player entered modified the switch interval.
    TileEffect {
        /// Effect applied by the entered tile.
        effect: TileEffect,
        /// Switch interval in force after the effect resolved.
        change_interval: ChangeInterval,
    },
    /// Announces that the active world advanced to the next layout of the stage.
    WorldSwitched {
        /// World that became active.
        world: WorldIndex,
        /// Indicates whether the player ended up inside a wall of the new world.
        became_stuck: bool,
    },
    /// Announces that the player reached the goal of the active stage.
    StageCleared {
        /// Stage that was cleared.
        stage: StageIndex,
    },
    /// Confirms that the session was replaced by a snapshot from the history.
    HistoryRestored {
        /// History operation that produced the snapshot.
        action: HistoryAction,
        /// Session state that became active.
        snapshot: SessionSnapshot,
    },
    /// Confirms that a stage was restarted from its first world.
    StageReset {
        /// Stage that became active.
        stage: StageIndex,
    },
    /// Reports that a reset targeted a stage missing from the catalog.
    ResetRejected {
        /// Stage requested by the reset command.
        stage: StageIndex,
    },
    /// Announces that clearing a stage made more stages selectable.
    StagesUnlocked {
        /// Number of stages that are now unlocked.
        unlocked_stage: usize,
    },
}

/// Direction of travel through the session history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    /// Step backwards to the state preceding the latest move.
    Undo,
    /// Step forwards to the state discarded by the latest undo.
    Redo,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Computes the neighbouring cell reached by a single step from `from`.
    ///
    /// Returns `None` when the step would leave a grid of the provided size.
    #[must_use]
    pub fn step(self, from: CellCoord, size: GridSize) -> Option<CellCoord> {
        let (column, row) = match self {
            Self::North => (Some(from.column()), from.row().checked_sub(1)),
            Self::East => (from.column().checked_add(1), Some(from.row())),
            Self::South => (Some(from.column()), from.row().checked_add(1)),
            Self::West => (from.column().checked_sub(1), Some(from.row())),
        };
        let target = CellCoord::new(column?, row?);
        size.contains(target).then_some(target)
    }
}

/// Position of a stage within the catalog.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StageIndex(usize);

impl StageIndex {
    /// Index of the first stage, the only one whose start cell may be re-entered.
    pub const FIRST: Self = Self(0);

    /// Creates a new stage index with the provided zero-based value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based position of the stage.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Position of a world within its stage.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WorldIndex(usize);

impl WorldIndex {
    /// Index of the world every stage starts in.
    pub const FIRST: Self = Self(0);

    /// Creates a new world index with the provided zero-based value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based position of the world.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dimensions of a maze grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside `[0, columns) x [0, rows)`.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }
}

/// Kinds of cells that compose a maze layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable cell; also used to pad layouts up to the grid size.
    Wall,
    /// Plain walkable cell.
    Floor,
    /// Cell where the player begins a stage.
    Start,
    /// Cell that clears the stage when entered.
    Goal,
    /// Walkable cell that lengthens the active switch interval by one move.
    PlusTile,
    /// Walkable cell that shortens the active switch interval by one move.
    MinusTile,
}

impl Cell {
    /// Decodes a maze source symbol. Unknown symbols are treated as floor.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            '1' => Self::Wall,
            'S' => Self::Start,
            'G' => Self::Goal,
            '+' => Self::PlusTile,
            '-' => Self::MinusTile,
            _ => Self::Floor,
        }
    }

    /// Reports whether the cell blocks movement.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Reasons a maze layout cannot be fitted into a fixed-size grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The layout contains more rows than the grid allows.
    #[error("layout has {rows} rows but the grid holds at most {max}")]
    TooTall {
        /// Number of rows supplied by the layout.
        rows: usize,
        /// Number of rows the grid can hold.
        max: u32,
    },
    /// A layout row contains more cells than the grid allows.
    #[error("layout row {row} has {width} cells but the grid holds at most {max}")]
    TooWide {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells supplied by the row.
        width: usize,
        /// Number of columns the grid can hold.
        max: u32,
    },
}

/// Fixed-size rectangular layout of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Builds a grid from rows of cells, padding short rows and missing rows with walls.
    pub fn from_rows<R>(size: GridSize, rows: R) -> Result<Self, GridError>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = Cell>,
    {
        let mut cells = vec![Cell::Wall; size.cell_count()];
        let max_rows = usize::try_from(size.rows()).unwrap_or(usize::MAX);
        let max_columns = usize::try_from(size.columns()).unwrap_or(usize::MAX);

        for (row_index, row) in rows.into_iter().enumerate() {
            if row_index >= max_rows {
                return Err(GridError::TooTall {
                    rows: row_index + 1,
                    max: size.rows(),
                });
            }

            for (column_index, cell) in row.into_iter().enumerate() {
                if column_index >= max_columns {
                    return Err(GridError::TooWide {
                        row: row_index,
                        width: column_index + 1,
                        max: size.columns(),
                    });
                }
                cells[row_index * max_columns + column_index] = cell;
            }
        }

        Ok(Self { size, cells })
    }

    /// Builds a grid from source text rows where each character is a cell symbol.
    pub fn from_symbol_rows<I, S>(size: GridSize, rows: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let decoded: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().map(Cell::from_symbol).collect())
            .collect();
        Self::from_rows(size, decoded)
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the cell at the provided coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.size
            .index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Iterator over the grid rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        let width = usize::try_from(self.size.columns()).unwrap_or(1).max(1);
        self.cells.chunks(width)
    }

    /// Iterator over every start cell in row-major order.
    pub fn start_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.size.columns().max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Start)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % columns, index / columns))
            })
    }
}

/// Number of accepted moves after which the active world advances.
///
/// The interval never drops below one; [`ChangeInterval::decrement`] saturates there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeInterval(NonZeroU32);

impl ChangeInterval {
    /// Smallest permitted interval.
    pub const MIN: Self = Self(NonZeroU32::MIN);

    /// Creates an interval, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Retrieves the number of moves represented by the interval.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// Lengthens the interval by one move.
    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Shortens the interval by one move, returning `false` when already at the minimum.
    pub fn decrement(&mut self) -> bool {
        match NonZeroU32::new(self.0.get() - 1) {
            Some(value) => {
                self.0 = value;
                true
            }
            None => false,
        }
    }
}

/// One maze layout of a stage together with its baseline switch interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    grid: MazeGrid,
    change_interval: ChangeInterval,
}

impl World {
    /// Creates a world from a layout and the interval that applies whenever it becomes active.
    #[must_use]
    pub const fn new(grid: MazeGrid, change_interval: ChangeInterval) -> Self {
        Self {
            grid,
            change_interval,
        }
    }

    /// Layout of the world.
    #[must_use]
    pub const fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Baseline switch interval of the world.
    #[must_use]
    pub const fn change_interval(&self) -> ChangeInterval {
        self.change_interval
    }
}

/// Reasons a list of worlds cannot form a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// The stage defines no worlds.
    #[error("stage contains no worlds")]
    NoWorlds,
    /// A world lacks a start cell.
    #[error("world {} has no start cell", .world.get() + 1)]
    MissingStart {
        /// World missing the start cell.
        world: WorldIndex,
    },
    /// A world contains more than one start cell.
    #[error("world {} has more than one start cell", .world.get() + 1)]
    DuplicateStart {
        /// World containing the extra start cell.
        world: WorldIndex,
    },
    /// A world uses different grid dimensions than the first world.
    #[error("world {} does not match the grid size of the first world", .world.get() + 1)]
    GridSizeMismatch {
        /// World with the mismatching grid.
        world: WorldIndex,
    },
}

/// Named, non-empty cycle of worlds that share one unlock slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    name: String,
    worlds: Vec<World>,
    start: CellCoord,
}

impl Stage {
    /// Validates the worlds and assembles them into a stage.
    pub fn new(name: impl Into<String>, worlds: Vec<World>) -> Result<Self, StageError> {
        let first = worlds.first().ok_or(StageError::NoWorlds)?;
        let size = first.grid().size();
        let mut start = None;

        for (index, world) in worlds.iter().enumerate() {
            let world_index = WorldIndex::new(index);
            if world.grid().size() != size {
                return Err(StageError::GridSizeMismatch { world: world_index });
            }

            let mut starts = world.grid().start_cells();
            let Some(world_start) = starts.next() else {
                return Err(StageError::MissingStart { world: world_index });
            };
            if starts.next().is_some() {
                return Err(StageError::DuplicateStart { world: world_index });
            }
            if index == 0 {
                start = Some(world_start);
            }
        }

        let start = start.ok_or(StageError::MissingStart {
            world: WorldIndex::FIRST,
        })?;
        Ok(Self {
            name: name.into(),
            worlds,
            start,
        })
    }

    /// Display name of the stage.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Worlds of the stage in cycle order.
    #[must_use]
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// Number of worlds in the cycle; always at least one.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Returns the world at the provided index, if present.
    #[must_use]
    pub fn world(&self, index: WorldIndex) -> Option<&World> {
        self.worlds.get(index.get())
    }

    /// Start cell of the first world, where every attempt at the stage begins.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Returns the world that follows `current`, wrapping to the first world.
    #[must_use]
    pub fn next_world(&self, current: WorldIndex) -> (WorldIndex, &World) {
        let index = (current.get() + 1) % self.worlds.len();
        (WorldIndex::new(index), &self.worlds[index])
    }
}

/// Coarse state of a session derived from its flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// The player may move.
    Idle,
    /// The player sits inside a wall; only history navigation can recover.
    Stuck,
    /// The stage goal was reached; moves are no longer accepted.
    Cleared,
}

/// Immutable copy of every mutable session field, used for history navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Stage being played.
    pub stage: StageIndex,
    /// World that is currently active within the stage.
    pub world: WorldIndex,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Accepted moves since the active world became active.
    pub move_count: u32,
    /// Switch interval currently in force.
    pub change_interval: ChangeInterval,
    /// Indicates whether the player is trapped inside a wall.
    pub stuck: bool,
    /// Indicates whether the stage goal was reached.
    pub cleared: bool,
}

impl SessionSnapshot {
    /// Captures the state at the very beginning of the provided stage.
    #[must_use]
    pub fn stage_start(index: StageIndex, stage: &Stage) -> Self {
        let change_interval = stage
            .world(WorldIndex::FIRST)
            .map_or(ChangeInterval::MIN, World::change_interval);
        Self {
            stage: index,
            world: WorldIndex::FIRST,
            player: stage.start(),
            move_count: 0,
            change_interval,
            stuck: false,
            cleared: false,
        }
    }

    /// Derives the coarse session status; clearing takes precedence over being stuck.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if self.cleared {
            SessionStatus::Cleared
        } else if self.stuck {
            SessionStatus::Stuck
        } else {
            SessionStatus::Idle
        }
    }
}

/// Reasons a move request may be rejected by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum InvalidMove {
    /// The target cell lies outside the grid.
    #[error("the move leaves the maze")]
    OutOfBounds,
    /// The target cell is a wall.
    #[error("a wall blocks the way")]
    Wall,
    /// The target is a start cell outside the first stage.
    #[error("the start cell cannot be re-entered in this stage")]
    StartForbidden,
    /// The session is stuck or cleared and accepts no moves.
    #[error("the session does not accept moves right now")]
    Blocked,
}

/// Switch interval modifications caused by entering special tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileEffect {
    /// A plus tile lengthened the interval by one move.
    IntervalIncreased,
    /// A minus tile shortened the interval by one move.
    IntervalDecreased,
    /// A minus tile was entered while the interval was already at its minimum.
    IntervalAtMinimum,
}

/// Number of stages the player may choose from, counted from the first stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnlockProgress {
    #[serde(default = "UnlockProgress::initial_stage_count")]
    unlocked_stage: usize,
}

impl UnlockProgress {
    /// Creates progress with `unlocked_stage` stages available, never fewer than one.
    #[must_use]
    pub const fn new(unlocked_stage: usize) -> Self {
        let unlocked_stage = if unlocked_stage == 0 { 1 } else { unlocked_stage };
        Self { unlocked_stage }
    }

    const fn initial_stage_count() -> usize {
        1
    }

    /// Number of stages that are unlocked.
    #[must_use]
    pub const fn unlocked_stage(&self) -> usize {
        self.unlocked_stage
    }

    /// Reports whether the stage may be selected.
    #[must_use]
    pub const fn is_unlocked(&self, stage: StageIndex) -> bool {
        stage.get() < self.unlocked_stage
    }

    /// Unlocks the stage after `cleared`, capped at `stage_count`.
    ///
    /// Returns `true` when the number of unlocked stages grew.
    pub fn record_clear(&mut self, cleared: StageIndex, stage_count: usize) -> bool {
        let candidate = cleared.get().saturating_add(2).min(stage_count);
        if candidate > self.unlocked_stage {
            self.unlocked_stage = candidate;
            true
        } else {
            false
        }
    }
}

impl Default for UnlockProgress {
    fn default() -> Self {
        Self::new(Self::initial_stage_count())
    }
}
