#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Shifting Maze.
//!
//! A [`Session`] owns the stage catalog, the mutable player state and the
//! undo/redo history. Every mutation flows through [`apply`], which validates
//! the command, updates the state and reports the outcome as [`Event`] values.

mod history;
mod schedule;
mod tiles;

use shifting_maze_core::{
    Cell, CellCoord, Command, Direction, Event, HistoryAction, InvalidMove, SessionSnapshot,
    SessionStatus, Stage, StageIndex, World,
};
use tracing::{debug, info, warn};

use crate::history::History;

/// Errors raised while assembling a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The catalog handed to the session has no stages to play.
    #[error("the maze catalog contains no stages")]
    EmptyCatalog,
}

/// Represents the authoritative Shifting Maze session state.
#[derive(Clone, Debug)]
pub struct Session {
    stages: Vec<Stage>,
    state: SessionSnapshot,
    history: History,
}

impl Session {
    /// Creates a session positioned at the start of the first stage.
    pub fn new(stages: Vec<Stage>) -> Result<Self, SessionError> {
        let first = stages.first().ok_or(SessionError::EmptyCatalog)?;
        let state = SessionSnapshot::stage_start(StageIndex::FIRST, first);
        Ok(Self {
            stages,
            state,
            history: History::new(),
        })
    }

    // Stage indices are validated on reset and snapshots only originate from this session.
    fn active_stage(&self) -> &Stage {
        &self.stages[self.state.stage.get()]
    }

    fn active_world(&self) -> &World {
        &self.active_stage().worlds()[self.state.world.get()]
    }

    fn validate_move(&self, direction: Direction) -> Result<(CellCoord, Cell), InvalidMove> {
        if self.state.status() != SessionStatus::Idle {
            return Err(InvalidMove::Blocked);
        }

        let grid = self.active_world().grid();
        let target = direction
            .step(self.state.player, grid.size())
            .ok_or(InvalidMove::OutOfBounds)?;
        let cell = grid.cell(target).ok_or(InvalidMove::OutOfBounds)?;

        match cell {
            Cell::Wall => Err(InvalidMove::Wall),
            Cell::Start if self.state.stage != StageIndex::FIRST => {
                Err(InvalidMove::StartForbidden)
            }
            _ => Ok((target, cell)),
        }
    }

    fn attempt_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let (target, cell) = match self.validate_move(direction) {
            Ok(accepted) => accepted,
            Err(reason) => {
                debug!(?direction, %reason, "move rejected");
                out_events.push(Event::MoveRejected { direction, reason });
                return;
            }
        };

        self.history.record(self.state);
        let from = self.state.player;
        self.state.player = target;
        self.state.move_count = self.state.move_count.saturating_add(1);
        debug!(
            ?from,
            to = ?target,
            move_count = self.state.move_count,
            "move applied"
        );
        out_events.push(Event::MoveApplied {
            from,
            to: target,
            move_count: self.state.move_count,
        });

        if let Some(effect) = tiles::resolve(cell, &mut self.state.change_interval) {
            debug!(?effect, change_interval = self.state.change_interval.get(), "tile effect");
            out_events.push(Event::TileEffect {
                effect,
                change_interval: self.state.change_interval,
            });
        }

        if cell == Cell::Goal {
            self.state.cleared = true;
            info!(stage = self.active_stage().name(), "stage cleared");
            out_events.push(Event::StageCleared {
                stage: self.state.stage,
            });
            return;
        }

        if schedule::switch_due(&self.state) {
            let stage = &self.stages[self.state.stage.get()];
            let world = schedule::advance_world(&mut self.state, stage);
            let became_stuck = self.state.stuck;
            debug!(world = world.get(), became_stuck, "world switched");
            out_events.push(Event::WorldSwitched {
                world,
                became_stuck,
            });
        }
    }

    fn restore(&mut self, action: HistoryAction, out_events: &mut Vec<Event>) {
        let restored = match action {
            HistoryAction::Undo => self.history.undo(self.state),
            HistoryAction::Redo => self.history.redo(self.state),
        };
        let Some(snapshot) = restored else {
            debug!(?action, "history is empty");
            return;
        };

        self.state = snapshot;
        debug!(?action, ?snapshot, "history restored");
        out_events.push(Event::HistoryRestored { action, snapshot });
    }

    fn reset(&mut self, stage: StageIndex, out_events: &mut Vec<Event>) {
        let Some(definition) = self.stages.get(stage.get()) else {
            warn!(
                stage = stage.get(),
                stage_count = self.stages.len(),
                "reset targeted an unknown stage"
            );
            out_events.push(Event::ResetRejected { stage });
            return;
        };

        self.state = SessionSnapshot::stage_start(stage, definition);
        self.history.clear();
        debug!(stage = definition.name(), "stage reset");
        out_events.push(Event::StageReset { stage });
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { direction } => session.attempt_move(direction, out_events),
        Command::Undo => session.restore(HistoryAction::Undo, out_events),
        Command::Redo => session.restore(HistoryAction::Redo, out_events),
        Command::Reset { stage } => session.reset(stage, out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use shifting_maze_core::{
        Cell, CellCoord, ChangeInterval, MazeGrid, SessionSnapshot, SessionStatus, Stage,
        StageIndex, WorldIndex,
    };

    use super::Session;

    /// Captures every mutable session field as an immutable value.
    #[must_use]
    pub fn snapshot(session: &Session) -> SessionSnapshot {
        session.state
    }

    /// Coarse status of the session.
    #[must_use]
    pub fn status(session: &Session) -> SessionStatus {
        session.state.status()
    }

    /// All stages known to the session in catalog order.
    #[must_use]
    pub fn stages(session: &Session) -> &[Stage] {
        &session.stages
    }

    /// Number of stages in the catalog.
    #[must_use]
    pub fn stage_count(session: &Session) -> usize {
        session.stages.len()
    }

    /// Stage being played.
    #[must_use]
    pub fn stage_index(session: &Session) -> StageIndex {
        session.state.stage
    }

    /// Display name of the stage being played.
    #[must_use]
    pub fn stage_name(session: &Session) -> &str {
        session.active_stage().name()
    }

    /// World that is currently active within the stage.
    #[must_use]
    pub fn world_index(session: &Session) -> WorldIndex {
        session.state.world
    }

    /// Number of worlds the active stage cycles through.
    #[must_use]
    pub fn world_count(session: &Session) -> usize {
        session.active_stage().world_count()
    }

    /// Layout of the active world.
    #[must_use]
    pub fn active_grid(session: &Session) -> &MazeGrid {
        session.active_world().grid()
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player(session: &Session) -> CellCoord {
        session.state.player
    }

    /// Cell kind beneath the player in the active world.
    #[must_use]
    pub fn cell_under_player(session: &Session) -> Option<Cell> {
        session.active_world().grid().cell(session.state.player)
    }

    /// Accepted moves since the active world became active.
    #[must_use]
    pub fn move_count(session: &Session) -> u32 {
        session.state.move_count
    }

    /// Switch interval currently in force.
    #[must_use]
    pub fn change_interval(session: &Session) -> ChangeInterval {
        session.state.change_interval
    }

    /// Reports whether the player is trapped inside a wall.
    #[must_use]
    pub fn is_stuck(session: &Session) -> bool {
        session.state.stuck
    }

    /// Reports whether the stage goal was reached.
    #[must_use]
    pub fn is_cleared(session: &Session) -> bool {
        session.state.cleared
    }

    /// Number of states reachable through undo.
    #[must_use]
    pub fn undo_depth(session: &Session) -> usize {
        session.history.undo_depth()
    }

    /// Number of states reachable through redo.
    #[must_use]
    pub fn redo_depth(session: &Session) -> usize {
        session.history.redo_depth()
    }
}
