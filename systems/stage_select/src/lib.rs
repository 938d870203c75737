#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure stage selection system that only starts stages the player has unlocked.

use shifting_maze_core::{Command, Event, StageIndex, UnlockProgress};

/// Input snapshot distilled from adapter-provided selection data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageSelectInput {
    /// Stage the player picked on this frame, if any.
    pub chosen: Option<StageIndex>,
}

impl StageSelectInput {
    /// Creates an input descriptor selecting the provided stage.
    #[must_use]
    pub const fn choose(stage: StageIndex) -> Self {
        Self {
            chosen: Some(stage),
        }
    }
}

/// Reasons a stage choice cannot be honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The stage exists but has not been unlocked yet.
    #[error("stage {} is still locked", .0.get() + 1)]
    Locked(StageIndex),
    /// The catalog has no stage at the chosen position.
    #[error("stage {} does not exist", .0.get() + 1)]
    Unknown(StageIndex),
}

/// Entry describing one stage on the selection screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageEntry {
    /// Position of the stage in the catalog.
    pub stage: StageIndex,
    /// Indicates whether the stage may be chosen.
    pub unlocked: bool,
}

/// Stage selection system that translates choices into reset commands.
#[derive(Clone, Copy, Debug)]
pub struct StageSelect {
    progress: UnlockProgress,
    stage_count: usize,
}

impl StageSelect {
    /// Creates a selection system for a catalog of `stage_count` stages.
    #[must_use]
    pub const fn new(progress: UnlockProgress, stage_count: usize) -> Self {
        Self {
            progress,
            stage_count,
        }
    }

    /// Enumerates every stage together with its lock state.
    pub fn entries(&self) -> impl Iterator<Item = StageEntry> + '_ {
        (0..self.stage_count).map(|index| {
            let stage = StageIndex::new(index);
            StageEntry {
                stage,
                unlocked: self.progress.is_unlocked(stage),
            }
        })
    }

    /// Consumes session events and the player's choice to emit stage commands.
    ///
    /// Unlock announcements in `events` are honoured before the choice is checked.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: StageSelectInput,
        out: &mut Vec<Command>,
    ) -> Result<(), SelectionError> {
        for event in events {
            if let Event::StagesUnlocked { unlocked_stage } = event {
                self.progress = UnlockProgress::new(*unlocked_stage);
            }
        }

        let Some(stage) = input.chosen else {
            return Ok(());
        };

        if stage.get() >= self.stage_count {
            return Err(SelectionError::Unknown(stage));
        }
        if !self.progress.is_unlocked(stage) {
            return Err(SelectionError::Locked(stage));
        }

        out.push(Command::Reset { stage });
        Ok(())
    }
}
