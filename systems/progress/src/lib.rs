#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure progress system that unlocks stages as they are cleared.

use shifting_maze_core::{Event, UnlockProgress};

/// Folds stage clears into the number of unlocked stages.
#[derive(Clone, Copy, Debug, Default)]
pub struct Progress {
    progress: UnlockProgress,
}

impl Progress {
    /// Creates a progress system seeded with previously saved progress.
    #[must_use]
    pub const fn new(progress: UnlockProgress) -> Self {
        Self { progress }
    }

    /// Progress accumulated so far.
    #[must_use]
    pub const fn progress(&self) -> UnlockProgress {
        self.progress
    }

    /// Consumes session events and announces newly unlocked stages.
    ///
    /// At most one [`Event::StagesUnlocked`] is emitted per call, carrying the
    /// final count after every clear in `events` has been applied.
    pub fn handle(&mut self, events: &[Event], stage_count: usize, out: &mut Vec<Event>) {
        let mut unlocked = false;
        for event in events {
            if let Event::StageCleared { stage } = event {
                unlocked |= self.progress.record_clear(*stage, stage_count);
            }
        }

        if unlocked {
            out.push(Event::StagesUnlocked {
                unlocked_stage: self.progress.unlocked_stage(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shifting_maze_core::StageIndex;

    #[test]
    fn defaults_to_first_stage_only() {
        let progress = Progress::default();
        assert_eq!(progress.progress().unlocked_stage(), 1);
    }

    #[test]
    fn multiple_clears_emit_single_announcement() {
        let mut progress = Progress::default();
        let mut out = Vec::new();

        progress.handle(
            &[
                Event::StageCleared {
                    stage: StageIndex::FIRST,
                },
                Event::StageCleared {
                    stage: StageIndex::new(1),
                },
            ],
            5,
            &mut out,
        );

        assert_eq!(out, vec![Event::StagesUnlocked { unlocked_stage: 3 }]);
    }
}
