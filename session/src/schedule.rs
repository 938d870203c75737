//! World transition scheduling.

use shifting_maze_core::{Cell, SessionSnapshot, Stage, WorldIndex};

/// Reports whether the accepted move exhausted the active switch interval.
pub(crate) fn switch_due(state: &SessionSnapshot) -> bool {
    !state.cleared && state.move_count >= state.change_interval.get()
}

/// Activates the next world of `stage` and re-evaluates whether the player is stuck.
///
/// The interval earned through tiles is discarded in favour of the new world's baseline.
pub(crate) fn advance_world(state: &mut SessionSnapshot, stage: &Stage) -> WorldIndex {
    let (index, world) = stage.next_world(state.world);
    state.move_count = 0;
    state.world = index;
    state.change_interval = world.change_interval();
    state.stuck = world.grid().cell(state.player).map_or(true, Cell::is_wall);
    index
}
