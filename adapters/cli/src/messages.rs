use shifting_maze_core::{Event, HistoryAction, InvalidMove, TileEffect};
use shifting_maze_session::{query, Session};

/// Describes an event for the player, or `None` when the board says enough.
pub(crate) fn describe(event: &Event, session: &Session) -> Option<String> {
    let message = match *event {
        Event::MoveApplied { .. } | Event::StageReset { .. } => return None,
        Event::MoveRejected { reason, .. } => match reason {
            InvalidMove::OutOfBounds | InvalidMove::Wall => "You cannot go that way.".to_owned(),
            InvalidMove::StartForbidden => "You cannot return to the start.".to_owned(),
            InvalidMove::Blocked if query::is_cleared(session) => {
                "The stage is cleared. Pick another with `stage N` or restart with `r`.".to_owned()
            }
            InvalidMove::Blocked => {
                "You are buried in a wall and cannot move. Use undo or redo.".to_owned()
            }
        },
        Event::TileEffect {
            effect,
            change_interval,
        } => match effect {
            TileEffect::IntervalIncreased => format!(
                "Plus tile! The world now shifts every {} moves.",
                change_interval.get()
            ),
            TileEffect::IntervalDecreased => format!(
                "Minus tile! The world now shifts every {} moves.",
                change_interval.get()
            ),
            TileEffect::IntervalAtMinimum => {
                "Minus tile, but the shift interval cannot get any shorter.".to_owned()
            }
        },
        Event::WorldSwitched {
            world,
            became_stuck,
        } => {
            let mut message = format!(
                "The world shifted. {}, world {}.",
                query::stage_name(session),
                world.get() + 1
            );
            if became_stuck {
                message.push_str(" You are buried in a wall; undo or redo to escape.");
            }
            message
        }
        Event::StageCleared { stage } => {
            let name = query::stages(session)
                .get(stage.get())
                .map_or("the stage", |definition| definition.name());
            format!("Goal reached! You cleared {name}.")
        }
        Event::HistoryRestored { action, snapshot } => {
            let label = match action {
                HistoryAction::Undo => "Undo",
                HistoryAction::Redo => "Redo",
            };
            format!(
                "{label}: world {}, player at ({}, {}).",
                snapshot.world.get() + 1,
                snapshot.player.column(),
                snapshot.player.row()
            )
        }
        Event::ResetRejected { stage } => format!("Stage {} does not exist.", stage.get() + 1),
        Event::StagesUnlocked { unlocked_stage } => {
            format!("Stage {unlocked_stage} is now unlocked.")
        }
    };
    Some(message)
}
