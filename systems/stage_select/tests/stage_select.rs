use shifting_maze_core::{Command, Event, StageIndex, UnlockProgress};
use shifting_maze_system_stage_select::{SelectionError, StageSelect, StageSelectInput};

#[test]
fn unlocked_choice_emits_reset_command() {
    let mut select = StageSelect::new(UnlockProgress::new(2), 3);
    let mut commands = Vec::new();

    let result = select.handle(
        &[],
        StageSelectInput::choose(StageIndex::new(1)),
        &mut commands,
    );

    assert_eq!(result, Ok(()));
    assert_eq!(
        commands,
        vec![Command::Reset {
            stage: StageIndex::new(1)
        }],
        "selecting an unlocked stage should restart it",
    );
}

#[test]
fn locked_choice_is_refused() {
    let mut select = StageSelect::new(UnlockProgress::default(), 3);
    let mut commands = Vec::new();

    let result = select.handle(
        &[],
        StageSelectInput::choose(StageIndex::new(2)),
        &mut commands,
    );

    assert_eq!(result, Err(SelectionError::Locked(StageIndex::new(2))));
    assert!(commands.is_empty(), "locked stages must not emit commands");
}

#[test]
fn unknown_choice_is_refused() {
    let mut select = StageSelect::new(UnlockProgress::new(9), 2);
    let mut commands = Vec::new();

    let result = select.handle(
        &[],
        StageSelectInput::choose(StageIndex::new(5)),
        &mut commands,
    );

    assert_eq!(result, Err(SelectionError::Unknown(StageIndex::new(5))));
    assert!(commands.is_empty());
}

#[test]
fn unlock_announcements_open_new_stages() {
    let mut select = StageSelect::new(UnlockProgress::default(), 3);
    let mut commands = Vec::new();

    let result = select.handle(
        &[Event::StagesUnlocked { unlocked_stage: 2 }],
        StageSelectInput::choose(StageIndex::new(1)),
        &mut commands,
    );

    assert_eq!(result, Ok(()));
    assert_eq!(
        commands,
        vec![Command::Reset {
            stage: StageIndex::new(1)
        }]
    );
}
