use shifting_maze_core::{
    ChangeInterval, Command, Direction, Event, GridSize, MazeGrid, Stage, StageIndex,
    UnlockProgress, World,
};
use shifting_maze_session::{self as session, query, Session};
use shifting_maze_system_progress::Progress;

fn goal_stage(name: &str) -> Stage {
    let grid = MazeGrid::from_symbol_rows(GridSize::new(3, 1), ["SG0"]).expect("layout fits");
    Stage::new(name, vec![World::new(grid, ChangeInterval::MIN)]).expect("stage is valid")
}

fn clear_stage(session: &mut Session, stage: StageIndex) -> Vec<Event> {
    let mut events = Vec::new();
    session::apply(session, Command::Reset { stage }, &mut events);
    session::apply(
        session,
        Command::Move {
            direction: Direction::East,
        },
        &mut events,
    );
    events
}

#[test]
fn clearing_a_stage_unlocks_the_next_one() {
    let mut session = Session::new(vec![goal_stage("a"), goal_stage("b"), goal_stage("c")])
        .expect("catalog has stages");
    let mut progress = Progress::default();
    let mut out = Vec::new();

    let events = clear_stage(&mut session, StageIndex::FIRST);
    progress.handle(&events, query::stage_count(&session), &mut out);

    assert_eq!(out, vec![Event::StagesUnlocked { unlocked_stage: 2 }]);
    assert!(progress.progress().is_unlocked(StageIndex::new(1)));
    assert!(!progress.progress().is_unlocked(StageIndex::new(2)));
}

#[test]
fn replaying_an_earlier_stage_keeps_progress() {
    let mut session = Session::new(vec![goal_stage("a"), goal_stage("b"), goal_stage("c")])
        .expect("catalog has stages");
    let mut progress = Progress::new(UnlockProgress::new(3));
    let mut out = Vec::new();

    let events = clear_stage(&mut session, StageIndex::FIRST);
    progress.handle(&events, query::stage_count(&session), &mut out);

    assert!(out.is_empty(), "no announcement when nothing new unlocks");
    assert_eq!(progress.progress().unlocked_stage(), 3);
}

#[test]
fn final_stage_clear_is_capped_at_stage_count() {
    let mut session =
        Session::new(vec![goal_stage("a"), goal_stage("b")]).expect("catalog has stages");
    let mut progress = Progress::new(UnlockProgress::new(2));
    let mut out = Vec::new();

    let events = clear_stage(&mut session, StageIndex::new(1));
    assert!(events.contains(&Event::StageCleared {
        stage: StageIndex::new(1)
    }));
    progress.handle(&events, query::stage_count(&session), &mut out);

    assert!(out.is_empty());
    assert_eq!(progress.progress().unlocked_stage(), 2);
}
