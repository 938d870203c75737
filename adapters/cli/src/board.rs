use shifting_maze_core::{Cell, CellCoord, SessionStatus};
use shifting_maze_session::{query, Session};

const PLAYER_GLYPH: char = '@';

/// Glyph used to draw a cell on the terminal board.
#[must_use]
pub(crate) const fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Wall => '#',
        Cell::Floor => '.',
        Cell::Start => 'S',
        Cell::Goal => 'G',
        Cell::PlusTile => '+',
        Cell::MinusTile => '-',
    }
}

/// Draws the active world with the player marker, one line per row.
#[must_use]
pub(crate) fn render_board(session: &Session) -> String {
    let grid = query::active_grid(session);
    let player = query::player(session);
    let mut board = String::new();

    for (row, cells) in (0u32..).zip(grid.rows()) {
        for (column, cell) in (0u32..).zip(cells) {
            if CellCoord::new(column, row) == player {
                board.push(PLAYER_GLYPH);
            } else {
                board.push(glyph(*cell));
            }
        }
        board.push('\n');
    }

    board
}

/// Summarises stage, world and move budget on a single line.
#[must_use]
pub(crate) fn status_line(session: &Session) -> String {
    let snapshot = query::snapshot(session);
    let interval = snapshot.change_interval.get();
    let mut line = format!(
        "{} | world {}/{} | moves {}/{}",
        query::stage_name(session),
        snapshot.world.get() + 1,
        query::world_count(session),
        snapshot.move_count,
        interval,
    );

    match snapshot.status() {
        SessionStatus::Idle => {
            let remaining = interval.saturating_sub(snapshot.move_count);
            line.push_str(&format!(" | next shift in {remaining}"));
        }
        SessionStatus::Stuck => line.push_str(" | STUCK: undo (u) or redo (y)"),
        SessionStatus::Cleared => line.push_str(" | CLEARED"),
    }

    line
}
