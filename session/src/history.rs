//! Undo/redo stacks of session snapshots.

use shifting_maze_core::SessionSnapshot;

/// Linear history of session states reachable through undo and redo.
#[derive(Clone, Debug, Default)]
pub(crate) struct History {
    undo: Vec<SessionSnapshot>,
    redo: Vec<SessionSnapshot>,
}

impl History {
    /// Creates an empty history.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Remembers the state preceding an accepted move and forgets any redo branch.
    pub(crate) fn record(&mut self, snapshot: SessionSnapshot) {
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Pops the latest undo entry, parking `current` on the redo stack.
    pub(crate) fn undo(&mut self, current: SessionSnapshot) -> Option<SessionSnapshot> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Pops the latest redo entry, parking `current` on the undo stack.
    pub(crate) fn redo(&mut self, current: SessionSnapshot) -> Option<SessionSnapshot> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
