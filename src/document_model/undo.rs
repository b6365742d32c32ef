use super::document::{Document, DocumentSnapshot};
use super::selection::Selection;
use std::collections::VecDeque;

pub const DEFAULT_UNDO_LEVELS: usize = 1000;

/// Document state captured immediately before one logical edit.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub snapshot: DocumentSnapshot,
    pub cursor_before: usize,
    pub selection_before: Option<Selection>,
}

impl UndoEntry {
    pub fn capture(document: &Document, cursor: usize, selection: Option<Selection>) -> Self {
        Self {
            snapshot: document.snapshot(),
            cursor_before: cursor,
            selection_before: selection,
        }
    }
}

/// Bounded stack of checkpoints. There is no redo.
#[derive(Debug, Clone)]
pub struct UndoManager {
    undo_stack: VecDeque<UndoEntry>,
    max_undo_levels: usize,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::with_levels(DEFAULT_UNDO_LEVELS)
    }

    pub fn with_levels(max_undo_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            max_undo_levels: max_undo_levels.max(1),
        }
    }

    pub fn push(&mut self, entry: UndoEntry) {
        self.undo_stack.push_back(entry);

        // Limit the undo stack size
        if self.undo_stack.len() > self.max_undo_levels {
            self.undo_stack.pop_front();
        }
    }

    pub fn undo(&mut self) -> Option<UndoEntry> {
        self.undo_stack.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_undo_levels
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}
