use crate::document_model::{
    Document, DocumentError, RenderSpan, Selection, UndoEntry, UndoManager,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum EditError {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("cannot track a {0}-character insertion; turn track changes off to paste")]
    TrackedPasteUnsupported(usize),
}

pub type EditResult<T> = Result<T, EditError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteKind {
    Backspace,
    Forward,
}

impl DeleteKind {
    fn label(self) -> &'static str {
        match self {
            DeleteKind::Backspace => "backspace",
            DeleteKind::Forward => "delete",
        }
    }
}

/// Turns editing events into document operations.
///
/// Owns the document together with cursor, selection, the track-changes
/// flag and the undo history. Every event runs to completion: one document
/// mutation, an overlay rebuild and one undo checkpoint.
pub struct EditController {
    pub(super) document: Document,
    pub(super) cursor: usize,
    pub(super) selection: Option<Selection>,
    track_changes: bool,
    undo_manager: UndoManager,
}

impl EditController {
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            cursor: 0,
            selection: None,
            track_changes: false,
            undo_manager: UndoManager::new(),
        }
    }

    pub fn with_undo_levels(mut self, levels: usize) -> Self {
        self.undo_manager = UndoManager::with_levels(levels);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.document.len());
    }

    /// Ordered `[start, end)` of the active selection.
    pub fn get_selection(&self) -> Option<(usize, usize)> {
        self.selection.map(|s| s.range())
    }

    /// Select from `anchor` to `head`; the cursor follows `head`.
    /// An empty range clears the selection.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let selection = Selection::new(anchor, head).clamped(self.document.len());
        self.cursor = selection.head;
        self.selection = Some(selection).filter(|s| !s.is_empty());
    }

    pub fn track_changes_enabled(&self) -> bool {
        self.track_changes
    }

    pub fn set_track_changes(&mut self, enabled: bool) {
        self.track_changes = enabled;
    }

    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    pub fn render_spans(&self) -> Vec<RenderSpan> {
        self.document.render_spans()
    }

    pub fn on_key_char(&mut self, ch: char) -> EditResult<()> {
        self.apply_edit("insert", |this| {
            if this.track_changes {
                if let Some(cursor) = this.document.replace_tracked_selection(&mut this.selection)? {
                    this.cursor = cursor;
                }
                this.cursor = this.document.insert_tracked(this.cursor, ch)?;
            } else {
                this.remove_selection_plain()?;
                let mut buf = [0u8; 4];
                this.cursor = this
                    .document
                    .insert_plain(this.cursor, ch.encode_utf8(&mut buf))?;
            }
            Ok(true)
        })
    }

    pub fn on_delete_key(&mut self) -> EditResult<()> {
        self.on_deletion(DeleteKind::Forward)
    }

    pub fn on_backspace_key(&mut self) -> EditResult<()> {
        self.on_deletion(DeleteKind::Backspace)
    }

    /// Flip track changes. Tags already in the document are left alone.
    pub fn on_toggle_track_changes(&mut self) -> bool {
        self.track_changes = !self.track_changes;
        info!(enabled = self.track_changes, "track changes toggled");
        self.track_changes
    }

    /// Restore the latest checkpoint. Returns `false` when history is empty.
    pub fn on_undo_requested(&mut self) -> bool {
        match self.undo_manager.undo() {
            Some(entry) => {
                self.rollback(entry);
                debug!(cursor = self.cursor, "undo");
                true
            }
            None => {
                debug!("nothing to undo");
                false
            }
        }
    }

    /// Insert clipboard text.
    ///
    /// Untracked pastes replace the selection like typing does. While
    /// tracking, only single characters are accepted; longer text is
    /// rejected without touching the document.
    pub fn on_paste(&mut self, text: &str) -> EditResult<()> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(()),
            (Some(ch), None) => self.on_key_char(ch),
            _ if self.track_changes => {
                let len = text.chars().count();
                warn!(len, "tracked paste rejected");
                Err(EditError::TrackedPasteUnsupported(len))
            }
            _ => self.apply_edit("paste", |this| {
                this.remove_selection_plain()?;
                this.cursor = this.document.insert_plain(this.cursor, text)?;
                Ok(true)
            }),
        }
    }

    fn on_deletion(&mut self, kind: DeleteKind) -> EditResult<()> {
        self.apply_edit(kind.label(), |this| {
            if this.track_changes {
                this.track_deletion(kind)
            } else {
                this.plain_deletion(kind)
            }
        })
    }

    fn track_deletion(&mut self, kind: DeleteKind) -> EditResult<bool> {
        if let Some(cursor) = self.document.replace_tracked_selection(&mut self.selection)? {
            self.cursor = cursor;
            return Ok(true);
        }

        let Some((start, end)) = self.deletion_window(kind) else {
            return Ok(false);
        };
        let start = self.document.mark_range_deleted(start, end)?;
        // The tombstone stays in place, so a forward delete steps over it.
        self.cursor = match kind {
            DeleteKind::Backspace => start,
            DeleteKind::Forward => end,
        };
        Ok(true)
    }

    fn plain_deletion(&mut self, kind: DeleteKind) -> EditResult<bool> {
        if self.remove_selection_plain()? {
            return Ok(true);
        }

        let Some((start, end)) = self.deletion_window(kind) else {
            return Ok(false);
        };
        self.document.delete_range_plain(start, end)?;
        self.cursor = start;
        Ok(true)
    }

    fn deletion_window(&self, kind: DeleteKind) -> Option<(usize, usize)> {
        match kind {
            DeleteKind::Backspace => (self.cursor > 0).then(|| (self.cursor - 1, self.cursor)),
            DeleteKind::Forward => {
                (self.cursor < self.document.len()).then(|| (self.cursor, self.cursor + 1))
            }
        }
    }

    fn remove_selection_plain(&mut self) -> EditResult<bool> {
        let Some(selection) = self.selection.take().filter(|s| !s.is_empty()) else {
            return Ok(false);
        };
        let (start, end) = selection.range();
        self.document.delete_range_plain(start, end)?;
        self.cursor = start;
        Ok(true)
    }

    /// Run one logical edit atomically.
    ///
    /// `edit` returns whether it changed anything. Changes get an overlay
    /// rebuild and an undo checkpoint; a failure rolls the document back.
    fn apply_edit<F>(&mut self, label: &'static str, edit: F) -> EditResult<()>
    where
        F: FnOnce(&mut Self) -> EditResult<bool>,
    {
        self.clamp_positions();
        let checkpoint = UndoEntry::capture(&self.document, self.cursor, self.selection);

        match edit(self) {
            Ok(true) => {
                self.document.recompute_overlay();
                self.undo_manager.push(checkpoint);
                debug!(
                    label,
                    cursor = self.cursor,
                    track = self.track_changes,
                    len = self.document.len(),
                    "edit applied"
                );
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(err) => {
                warn!(label, %err, "edit failed, rolling back");
                self.rollback(checkpoint);
                Err(err)
            }
        }
    }

    fn rollback(&mut self, entry: UndoEntry) {
        self.document.restore(entry.snapshot);
        let len = self.document.len();
        self.cursor = entry.cursor_before.min(len);
        self.selection = entry
            .selection_before
            .map(|s| s.clamped(len))
            .filter(|s| !s.is_empty());
    }

    fn clamp_positions(&mut self) {
        let len = self.document.len();
        self.cursor = self.cursor.min(len);
        self.selection = self
            .selection
            .map(|s| s.clamped(len))
            .filter(|s| !s.is_empty());
    }
}

impl Default for EditController {
    fn default() -> Self {
        Self::new()
    }
}
