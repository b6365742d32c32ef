use super::overlay::BracketOverlay;
use super::selection::Selection;
use super::span_table::{EditState, SpanTable};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("invalid range {start}..{end} for document of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// A maximal run of characters that render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpan {
    pub text: String,
    pub state: EditState,
    pub bracketed: bool,
}

/// Opaque copy of the tagged text, used as an undo checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    text_buffer: SpanTable,
}

/// Tracked-change document: characters tagged with an [`EditState`], plus
/// the derived bracket overlay.
///
/// Edit operations never touch the overlay; callers rebuild it with
/// [`Document::recompute_overlay`] once a mutation is complete.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text_buffer: SpanTable,
    overlay: BracketOverlay,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document seeded with untracked content.
    pub fn from_text(text: &str) -> Self {
        let mut document = Self {
            text_buffer: SpanTable::from_string(text, EditState::Plain),
            overlay: BracketOverlay::new(),
        };
        document.recompute_overlay();
        document
    }

    /// Raw length in chars, deleted characters included.
    pub fn len(&self) -> usize {
        self.text_buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text_buffer.is_empty()
    }

    fn check_range(&self, start: usize, end: usize) -> DocumentResult<()> {
        if start > end || end > self.len() {
            return Err(DocumentError::InvalidRange {
                start,
                end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Insert untracked text. Returns the position just past it.
    pub fn insert_plain(&mut self, pos: usize, text: &str) -> DocumentResult<usize> {
        self.check_range(pos, pos)?;
        self.text_buffer.insert(pos, text, EditState::Plain);
        trace!(pos, len = text.chars().count(), "insert plain");
        Ok(pos + text.chars().count())
    }

    /// Insert one character tagged `Added`. Returns the position just past it.
    pub fn insert_tracked(&mut self, pos: usize, ch: char) -> DocumentResult<usize> {
        self.check_range(pos, pos)?;
        let mut buf = [0u8; 4];
        self.text_buffer
            .insert(pos, ch.encode_utf8(&mut buf), EditState::Added);
        trace!(pos, %ch, "insert tracked");
        Ok(pos + 1)
    }

    /// Remove `[start, end)` outright. Returns the removed text.
    pub fn delete_range_plain(&mut self, start: usize, end: usize) -> DocumentResult<String> {
        self.check_range(start, end)?;
        trace!(start, end, "delete plain");
        Ok(self.text_buffer.remove(start, end))
    }

    /// Tombstone `[start, end)`: the characters stay, tagged `Deleted`.
    /// Returns `start`, the edit cursor after the operation.
    pub fn mark_range_deleted(&mut self, start: usize, end: usize) -> DocumentResult<usize> {
        self.check_range(start, end)?;
        self.text_buffer.set_state(start, end, EditState::Deleted);
        trace!(start, end, "mark deleted");
        Ok(start)
    }

    /// Tombstone the selected range and clear the selection.
    ///
    /// Returns the collapsed cursor, or `None` if nothing was selected.
    pub fn replace_tracked_selection(
        &mut self,
        selection: &mut Option<Selection>,
    ) -> DocumentResult<Option<usize>> {
        let Some(active) = selection.filter(|s| !s.is_empty()) else {
            *selection = None;
            return Ok(None);
        };

        let (start, end) = active.range();
        let cursor = self.mark_range_deleted(start, end)?;
        *selection = None;
        Ok(Some(cursor))
    }

    /// Content as an observer reads it: everything not tagged `Deleted`.
    pub fn live_text(&self) -> String {
        self.text_buffer.live_text()
    }

    /// Every character, tombstones included.
    pub fn raw_text(&self) -> String {
        self.text_buffer.get_text()
    }

    pub fn recompute_overlay(&mut self) {
        let raw: Vec<char> = self.text_buffer.chars().map(|(ch, _)| ch).collect();
        self.overlay.recompute(&raw);
    }

    pub fn overlay(&self) -> &BracketOverlay {
        &self.overlay
    }

    pub fn is_bracketed(&self, pos: usize) -> bool {
        pos < self.len() && self.overlay.contains(pos)
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.text_buffer.char_at(pos).map(|(ch, _)| ch)
    }

    pub fn state_at(&self, pos: usize) -> Option<EditState> {
        self.text_buffer.char_at(pos).map(|(_, state)| state)
    }

    /// Characters with their edit state, in order.
    pub fn chars(&self) -> impl Iterator<Item = (char, EditState)> + '_ {
        self.text_buffer.chars()
    }

    /// Group characters into runs of equal edit state and overlay mark.
    pub fn render_spans(&self) -> Vec<RenderSpan> {
        let mut result: Vec<RenderSpan> = Vec::new();

        for (pos, (ch, state)) in self.text_buffer.chars().enumerate() {
            let bracketed = self.overlay.contains(pos);
            match result.last_mut() {
                Some(run) if run.state == state && run.bracketed == bracketed => run.text.push(ch),
                _ => result.push(RenderSpan {
                    text: ch.to_string(),
                    state,
                    bracketed,
                }),
            }
        }

        result
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            text_buffer: self.text_buffer.clone(),
        }
    }

    /// Roll back to `snapshot`; the overlay is rebuilt from the restored text.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.text_buffer = snapshot.text_buffer;
        self.recompute_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn states(document: &Document) -> Vec<EditState> {
        document.chars().map(|(_, state)| state).collect()
    }

    #[test]
    fn test_insert_plain_and_tracked() {
        let mut doc = Document::from_text("ace");
        assert_eq!(doc.insert_tracked(1, 'b'), Ok(2));
        assert_eq!(doc.insert_plain(3, "d"), Ok(4));
        assert_eq!(doc.raw_text(), "abcde");
        assert_eq!(
            states(&doc),
            vec![
                EditState::Plain,
                EditState::Added,
                EditState::Plain,
                EditState::Plain,
                EditState::Plain,
            ]
        );
    }

    #[test]
    fn test_out_of_range_positions_fail() {
        let mut doc = Document::from_text("abc");
        assert_eq!(
            doc.insert_plain(4, "x"),
            Err(DocumentError::InvalidRange {
                start: 4,
                end: 4,
                len: 3
            })
        );
        assert!(doc.insert_tracked(9, 'x').is_err());
        assert!(doc.delete_range_plain(2, 5).is_err());
        assert!(doc.mark_range_deleted(2, 1).is_err());
        assert_eq!(doc.raw_text(), "abc");
    }

    #[test]
    fn test_mark_range_deleted_keeps_characters() {
        let mut doc = Document::from_text("hello world");
        assert_eq!(doc.mark_range_deleted(5, 11), Ok(5));
        assert_eq!(doc.raw_text(), "hello world");
        assert_eq!(doc.live_text(), "hello");
        assert_eq!(doc.state_at(5), Some(EditState::Deleted));
        assert_eq!(doc.state_at(4), Some(EditState::Plain));
    }

    #[test]
    fn test_deleting_added_text_tombstones_it() {
        let mut doc = Document::new();
        doc.insert_tracked(0, 'x').unwrap();
        doc.mark_range_deleted(0, 1).unwrap();
        assert_eq!(doc.state_at(0), Some(EditState::Deleted));
        assert_eq!(doc.live_text(), "");
    }

    #[test]
    fn test_delete_range_plain_removes() {
        let mut doc = Document::from_text("abcdef");
        assert_eq!(doc.delete_range_plain(1, 3).unwrap(), "bc");
        assert_eq!(doc.raw_text(), "adef");
    }

    #[test]
    fn test_replace_tracked_selection_clears_selection() {
        let mut doc = Document::from_text("abcdef");
        let mut selection = Some(Selection::new(4, 1));
        assert_eq!(doc.replace_tracked_selection(&mut selection), Ok(Some(1)));
        assert_eq!(selection, None);
        assert_eq!(doc.live_text(), "aef");
        assert_eq!(doc.raw_text(), "abcdef");
    }

    #[test]
    fn test_replace_tracked_selection_without_selection() {
        let mut doc = Document::from_text("abc");
        let mut selection = Some(Selection::new(2, 2));
        assert_eq!(doc.replace_tracked_selection(&mut selection), Ok(None));
        assert_eq!(selection, None);
        assert_eq!(doc.live_text(), "abc");
    }

    #[test]
    fn test_overlay_counts_deleted_characters() {
        let mut doc = Document::from_text("a(b)c");
        doc.mark_range_deleted(1, 2).unwrap();
        doc.recompute_overlay();
        assert!(doc.is_bracketed(1));
        assert!(doc.is_bracketed(3));
        assert!(!doc.is_bracketed(4));
    }

    #[test]
    fn test_overlay_nested_example() {
        let doc = Document::from_text("a(b(c)d)e");
        let marked: String = doc
            .raw_text()
            .chars()
            .enumerate()
            .filter(|(i, _)| doc.is_bracketed(*i))
            .map(|(_, c)| c)
            .collect();
        assert_eq!(marked, "(b(c)");
        assert!(!doc.is_bracketed(7));
    }

    #[test]
    fn test_render_spans_split_on_state_and_overlay() {
        let mut doc = Document::from_text("x (ab) y");
        doc.insert_tracked(8, 'z').unwrap();
        doc.mark_range_deleted(0, 1).unwrap();
        doc.recompute_overlay();

        let spans = doc.render_spans();
        let summary: Vec<(&str, EditState, bool)> = spans
            .iter()
            .map(|s| (s.text.as_str(), s.state, s.bracketed))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("x", EditState::Deleted, false),
                (" ", EditState::Plain, false),
                ("(ab)", EditState::Plain, true),
                (" y", EditState::Plain, false),
                ("z", EditState::Added, false),
            ]
        );
    }

    #[test]
    fn test_snapshot_restore() {
        let mut doc = Document::from_text("(a)");
        let snapshot = doc.snapshot();
        doc.insert_tracked(0, 'q').unwrap();
        doc.mark_range_deleted(1, 4).unwrap();
        doc.recompute_overlay();

        doc.restore(snapshot);
        assert_eq!(doc.raw_text(), "(a)");
        assert!(states(&doc).iter().all(|s| *s == EditState::Plain));
        assert!(doc.is_bracketed(0));
    }

    #[derive(Debug, Clone)]
    enum Operation {
        InsertTracked { pos: usize, ch: char },
        InsertPlain { pos: usize, text: String },
        MarkDeleted { start: usize, len: usize },
        DeletePlain { start: usize, len: usize },
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        "[a-c() ]{0,12}"
    }

    fn operation_strategy() -> impl Strategy<Value = Vec<Operation>> {
        prop::collection::vec(
            prop_oneof![
                (0usize..40, prop::char::range('a', 'e'))
                    .prop_map(|(pos, ch)| Operation::InsertTracked { pos, ch }),
                (0usize..40, text_strategy())
                    .prop_map(|(pos, text)| Operation::InsertPlain { pos, text }),
                (0usize..40, 0usize..6)
                    .prop_map(|(start, len)| Operation::MarkDeleted { start, len }),
                (0usize..40, 0usize..6)
                    .prop_map(|(start, len)| Operation::DeletePlain { start, len }),
            ],
            0..30,
        )
    }

    fn apply(doc: &mut Document, op: &Operation) {
        let len = doc.len();
        match op {
            Operation::InsertTracked { pos, ch } => {
                doc.insert_tracked((*pos).min(len), *ch).unwrap();
            }
            Operation::InsertPlain { pos, text } => {
                doc.insert_plain((*pos).min(len), text).unwrap();
            }
            Operation::MarkDeleted { start, len: n } => {
                let start = (*start).min(len);
                doc.mark_range_deleted(start, (start + n).min(len)).unwrap();
            }
            Operation::DeletePlain { start, len: n } => {
                let start = (*start).min(len);
                doc.delete_range_plain(start, (start + n).min(len)).unwrap();
            }
        }
        doc.recompute_overlay();
    }

    proptest! {
        #[test]
        fn prop_live_text_is_non_deleted_chars(
            seed in text_strategy(),
            ops in operation_strategy()
        ) {
            let mut doc = Document::from_text(&seed);
            for op in &ops {
                apply(&mut doc, op);
            }
            let expected: String = doc
                .chars()
                .filter(|(_, state)| *state != EditState::Deleted)
                .map(|(ch, _)| ch)
                .collect();
            prop_assert_eq!(doc.live_text(), expected);
        }

        #[test]
        fn prop_insert_tracked_touches_only_new_char(
            seed in text_strategy(),
            ops in operation_strategy(),
            pos in 0usize..60,
            ch in prop::char::range('a', 'z')
        ) {
            let mut doc = Document::from_text(&seed);
            for op in &ops {
                apply(&mut doc, op);
            }
            let pos = pos.min(doc.len());
            let mut before = states(&doc);
            doc.insert_tracked(pos, ch).unwrap();
            before.insert(pos, EditState::Added);
            prop_assert_eq!(states(&doc), before);
            prop_assert_eq!(doc.char_at(pos), Some(ch));
        }

        #[test]
        fn prop_mark_deleted_preserves_raw_text(
            seed in text_strategy(),
            ops in operation_strategy(),
            start in 0usize..60,
            n in 0usize..10
        ) {
            let mut doc = Document::from_text(&seed);
            for op in &ops {
                apply(&mut doc, op);
            }
            let raw = doc.raw_text();
            let start = start.min(doc.len());
            let end = (start + n).min(doc.len());
            doc.mark_range_deleted(start, end).unwrap();
            prop_assert_eq!(doc.raw_text(), raw);
            prop_assert!((start..end).all(|i| doc.state_at(i) == Some(EditState::Deleted)));
        }

        #[test]
        fn prop_recompute_overlay_is_idempotent(
            seed in text_strategy(),
            ops in operation_strategy()
        ) {
            let mut doc = Document::from_text(&seed);
            for op in &ops {
                apply(&mut doc, op);
            }
            let first = doc.overlay().clone();
            doc.recompute_overlay();
            prop_assert_eq!(doc.overlay(), &first);
        }
    }
}
