use super::edit_controller::EditController;
use crate::document_model::Selection;

impl EditController {
    // Cursor motion - kept apart from edit_controller.rs so that file stays about edits.
    // With `extend` the selection grows from its anchor; without it the selection collapses.

    pub fn move_left(&mut self, extend: bool) {
        let target = self.cursor.saturating_sub(1);
        self.move_to(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let target = (self.cursor + 1).min(self.document.len());
        self.move_to(target, extend);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        let chars = self.raw_chars();
        let (start, _) = line_bounds(&chars, self.cursor);
        self.move_to(start, extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let chars = self.raw_chars();
        let (_, end) = line_bounds(&chars, self.cursor);
        self.move_to(end, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let chars = self.raw_chars();
        let (start, _) = line_bounds(&chars, self.cursor);
        let target = if start == 0 {
            0
        } else {
            let column = self.cursor - start;
            let prev_end = start - 1;
            let (prev_start, _) = line_bounds(&chars, prev_end);
            prev_start + column.min(prev_end - prev_start)
        };
        self.move_to(target, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let chars = self.raw_chars();
        let (start, end) = line_bounds(&chars, self.cursor);
        let target = if end >= chars.len() {
            chars.len()
        } else {
            let column = self.cursor - start;
            let next_start = end + 1;
            let (_, next_end) = line_bounds(&chars, next_start);
            next_start + column.min(next_end - next_start)
        };
        self.move_to(target, extend);
    }

    pub fn select_all(&mut self) {
        let len = self.document.len();
        self.set_selection(0, len);
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        let target = target.min(self.document.len());
        if extend {
            let anchor = self.selection.map_or(self.cursor, |s| s.anchor);
            self.selection = Some(Selection::new(anchor, target)).filter(|s| !s.is_empty());
        } else {
            self.selection = None;
        }
        self.cursor = target;
    }

    fn raw_chars(&self) -> Vec<char> {
        self.document.chars().map(|(ch, _)| ch).collect()
    }
}

/// Start and end (exclusive of the newline) of the line holding `pos`.
pub fn line_bounds(chars: &[char], pos: usize) -> (usize, usize) {
    let pos = pos.min(chars.len());
    let start = chars[..pos]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let end = chars[pos..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |i| pos + i);
    (start, end)
}
