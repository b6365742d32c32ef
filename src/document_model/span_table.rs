use std::fmt;

/// Edit-state tag carried by every character of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditState {
    #[default]
    Plain,
    Added,
    Deleted,
}

impl EditState {
    pub fn is_live(self) -> bool {
        self != EditState::Deleted
    }
}

/// A run of characters sharing one edit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    text: String,
    state: EditState,
    length: usize, // in chars
}

impl Span {
    pub fn new(text: impl Into<String>, state: EditState) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            text,
            state,
            length,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Split this span at a char offset, keeping the left half in place.
    fn split_off(&mut self, at: usize) -> Span {
        let byte = Self::byte_offset(&self.text, at);
        let right = self.text.split_off(byte);
        let right_len = self.length - at;
        self.length = at;
        Span {
            text: right,
            state: self.state,
            length: right_len,
        }
    }

    /// Byte offset of the `char_index`-th char, or the end of the string
    fn byte_offset(text: &str, char_index: usize) -> usize {
        text.char_indices()
            .nth(char_index)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    }
}

/// Ordered sequence of tagged spans, addressed by char position.
///
/// Adjacent spans with the same state are always coalesced, so two tables
/// holding the same per-character states compare equal regardless of the
/// edit history that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanTable {
    spans: Vec<Span>,
    total_length: usize,
}

impl SpanTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(text: &str, state: EditState) -> Self {
        let mut table = Self::new();
        table.insert(0, text, state);
        table
    }

    pub fn len(&self) -> usize {
        self.total_length
    }

    pub fn is_empty(&self) -> bool {
        self.total_length == 0
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Insert `text` at char `position` (clamped to the end).
    pub fn insert(&mut self, position: usize, text: &str, state: EditState) {
        if text.is_empty() {
            return;
        }

        let position = position.min(self.total_length);
        let index = self.split_at(position);
        let span = Span::new(text, state);
        self.total_length += span.len();
        self.spans.insert(index, span);
        self.coalesce();
    }

    /// Remove the chars in `[start, end)`.
    pub fn remove(&mut self, start: usize, end: usize) -> String {
        let end = end.min(self.total_length);
        if start >= end {
            return String::new();
        }

        let first = self.split_at(start);
        let last = self.split_at(end);
        let removed: String = self.spans.drain(first..last).map(|span| span.text).collect();

        self.total_length -= end - start;
        self.coalesce();
        removed
    }

    /// Retag the chars in `[start, end)` without touching their content.
    pub fn set_state(&mut self, start: usize, end: usize, state: EditState) {
        let end = end.min(self.total_length);
        if start >= end {
            return;
        }

        let first = self.split_at(start);
        let last = self.split_at(end);
        for span in &mut self.spans[first..last] {
            span.state = state;
        }
        self.coalesce();
    }

    pub fn get_text(&self) -> String {
        let mut result = String::with_capacity(self.total_length);
        for span in &self.spans {
            result.push_str(&span.text);
        }
        result
    }

    pub fn live_text(&self) -> String {
        self.spans
            .iter()
            .filter(|span| span.state.is_live())
            .map(|span| span.text.as_str())
            .collect()
    }

    pub fn char_at(&self, position: usize) -> Option<(char, EditState)> {
        let (index, offset) = self.locate(position)?;
        let span = &self.spans[index];
        span.text.chars().nth(offset).map(|ch| (ch, span.state))
    }

    /// Iterate every character with its state, in order.
    pub fn chars(&self) -> impl Iterator<Item = (char, EditState)> + '_ {
        self.spans
            .iter()
            .flat_map(|span| span.text.chars().map(move |ch| (ch, span.state)))
    }

    /// Span index and in-span offset of the char at `position`.
    fn locate(&self, position: usize) -> Option<(usize, usize)> {
        if position >= self.total_length {
            return None;
        }

        let mut current_offset = 0;
        for (i, span) in self.spans.iter().enumerate() {
            if current_offset + span.len() > position {
                return Some((i, position - current_offset));
            }
            current_offset += span.len();
        }
        None
    }

    /// Make sure a span boundary exists at `position` and return the index of
    /// the first span starting there (`spans.len()` at the end of the table).
    fn split_at(&mut self, position: usize) -> usize {
        let mut current_offset = 0;

        for i in 0..self.spans.len() {
            if current_offset == position {
                return i;
            }

            let span_len = self.spans[i].len();
            if current_offset + span_len > position {
                let right = self.spans[i].split_off(position - current_offset);
                self.spans.insert(i + 1, right);
                return i + 1;
            }

            current_offset += span_len;
        }

        self.spans.len()
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            if span.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.state == span.state => {
                    prev.text.push_str(&span.text);
                    prev.length += span.length;
                }
                _ => merged.push(span),
            }
        }
        self.spans = merged;
    }
}

impl fmt::Display for SpanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_text())
    }
}
