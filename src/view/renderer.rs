use super::theme::{CellStyle, Palette, Presentation};
use super::view_model::ViewModel;
use crate::document_model::RenderSpan;
use crossterm::{
    cursor, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{size, Clear, ClearType},
};
use std::io::{self, Write, stdout};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

/// Document laid out into screen rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    pub rows: Vec<Vec<Cell>>,
    /// Cursor as (row, column)
    pub cursor: (usize, usize),
}

#[derive(Clone)]
pub struct RenderParams<'a> {
    pub presentation: &'a Presentation,
    pub status_message: &'a str,
}

pub struct View {
    scroll_offset: usize,
    needs_full_redraw: bool,
    tab_stop: usize,
}

impl View {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            needs_full_redraw: true,
            tab_stop: 4, // default to 4 spaces
        }
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        self.tab_stop = tab_stop.max(1);
    }

    pub fn force_redraw(&mut self) {
        self.needs_full_redraw = true;
    }

    /// Break spans into rows: `\n` ends a row, long rows wrap at `width`,
    /// tabs expand to the next tab stop.
    pub fn layout(
        spans: &[RenderSpan],
        palette: &Palette,
        cursor: usize,
        selection: Option<(usize, usize)>,
        width: usize,
        tab_stop: usize,
    ) -> ScreenLayout {
        let width = width.max(1);
        let tab_stop = tab_stop.max(1);
        let mut rows: Vec<Vec<Cell>> = vec![Vec::new()];
        let mut column = 0;
        let mut cursor_at = None;
        let mut position = 0;

        for span in spans {
            let base_style = palette.style_for(span.state, span.bracketed);

            for ch in span.text.chars() {
                let mut style = base_style;
                style.reverse = selection.is_some_and(|(start, end)| position >= start && position < end);

                if ch == '\n' {
                    // A newline closing a full row takes no cell of its own
                    let row_full = column >= width;
                    if position == cursor {
                        cursor_at = Some((rows.len() - 1, column.min(width - 1)));
                    }
                    // Selected or struck-out newlines still show as a blank cell
                    if !row_full && (style.reverse || style.crossed_out) {
                        Self::push_cell(&mut rows, &mut column, ' ', style, width);
                    }
                    rows.push(Vec::new());
                    column = 0;
                    position += 1;
                    continue;
                }

                let (glyph, cell_width) = if ch == '\t' {
                    (' ', tab_stop - column % tab_stop)
                } else {
                    match ch.width() {
                        Some(w) if w > 0 => (ch, w),
                        _ => ('?', 1),
                    }
                };

                if column > 0 && column + cell_width > width {
                    rows.push(Vec::new());
                    column = 0;
                }
                if position == cursor {
                    cursor_at = Some((rows.len() - 1, column));
                }

                if ch == '\t' {
                    for _ in 0..cell_width {
                        Self::push_cell(&mut rows, &mut column, glyph, style, width);
                    }
                } else {
                    Self::push_cell(&mut rows, &mut column, glyph, style, width);
                    column += cell_width - 1;
                }
                position += 1;
            }
        }

        let cursor = cursor_at.unwrap_or_else(|| {
            if column >= width {
                rows.push(Vec::new());
                (rows.len() - 1, 0)
            } else {
                (rows.len() - 1, column)
            }
        });

        ScreenLayout { rows, cursor }
    }

    fn push_cell(rows: &mut Vec<Vec<Cell>>, column: &mut usize, ch: char, style: CellStyle, width: usize) {
        if *column >= width {
            rows.push(Vec::new());
            *column = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(Cell { ch, style });
        }
        *column += 1;
    }

    /// First visible row after scrolling just enough to show `cursor_row`.
    fn adjust_scroll(&mut self, cursor_row: usize, text_height: usize) -> usize {
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + text_height {
            self.scroll_offset = cursor_row + 1 - text_height;
        }
        self.scroll_offset
    }

    pub fn status_line(view_model: &dyn ViewModel, params: &RenderParams<'_>) -> String {
        let tracking = if view_model.is_tracking_changes() {
            "TRACK ON"
        } else {
            "TRACK OFF"
        };
        let theme = if params.presentation.dark_mode() {
            "dark"
        } else {
            "light"
        };
        let mut line = format!(
            " {} | {}pt | {}",
            tracking,
            params.presentation.font_size(),
            theme
        );
        if !params.status_message.is_empty() {
            line.push_str(" | ");
            line.push_str(params.status_message);
        }
        line
    }

    pub fn render(&mut self, view_model: &dyn ViewModel, params: &RenderParams<'_>) -> io::Result<()> {
        let (width, height) = size()?;
        let (width, height) = (width as usize, height as usize);
        let text_height = height.saturating_sub(1).max(1);
        let palette = params.presentation.palette();

        let layout = Self::layout(
            &view_model.get_render_spans(),
            &palette,
            view_model.get_cursor_position(),
            view_model.get_selection_range(),
            width,
            self.tab_stop,
        );
        let first_row = self.adjust_scroll(layout.cursor.0, text_height);

        let mut out = stdout().lock();
        queue!(out, cursor::Hide, SetBackgroundColor(palette.background))?;
        if self.needs_full_redraw {
            queue!(out, Clear(ClearType::All))?;
            self.needs_full_redraw = false;
        }

        for screen_row in 0..text_height {
            queue!(out, cursor::MoveTo(0, screen_row as u16))?;
            if let Some(row) = layout.rows.get(first_row + screen_row) {
                Self::draw_row(&mut out, row, &palette)?;
            }
            queue!(
                out,
                SetBackgroundColor(palette.background),
                Clear(ClearType::UntilNewLine)
            )?;
        }

        let mut status = Self::status_line(view_model, params);
        status = status.chars().take(width).collect();
        let padding = width.saturating_sub(status.chars().count());
        queue!(
            out,
            cursor::MoveTo(0, text_height as u16),
            SetForegroundColor(palette.base),
            SetBackgroundColor(palette.background),
            SetAttribute(Attribute::Reverse),
            Print(status),
            Print(" ".repeat(padding)),
            SetAttribute(Attribute::Reset),
        )?;

        let (cursor_row, cursor_col) = layout.cursor;
        queue!(
            out,
            cursor::MoveTo(cursor_col as u16, (cursor_row - first_row) as u16),
            cursor::Show
        )?;
        out.flush()
    }

    fn draw_row(out: &mut impl Write, row: &[Cell], palette: &Palette) -> io::Result<()> {
        // Runs of identical style share one set of escape codes
        let mut start = 0;
        while start < row.len() {
            let style = row[start].style;
            let end = row[start..]
                .iter()
                .position(|cell| cell.style != style)
                .map_or(row.len(), |i| start + i);
            let text: String = row[start..end].iter().map(|cell| cell.ch).collect();

            queue!(
                out,
                SetAttribute(Attribute::Reset),
                SetBackgroundColor(palette.background),
                SetForegroundColor(style.foreground)
            )?;
            if style.crossed_out {
                queue!(out, SetAttribute(Attribute::CrossedOut))?;
            }
            if style.reverse {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(out, Print(text))?;
            start = end;
        }
        queue!(out, SetAttribute(Attribute::Reset))
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::EditState;
    use crossterm::style::Color;

    fn span(text: &str, state: EditState, bracketed: bool) -> RenderSpan {
        RenderSpan {
            text: text.to_string(),
            state,
            bracketed,
        }
    }

    fn row_text(layout: &ScreenLayout, row: usize) -> String {
        layout.rows[row].iter().map(|c| c.ch).collect()
    }

    #[test]
    fn test_layout_styles_follow_spans() {
        let spans = vec![
            span("ab", EditState::Plain, false),
            span("c", EditState::Added, false),
            span("d", EditState::Deleted, true),
        ];
        let layout = View::layout(&spans, &Palette::dark(), 0, None, 80, 4);
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(row_text(&layout, 0), "abcd");
        assert_eq!(layout.rows[0][2].style.foreground, Color::Green);
        assert_eq!(layout.rows[0][3].style.foreground, Color::Grey);
        assert!(layout.rows[0][3].style.crossed_out);
    }

    #[test]
    fn test_layout_newlines_and_cursor() {
        let spans = vec![span("ab\ncd", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 4, None, 80, 4);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(row_text(&layout, 1), "cd");
        assert_eq!(layout.cursor, (1, 1));

        let at_newline = View::layout(&spans, &Palette::dark(), 2, None, 80, 4);
        assert_eq!(at_newline.cursor, (0, 2));

        let at_end = View::layout(&spans, &Palette::dark(), 5, None, 80, 4);
        assert_eq!(at_end.cursor, (1, 2));
    }

    #[test]
    fn test_layout_wraps_long_rows() {
        let spans = vec![span("abcdefg", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 7, None, 3, 4);
        assert_eq!(layout.rows.len(), 3);
        assert_eq!(row_text(&layout, 0), "abc");
        assert_eq!(row_text(&layout, 2), "g");
        assert_eq!(layout.cursor, (2, 1));
    }

    #[test]
    fn test_layout_cursor_after_full_row_moves_down() {
        let spans = vec![span("abc", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 3, None, 3, 4);
        assert_eq!(layout.cursor, (1, 0));
    }

    #[test]
    fn test_layout_cursor_on_newline_of_full_row_stays_on_screen() {
        let spans = vec![span("abc\ndef", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 3, None, 3, 4);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.cursor, (0, 2));
    }

    #[test]
    fn test_layout_struck_newline_of_full_row_adds_no_row() {
        let spans = vec![span("abc\ndef", EditState::Deleted, false)];
        let layout = View::layout(&spans, &Palette::dark(), 7, None, 3, 4);
        assert_eq!(layout.rows.len(), 3);
        assert_eq!(row_text(&layout, 0), "abc");
        assert_eq!(row_text(&layout, 1), "def");
        assert_eq!(layout.cursor, (2, 0));

        let selected = vec![span("abc\ndef", EditState::Plain, false)];
        let layout = View::layout(&selected, &Palette::dark(), 0, Some((0, 7)), 3, 4);
        assert_eq!(row_text(&layout, 1), "def");
    }

    #[test]
    fn test_layout_selection_is_reversed() {
        let spans = vec![span("abcd", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 3, Some((1, 3)), 80, 4);
        let reversed: Vec<bool> = layout.rows[0].iter().map(|c| c.style.reverse).collect();
        assert_eq!(reversed, vec![false, true, true, false]);
    }

    #[test]
    fn test_layout_expands_tabs() {
        let spans = vec![span("a\tb", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 2, None, 80, 4);
        assert_eq!(row_text(&layout, 0), "a   b");
        assert_eq!(layout.cursor, (0, 4));
    }

    #[test]
    fn test_layout_wide_chars_take_two_columns() {
        let spans = vec![span("日本", EditState::Plain, false)];
        let layout = View::layout(&spans, &Palette::dark(), 1, None, 80, 4);
        assert_eq!(layout.cursor, (0, 2));
    }

    #[test]
    fn test_adjust_scroll_keeps_cursor_visible() {
        let mut view = View::new();
        assert_eq!(view.adjust_scroll(0, 5), 0);
        assert_eq!(view.adjust_scroll(7, 5), 3);
        assert_eq!(view.adjust_scroll(4, 5), 3);
        assert_eq!(view.adjust_scroll(1, 5), 1);
    }
}
