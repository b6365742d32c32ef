use crate::document_model::EditState;
use crossterm::style::Color;

pub const DEFAULT_FONT_SIZE: u16 = 22;
pub const MIN_FONT_SIZE: u16 = 6;
pub const MAX_FONT_SIZE: u16 = 96;
const FONT_SIZE_STEP: u16 = 2;

/// How one character is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub foreground: Color,
    pub crossed_out: bool,
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub base: Color,
    pub added: Color,
    pub deleted: Color,
    pub bracketed: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            base: Color::White,
            added: Color::Green,
            deleted: Color::Red,
            bracketed: Color::Grey,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            base: Color::Black,
            added: Color::DarkGreen,
            deleted: Color::DarkRed,
            bracketed: Color::DarkGrey,
        }
    }

    /// The bracket grey wins over the edit colors, but a deleted character
    /// keeps its strike-through either way.
    pub fn style_for(&self, state: EditState, bracketed: bool) -> CellStyle {
        let state_color = match state {
            EditState::Plain => self.base,
            EditState::Added => self.added,
            EditState::Deleted => self.deleted,
        };
        CellStyle {
            foreground: if bracketed { self.bracketed } else { state_color },
            crossed_out: state == EditState::Deleted,
            reverse: false,
        }
    }
}

/// Display settings with no bearing on document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    dark_mode: bool,
    font_size: u16,
}

impl Presentation {
    pub fn new(dark_mode: bool, font_size: u16) -> Self {
        Self {
            dark_mode,
            font_size: font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn increase_font_size(&mut self) -> u16 {
        self.font_size = (self.font_size + FONT_SIZE_STEP).min(MAX_FONT_SIZE);
        self.font_size
    }

    /// Shrinks by one step unless already at the minimum.
    pub fn decrease_font_size(&mut self) -> u16 {
        if self.font_size > MIN_FONT_SIZE {
            self.font_size = self
                .font_size
                .saturating_sub(FONT_SIZE_STEP)
                .max(MIN_FONT_SIZE);
        }
        self.font_size
    }

    pub fn palette(&self) -> Palette {
        if self.dark_mode {
            Palette::dark()
        } else {
            Palette::light()
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(true, DEFAULT_FONT_SIZE)
    }
}
