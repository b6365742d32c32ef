#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Editing events
    InsertChar(char),
    DeleteForward,
    DeleteBackward,
    Undo,
    ToggleTrackChanges,
    Paste,

    // Cursor movement, `true` extends the selection
    MoveLeft(bool),
    MoveRight(bool),
    MoveUp(bool),
    MoveDown(bool),
    MoveLineStart(bool),
    MoveLineEnd(bool),
    SelectAll,

    // Presentation only
    IncreaseFontSize,
    DecreaseFontSize,
    ToggleDarkMode,
    Redraw,

    Quit,
}

impl Command {
    /// Whether the command can change document content.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_)
                | Command::DeleteForward
                | Command::DeleteBackward
                | Command::Undo
                | Command::Paste
        )
    }
}
