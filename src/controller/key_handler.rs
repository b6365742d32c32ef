use crate::controller::command_types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn parse_key(key_event: &KeyEvent) -> Option<Command> {
        // Windows terminals report releases too
        if key_event.kind == KeyEventKind::Release {
            return None;
        }

        let key = key_event.code;
        let modifiers = key_event.modifiers;
        let shift = modifiers.contains(KeyModifiers::SHIFT);

        if modifiers.contains(KeyModifiers::CONTROL) {
            return Self::parse_control_key(key);
        }

        match key {
            KeyCode::Char(c) => Some(Command::InsertChar(c)),
            KeyCode::Enter => Some(Command::InsertChar('\n')),
            KeyCode::Tab => Some(Command::InsertChar('\t')),
            KeyCode::Backspace => Some(Command::DeleteBackward),
            KeyCode::Delete => Some(Command::DeleteForward),

            KeyCode::Left => Some(Command::MoveLeft(shift)),
            KeyCode::Right => Some(Command::MoveRight(shift)),
            KeyCode::Up => Some(Command::MoveUp(shift)),
            KeyCode::Down => Some(Command::MoveDown(shift)),
            KeyCode::Home => Some(Command::MoveLineStart(shift)),
            KeyCode::End => Some(Command::MoveLineEnd(shift)),

            KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }

    fn parse_control_key(key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Char('z') => Some(Command::Undo),
            KeyCode::Char('t') => Some(Command::ToggleTrackChanges),
            KeyCode::Char('v') => Some(Command::Paste),
            KeyCode::Char('a') => Some(Command::SelectAll),
            // "=" is the unshifted "+" on most laptop keyboards
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::IncreaseFontSize),
            KeyCode::Char('-') => Some(Command::DecreaseFontSize),
            KeyCode::Char('d') => Some(Command::ToggleDarkMode),
            KeyCode::Char('l') => Some(Command::Redraw),
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        }
    }
}
