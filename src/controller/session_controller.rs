use crate::config::RcConfig;
use crate::controller::command_types::Command;
use crate::controller::edit_controller::EditController;
use crate::controller::key_handler::KeyHandler;
use crate::document_model::Document;
use crate::view::{Presentation, RenderParams, View};
use arboard::Clipboard;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::stdout;
use tracing::{debug, error, info};

/// One editing session: the edit controller plus everything the terminal
/// front-end needs around it.
pub struct SessionController {
    editor: EditController,
    presentation: Presentation,
    view: View,
    status_message: String,
}

impl SessionController {
    pub fn new(document: Document, config: &RcConfig) -> Self {
        let mut editor = EditController::with_document(document).with_undo_levels(config.undo_levels);
        editor.set_track_changes(config.track_changes);

        let mut view = View::new();
        view.set_tab_stop(config.tab_stop);

        Self {
            editor,
            presentation: Presentation::new(config.dark_mode, config.font_size),
            view,
            status_message: String::from("Ctrl+T track changes | Ctrl+Z undo | Ctrl+Q quit"),
        }
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Execute one command. Returns `true` when the session should end.
    pub fn handle_command(&mut self, command: Command) -> bool {
        debug!(?command, "command");
        if command.is_edit() {
            self.status_message.clear();
        }

        let result = match command {
            Command::InsertChar(c) => self.editor.on_key_char(c),
            Command::DeleteForward => self.editor.on_delete_key(),
            Command::DeleteBackward => self.editor.on_backspace_key(),
            Command::Undo => {
                if !self.editor.on_undo_requested() {
                    self.status_message = "Nothing to undo".to_string();
                }
                Ok(())
            }
            Command::ToggleTrackChanges => {
                let enabled = self.editor.on_toggle_track_changes();
                self.status_message = if enabled {
                    "Track changes enabled".to_string()
                } else {
                    "Track changes disabled".to_string()
                };
                Ok(())
            }
            Command::Paste => {
                self.handle_paste_command();
                Ok(())
            }

            Command::MoveLeft(extend) => {
                self.editor.move_left(extend);
                Ok(())
            }
            Command::MoveRight(extend) => {
                self.editor.move_right(extend);
                Ok(())
            }
            Command::MoveUp(extend) => {
                self.editor.move_up(extend);
                Ok(())
            }
            Command::MoveDown(extend) => {
                self.editor.move_down(extend);
                Ok(())
            }
            Command::MoveLineStart(extend) => {
                self.editor.move_line_start(extend);
                Ok(())
            }
            Command::MoveLineEnd(extend) => {
                self.editor.move_line_end(extend);
                Ok(())
            }
            Command::SelectAll => {
                self.editor.select_all();
                Ok(())
            }

            Command::IncreaseFontSize => {
                let size = self.presentation.increase_font_size();
                self.status_message = format!("Font size {size}pt");
                Ok(())
            }
            Command::DecreaseFontSize => {
                let size = self.presentation.decrease_font_size();
                self.status_message = format!("Font size {size}pt");
                Ok(())
            }
            Command::ToggleDarkMode => {
                self.presentation.toggle_dark_mode();
                self.view.force_redraw();
                Ok(())
            }
            Command::Redraw => {
                self.view.force_redraw();
                Ok(())
            }
            Command::Quit => return true,
        };

        if let Err(e) = result {
            error!(error = %e, "command failed");
            self.status_message = format!("Error: {e}");
        }
        false
    }

    fn handle_paste_command(&mut self) {
        let clipboard_text = match Clipboard::new().and_then(|mut c| c.get_text()) {
            Ok(text) => text,
            Err(e) => {
                self.status_message = format!("Error: Could not access clipboard: {e}");
                return;
            }
        };
        self.paste_text(&clipboard_text);
    }

    /// Paste `text` from the clipboard or a bracketed terminal paste.
    pub fn paste_text(&mut self, text: &str) {
        let sanitized_text = Self::sanitize_paste_text(text);

        if sanitized_text.is_empty() {
            self.status_message = "Nothing to paste".to_string();
            return;
        }

        match self.editor.on_paste(&sanitized_text) {
            Ok(()) => {
                self.status_message = format!("{} characters pasted", sanitized_text.chars().count());
            }
            Err(e) => self.status_message = format!("Error: {e}"),
        }
    }

    fn sanitize_paste_text(text: &str) -> String {
        // Remove trailing newlines that might be added by clipboard
        let trimmed = text.trim_end_matches(['\n', '\r']);

        trimmed
            .replace("\r\n", "\n")
            .chars()
            .filter(|c| {
                // Allow printable characters, tabs, and newlines
                *c != '\0' && (*c == '\t' || *c == '\n' || *c >= ' ')
            })
            .collect()
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Enter alternate screen buffer
        execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        enable_raw_mode()?;

        // Create a guard to ensure cleanup happens even on panic
        struct TerminalGuard;
        impl Drop for TerminalGuard {
            fn drop(&mut self) {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
            }
        }
        let _guard = TerminalGuard;

        info!("session started");
        let result = self.run_loop();
        info!(live_chars = self.editor.document().live_text().chars().count(), "session ended");
        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            let params = RenderParams {
                presentation: &self.presentation,
                status_message: &self.status_message,
            };
            self.view.render(&self.editor, &params)?;

            match event::read()? {
                Event::Key(key_event) => {
                    if let Some(command) = KeyHandler::parse_key(&key_event) {
                        if self.handle_command(command) {
                            break; // Quit
                        }
                    }
                }
                Event::Paste(text) => self.paste_text(&text),
                Event::Resize(_, _) => {
                    // Handle terminal resize - force full redraw
                    self.view.force_redraw();
                }
                _ => {
                    // Ignore other events (mouse, focus)
                }
            }
        }

        Ok(())
    }
}
