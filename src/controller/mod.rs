/// Controller subsystem - Handles all user input and edit decisions
///
/// This module turns key events into commands, decides between plain and
/// tracked document operations, and drives the terminal session.

pub mod command_types;
pub mod edit_controller;
pub mod key_handler;
pub mod movement;
pub mod session_controller;

// Re-export public interface
pub use command_types::Command;
pub use edit_controller::{EditController, EditError, EditResult};
pub use key_handler::KeyHandler;
pub use session_controller::SessionController;
