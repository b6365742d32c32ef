/// View subsystem - Independent rendering and display management
///
/// This module turns the controller's styled spans into terminal output,
/// through the ViewModel trait, and owns the presentation-only settings.

pub mod renderer;
pub mod theme;
pub mod view_model;

// Re-export public interface
pub use renderer::{RenderParams, View};
pub use theme::{Palette, Presentation};
pub use view_model::ViewModel;
