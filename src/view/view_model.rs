// View Model - Abstracts editor state for the view layer
// This ensures the view has no direct dependencies on controller internals

use crate::controller::EditController;
use crate::document_model::RenderSpan;

/// The ViewModel trait provides everything the view needs to render
/// without depending on Document internals
pub trait ViewModel {
    /// Styled runs in document order
    fn get_render_spans(&self) -> Vec<RenderSpan>;

    /// Cursor as a char position
    fn get_cursor_position(&self) -> usize;

    /// Ordered selection bounds, if any
    fn get_selection_range(&self) -> Option<(usize, usize)>;

    fn is_tracking_changes(&self) -> bool;
}

impl ViewModel for EditController {
    fn get_render_spans(&self) -> Vec<RenderSpan> {
        self.render_spans()
    }

    fn get_cursor_position(&self) -> usize {
        self.cursor()
    }

    fn get_selection_range(&self) -> Option<(usize, usize)> {
        self.get_selection()
    }

    fn is_tracking_changes(&self) -> bool {
        self.track_changes_enabled()
    }
}
