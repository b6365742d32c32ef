/// Document model subsystem - Tagged text storage and tracked-change operations
///
/// This module holds the character sequence with its edit-state tags, the
/// derived bracket overlay, and the undo checkpoints taken over them.

pub mod document;
pub mod overlay;
pub mod selection;
pub mod span_table;
pub mod undo;

// Re-export main types for convenience
pub use document::{Document, DocumentError, DocumentResult, DocumentSnapshot, RenderSpan};
pub use overlay::BracketOverlay;
pub use selection::Selection;
pub use span_table::{EditState, Span, SpanTable};
pub use undo::{UndoEntry, UndoManager};
