//! Per-file editor state owned by one editor panel.

mod state;

pub use state::{Cursor, EditorPanelState, LoadState, SaveTicket, Selection};
