//! Headless workspace core (state/action/effect).

pub mod action;
pub mod close_queue;
pub mod console;
pub mod editor;
pub mod effect;
pub mod explorer;
pub mod layout;
pub mod panel;
pub mod path;
pub mod services;
pub mod state;
pub mod store;

pub use action::{
    Action, CloseDecision, CloseFilter, FsOutcome, FsRequest, OpenOptions, TabTarget,
};
pub use close_queue::{CloseQueue, ClosePhase, CurrentClose};
pub use console::ConsoleState;
pub use editor::{Cursor, EditorPanelState, LoadState, SaveTicket, Selection};
pub use effect::{Effect, Notification, NotificationLevel};
pub use explorer::{EntryPrompt, EntryPromptKind, ExplorerState};
pub use layout::{
    ActionOutcome, BorderLocation, InsertPosition, LayoutAction, LayoutError, LayoutModel, NodeId,
    PanelNode, PathMatch, SearchScope, TabAttributes, TabSpec,
};
pub use panel::{
    EditorPanelConfig, EditorStatus, FileKey, PanelConfig, PanelContent, PanelKind,
    PanelRegistry, PanelRenderer, PanelView, StatusClass,
};
pub use state::WorkspaceState;
pub use store::{DispatchResult, Store};
