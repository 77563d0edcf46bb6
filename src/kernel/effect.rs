use crate::kernel::action::FsRequest;
use crate::kernel::explorer::EntryPrompt;
use crate::kernel::layout::NodeId;
use crate::kernel::panel::{FileKey, PanelKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadFile {
        key: FileKey,
        request_id: u64,
        path: String,
    },
    WriteFile {
        key: FileKey,
        version: u64,
        path: String,
        text: String,
    },
    /// The handle behind `key` was released.
    FileClosed {
        key: FileKey,
        path: String,
    },
    ShowCloseConfirm {
        node: NodeId,
        file_name: String,
    },
    HideCloseConfirm,
    ShowEntryPrompt(EntryPrompt),
    HideEntryPrompt,
    Fs(FsRequest),
    Notify(Notification),
    RegisterPanelBindings {
        node: NodeId,
        kind: PanelKind,
    },
    ActivePanelChanged(Option<NodeId>),
    LayoutChanged {
        revision: u64,
    },
    SerialWrite(String),
}
