use crate::kernel::editor::Cursor;
use crate::kernel::explorer::EntryPromptKind;
use crate::kernel::layout::NodeId;
use crate::kernel::panel::{FileKey, PanelKind};
use crate::kernel::path;
use crate::kernel::services::ports::{DirEntryInfo, FileHandle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    pub read_only: bool,
    pub is_new_file: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseFilter {
    Actual,
    Others,
    Left,
    Right,
    Saved,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Save,
    Discard,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabTarget {
    Kind(PanelKind),
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsRequest {
    CreateFile { path: String },
    CreateFolder { path: String },
    Rename { from: String, to: String },
    Duplicate { from: String, to: String },
    Delete { path: String, is_dir: bool },
    Move { from: String, to_dir: String },
    Copy { from: String, to: String },
    ListFolder { path: String },
}

impl FsRequest {
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::CreateFile { .. } => "create",
            Self::CreateFolder { .. } => "create folder",
            Self::Rename { .. } => "rename",
            Self::Duplicate { .. } => "duplicate",
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::ListFolder { .. } => "list",
        }
    }

    /// The entry named in notifications.
    pub fn subject(&self) -> &str {
        match self {
            Self::CreateFile { path }
            | Self::CreateFolder { path }
            | Self::Delete { path, .. }
            | Self::ListFolder { path } => path,
            Self::Rename { from, .. }
            | Self::Duplicate { from, .. }
            | Self::Move { from, .. }
            | Self::Copy { from, .. } => from,
        }
    }

    /// Folder-level operations drive the folder view's busy indicator.
    pub fn is_folder_level(&self) -> bool {
        matches!(
            self,
            Self::ListFolder { .. } | Self::Move { .. } | Self::Delete { is_dir: true, .. }
        )
    }

    /// Path that must not exist before the operation runs.
    pub fn conflict_target(&self) -> Option<String> {
        match self {
            Self::CreateFile { path } | Self::CreateFolder { path } => Some(path.clone()),
            Self::Rename { to, .. } | Self::Duplicate { to, .. } | Self::Copy { to, .. } => {
                Some(to.clone())
            }
            Self::Move { from, to_dir } => Some(path::join(to_dir, path::file_name(from))),
            Self::Delete { .. } | Self::ListFolder { .. } => None,
        }
    }

    /// The prompt that produced this request, to re-show on a name conflict.
    pub fn prompt_kind(&self) -> Option<EntryPromptKind> {
        match self {
            Self::CreateFile { path } => Some(EntryPromptKind::NewFile {
                parent_dir: path::parent(path).to_string(),
            }),
            Self::CreateFolder { path } => Some(EntryPromptKind::NewFolder {
                parent_dir: path::parent(path).to_string(),
            }),
            Self::Rename { from, .. } => Some(EntryPromptKind::Rename { from: from.clone() }),
            Self::Duplicate { from, .. } => Some(EntryPromptKind::Duplicate { from: from.clone() }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOutcome {
    Done,
    Moved { to: String },
    Listed(Vec<DirEntryInfo>),
    Conflict,
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    OpenFile {
        handle: FileHandle,
        options: OpenOptions,
    },
    OpenTool {
        kind: PanelKind,
        title: Option<String>,
    },
    RequestClose {
        node: NodeId,
    },
    CloseTabs {
        node: NodeId,
        filter: CloseFilter,
    },
    CloseBatch {
        nodes: Vec<NodeId>,
    },
    ConfirmClose(CloseDecision),
    SelectTab {
        node: NodeId,
    },
    ActivateTab {
        target: TabTarget,
    },
    OpenTab {
        target: TabTarget,
    },
    SwitchTab {
        target: TabTarget,
    },
    PanelMounted {
        node: NodeId,
    },
    Edit {
        node: NodeId,
        text: String,
    },
    Save {
        node: NodeId,
    },
    MoveCursor {
        node: NodeId,
        line: usize,
        column: usize,
    },
    SetSelection {
        node: NodeId,
        anchor: Cursor,
        head: Cursor,
    },
    FileLoaded {
        key: FileKey,
        request_id: u64,
        result: Result<String, String>,
    },
    FileSaved {
        key: FileKey,
        version: u64,
        error: Option<String>,
    },
    Fs(FsRequest),
    FsCompleted {
        request: FsRequest,
        outcome: FsOutcome,
    },
    BeginPrompt(EntryPromptKind),
    SubmitPrompt {
        value: String,
    },
    DismissPrompt,
    EntryDeleted {
        path: String,
    },
    EntryRenamed {
        from: String,
        to: String,
    },
    EntryCreated {
        path: String,
        is_dir: bool,
    },
    SerialData(Vec<u8>),
    ConsoleSend(String),
    ConsoleClear,
    RestoreLayout {
        json: String,
    },
}
