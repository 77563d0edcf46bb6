//! Panel kinds, their persisted configuration, and the kind → render strategy
//! registry.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::console::ConsoleState;
use super::editor::{EditorPanelState, LoadState};
use super::explorer::ExplorerState;
use super::layout::PanelNode;
use super::services::ports::FileHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Editor,
    FolderView,
    Settings,
    Navigation,
    Dashboard,
    Console,
    Tool,
    Info,
    Placeholder,
}

impl PanelKind {
    pub const ALL: [PanelKind; 9] = [
        PanelKind::Editor,
        PanelKind::FolderView,
        PanelKind::Settings,
        PanelKind::Navigation,
        PanelKind::Dashboard,
        PanelKind::Console,
        PanelKind::Tool,
        PanelKind::Info,
        PanelKind::Placeholder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Editor => "Editor",
            Self::FolderView => "Files",
            Self::Settings => "Settings",
            Self::Navigation => "Navigation",
            Self::Dashboard => "Dashboard",
            Self::Console => "Terminal",
            Self::Tool => "Tool",
            Self::Info => "Info",
            Self::Placeholder => "Placeholder",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| {
            kind.label().eq_ignore_ascii_case(&name)
                || serde_json::to_value(kind)
                    .ok()
                    .and_then(|v| v.as_str().map(|s| s == name))
                    .unwrap_or(false)
        })
    }
}

/// Opaque token tying a panel's persisted config to a live `FileHandle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey(u64);

impl FileKey {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fk-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPanelConfig {
    /// Never persisted: file handles do not survive a reload.
    #[serde(skip)]
    pub file_key: Option<FileKey>,
    pub full_path: String,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub is_new_file: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelConfig {
    Editor(EditorPanelConfig),
    #[default]
    None,
}

impl PanelConfig {
    pub fn editor(&self) -> Option<&EditorPanelConfig> {
        match self {
            Self::Editor(config) => Some(config),
            Self::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Unsaved,
}

impl StatusClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsaved => "unsaved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorStatus {
    Loading,
    Ready { lines: usize, dirty: bool },
    Failed(String),
    Detached,
}

/// What a panel shows, as decided by its kind's render strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Editor {
        path: String,
        read_only: bool,
        status: EditorStatus,
    },
    FolderView {
        dir: String,
        entries: usize,
        busy: bool,
    },
    Console {
        lines: usize,
    },
    Static {
        heading: String,
    },
    Placeholder,
}

/// Everything a render strategy may look at for one panel.
pub struct PanelView<'a> {
    pub node: &'a PanelNode,
    pub handle: Option<&'a FileHandle>,
    pub editor: Option<&'a EditorPanelState>,
    pub explorer: &'a ExplorerState,
    pub console: &'a ConsoleState,
}

pub trait PanelRenderer: Send + Sync {
    fn content(&self, view: &PanelView<'_>) -> PanelContent;
}

impl<F> PanelRenderer for F
where
    F: Fn(&PanelView<'_>) -> PanelContent + Send + Sync,
{
    fn content(&self, view: &PanelView<'_>) -> PanelContent {
        self(view)
    }
}

struct EditorRenderer;

impl PanelRenderer for EditorRenderer {
    fn content(&self, view: &PanelView<'_>) -> PanelContent {
        let Some(config) = view.node.config.editor() else {
            return PanelContent::Placeholder;
        };
        let path = view
            .handle
            .map(|h| h.full_path().to_string())
            .unwrap_or_else(|| config.full_path.clone());
        let status = match view.editor {
            None => EditorStatus::Detached,
            Some(editor) => match editor.load_state() {
                LoadState::NotLoaded | LoadState::Loading { .. } => EditorStatus::Loading,
                LoadState::Failed(message) => EditorStatus::Failed(message.clone()),
                LoadState::Loaded => EditorStatus::Ready {
                    lines: editor.rope().len_lines(),
                    dirty: editor.is_dirty(),
                },
            },
        };
        PanelContent::Editor {
            path,
            read_only: config.is_read_only,
            status,
        }
    }
}

pub struct PanelRegistry {
    renderers: FxHashMap<PanelKind, Box<dyn PanelRenderer>>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self {
            renderers: FxHashMap::default(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PanelKind::Editor, EditorRenderer);
        registry.register(PanelKind::FolderView, |view: &PanelView<'_>| {
            PanelContent::FolderView {
                dir: view.explorer.current_dir.clone(),
                entries: view.explorer.entries.len(),
                busy: view.explorer.is_busy(),
            }
        });
        registry.register(PanelKind::Console, |view: &PanelView<'_>| {
            PanelContent::Console {
                lines: view.console.len(),
            }
        });
        for kind in [
            PanelKind::Settings,
            PanelKind::Navigation,
            PanelKind::Dashboard,
            PanelKind::Tool,
            PanelKind::Info,
        ] {
            registry.register(kind, |view: &PanelView<'_>| PanelContent::Static {
                heading: view.node.title.clone(),
            });
        }
        registry
    }

    pub fn register<R: PanelRenderer + 'static>(&mut self, kind: PanelKind, renderer: R) {
        self.renderers.insert(kind, Box::new(renderer));
    }

    pub fn contains(&self, kind: PanelKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Unregistered kinds render as a placeholder.
    pub fn content(&self, view: &PanelView<'_>) -> PanelContent {
        match self.renderers.get(&view.node.kind) {
            Some(renderer) => renderer.content(view),
            None => PanelContent::Placeholder,
        }
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
