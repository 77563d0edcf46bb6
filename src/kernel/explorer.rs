//! Folder view state: the listed directory, the busy indicator for
//! folder-level operations, and the entry-name prompt.

use super::path;
use super::services::ports::DirEntryInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPromptKind {
    NewFile { parent_dir: String },
    NewFolder { parent_dir: String },
    Rename { from: String },
    Duplicate { from: String },
}

impl EntryPromptKind {
    /// Device path the entered name resolves to.
    pub fn target_path(&self, name: &str) -> String {
        match self {
            Self::NewFile { parent_dir } | Self::NewFolder { parent_dir } => {
                path::join(parent_dir, name)
            }
            Self::Rename { from } | Self::Duplicate { from } => {
                path::join(path::parent(from), name)
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NewFile { .. } => "New file",
            Self::NewFolder { .. } => "New folder",
            Self::Rename { .. } => "Rename",
            Self::Duplicate { .. } => "Duplicate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPrompt {
    pub kind: EntryPromptKind,
    pub value: String,
    pub warning: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExplorerState {
    pub current_dir: String,
    pub entries: Vec<DirEntryInfo>,
    busy: u32,
    prompt: Option<EntryPrompt>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new(path::ROOT)
    }
}

impl ExplorerState {
    pub fn new(dir: &str) -> Self {
        Self {
            current_dir: path::normalize(dir),
            entries: Vec::new(),
            busy: 0,
            prompt: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy > 0
    }

    pub fn begin_busy(&mut self) {
        self.busy = self.busy.saturating_add(1);
    }

    pub fn end_busy(&mut self) {
        self.busy = self.busy.saturating_sub(1);
    }

    /// Installs a listing; folders first, then by name.
    pub fn set_listing(&mut self, dir: &str, mut entries: Vec<DirEntryInfo>) {
        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        self.current_dir = path::normalize(dir);
        self.entries = entries;
    }

    pub fn prompt(&self) -> Option<&EntryPrompt> {
        self.prompt.as_ref()
    }

    pub fn open_prompt(&mut self, kind: EntryPromptKind, value: impl Into<String>) {
        self.prompt = Some(EntryPrompt {
            kind,
            value: value.into(),
            warning: None,
        });
    }

    /// Re-shows the prompt with a warning label, keeping the rejected value.
    pub fn warn_prompt(&mut self, kind: EntryPromptKind, value: String, warning: String) {
        self.prompt = Some(EntryPrompt {
            kind,
            value,
            warning: Some(warning),
        });
    }

    pub fn close_prompt(&mut self) -> Option<EntryPrompt> {
        self.prompt.take()
    }

    /// Keeps the listed directory valid after `removed` disappeared.
    pub fn on_entry_deleted(&mut self, removed: &str) {
        if path::is_within(&self.current_dir, removed) {
            self.current_dir = path::parent(removed).to_string();
            self.entries.clear();
        }
    }

    pub fn on_entry_renamed(&mut self, from: &str, to: &str) {
        if let Some(dir) = path::rebase(&self.current_dir, from, to) {
            self.current_dir = dir;
        }
    }
}
