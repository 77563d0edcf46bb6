use ropey::Rope;

use crate::kernel::panel::FileKey;
use crate::kernel::services::ports::WorkbenchConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading { request_id: u64 },
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Cursor,
    pub head: Cursor,
}

/// Snapshot handed to the writer; `version` ties the write result back to
/// the edit it captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub version: u64,
    pub text: String,
}

#[derive(Debug)]
pub struct EditorPanelState {
    key: FileKey,
    read_only: bool,
    buffer: Rope,
    dirty: bool,
    edit_version: u64,
    load: LoadState,
    next_request_id: u64,
    saving: Option<u64>,
    cursor: Cursor,
    selection: Option<Selection>,
}

impl EditorPanelState {
    pub fn new(key: FileKey, read_only: bool) -> Self {
        Self {
            key,
            read_only,
            buffer: Rope::new(),
            dirty: false,
            edit_version: 0,
            load: LoadState::NotLoaded,
            next_request_id: 0,
            saving: None,
            cursor: Cursor::default(),
            selection: None,
        }
    }

    pub fn key(&self) -> FileKey {
        self.key
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn edit_version(&self) -> u64 {
        self.edit_version
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Starts a read and returns its request id. A newer request supersedes
    /// any load still in flight.
    pub fn begin_load(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        let request_id = self.next_request_id;
        self.load = LoadState::Loading { request_id };
        request_id
    }

    /// Applies a read result. Returns `false` for a superseded request.
    pub fn finish_load(&mut self, request_id: u64, result: Result<String, String>) -> bool {
        match self.load {
            LoadState::Loading { request_id: current } if current == request_id => {}
            _ => return false,
        }
        match result {
            Ok(text) => {
                self.buffer = Rope::from_str(&text);
                self.dirty = false;
                self.edit_version = self.edit_version.saturating_add(1);
                self.load = LoadState::Loaded;
                self.clamp_cursor();
            }
            Err(message) => {
                self.buffer = Rope::new();
                self.load = LoadState::Failed(message);
                self.cursor = Cursor::default();
                self.selection = None;
            }
        }
        true
    }

    /// Replaces the buffer. Any accepted edit marks the file dirty, even one
    /// that restores the saved text. Returns whether the edit was accepted.
    pub fn edit(&mut self, text: &str) -> bool {
        if self.read_only || self.load != LoadState::Loaded {
            return false;
        }
        self.buffer = Rope::from_str(text);
        self.dirty = true;
        self.edit_version = self.edit_version.saturating_add(1);
        self.clamp_cursor();
        true
    }

    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        if self.read_only || self.load != LoadState::Loaded {
            return None;
        }
        self.saving = Some(self.edit_version);
        Some(SaveTicket {
            version: self.edit_version,
            text: self.buffer.to_string(),
        })
    }

    /// Applies a write result. The dirty bit only clears when no edit
    /// happened after the snapshot was taken. Returns whether the dirty bit
    /// changed.
    pub fn finish_save(&mut self, version: u64, ok: bool) -> bool {
        if self.saving == Some(version) {
            self.saving = None;
        }
        if ok && version == self.edit_version && self.dirty {
            self.dirty = false;
            return true;
        }
        false
    }

    pub fn set_cursor(&mut self, line: usize, column: usize) {
        self.cursor = self.clamp(Cursor { line, column });
        self.selection = None;
    }

    pub fn set_selection(&mut self, anchor: Cursor, head: Cursor) {
        let anchor = self.clamp(anchor);
        let head = self.clamp(head);
        self.cursor = head;
        self.selection = (anchor != head).then_some(Selection { anchor, head });
    }

    /// Tab title: file name decorated with the dirty marker and the
    /// read-only suffix.
    pub fn display_title(&self, name: &str, config: &WorkbenchConfig) -> String {
        let mut title = String::with_capacity(name.len() + 8);
        if self.dirty {
            title.push_str(&config.dirty_marker);
        }
        title.push_str(name);
        if self.read_only {
            title.push_str(&config.read_only_suffix);
        }
        title
    }

    fn line_len(&self, line: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return 0;
        }
        let slice = self.buffer.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    fn clamp(&self, cursor: Cursor) -> Cursor {
        let last_line = self.buffer.len_lines().saturating_sub(1);
        let line = cursor.line.min(last_line);
        Cursor {
            line,
            column: cursor.column.min(self.line_len(line)),
        }
    }

    /// Buffer replacement drops the selection.
    fn clamp_cursor(&mut self) {
        self.cursor = self.clamp(self.cursor);
        self.selection = None;
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/state.rs"]
mod tests;
