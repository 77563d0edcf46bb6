use rustc_hash::{FxHashMap, FxHashSet};

use super::close_queue::CloseQueue;
use super::console::ConsoleState;
use super::editor::EditorPanelState;
use super::explorer::ExplorerState;
use super::layout::{LayoutModel, NodeId};
use super::panel::FileKey;
use super::services::ports::{FileHandle, WorkbenchConfig};

#[derive(Debug)]
pub struct WorkspaceState {
    pub config: WorkbenchConfig,
    pub layout: LayoutModel,
    /// Live handle for every open editor's `FileKey`.
    pub files: FxHashMap<FileKey, FileHandle>,
    pub editors: FxHashMap<NodeId, EditorPanelState>,
    pub close_queue: CloseQueue,
    pub explorer: ExplorerState,
    pub console: ConsoleState,
    pub mounted: FxHashSet<NodeId>,
    next_file_key: u64,
}

impl WorkspaceState {
    pub fn new(config: WorkbenchConfig) -> Self {
        let console = ConsoleState::new(config.console_scrollback);
        Self {
            config,
            layout: LayoutModel::new(),
            files: FxHashMap::default(),
            editors: FxHashMap::default(),
            close_queue: CloseQueue::new(),
            explorer: ExplorerState::default(),
            console,
            mounted: FxHashSet::default(),
            next_file_key: 0,
        }
    }

    pub fn mint_file_key(&mut self) -> FileKey {
        self.next_file_key = self.next_file_key.saturating_add(1);
        FileKey::new(self.next_file_key)
    }

    pub fn editor_node_for_key(&self, key: FileKey) -> Option<NodeId> {
        self.editors
            .iter()
            .find(|(_, editor)| editor.key() == key)
            .map(|(node, _)| *node)
    }

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.editors.get(&node).is_some_and(|e| e.is_dirty())
    }
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self::new(WorkbenchConfig::default())
    }
}
