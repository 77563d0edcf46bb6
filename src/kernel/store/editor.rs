use tracing::{debug, warn};

use crate::kernel::editor::LoadState;
use crate::kernel::layout::NodeId;
use crate::kernel::panel::FileKey;
use crate::kernel::{Action, Effect, Notification};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_editor_action(&mut self, action: Action) -> DispatchResult {
        let mut effects = Vec::new();
        let state_changed = match action {
            Action::Edit { node, text } => self.edit(node, &text),
            Action::Save { node } => self.save(node, &mut effects),
            Action::MoveCursor { node, line, column } => match self.state.editors.get_mut(&node) {
                Some(editor) => {
                    let before = editor.cursor();
                    editor.set_cursor(line, column);
                    editor.cursor() != before
                }
                None => false,
            },
            Action::SetSelection { node, anchor, head } => {
                match self.state.editors.get_mut(&node) {
                    Some(editor) => {
                        editor.set_selection(anchor, head);
                        true
                    }
                    None => false,
                }
            }
            Action::FileLoaded {
                key,
                request_id,
                result,
            } => self.file_loaded(key, request_id, result, &mut effects),
            _ => false,
        };
        DispatchResult::changed(state_changed, effects)
    }

    fn edit(&mut self, node: NodeId, text: &str) -> bool {
        let Some(editor) = self.state.editors.get_mut(&node) else {
            return false;
        };
        let was_dirty = editor.is_dirty();
        if !editor.edit(text) {
            return false;
        }
        if !was_dirty {
            debug!(?node, "editor became dirty");
            self.sync_editor_node(node);
        }
        true
    }

    fn save(&mut self, node: NodeId, effects: &mut Vec<Effect>) -> bool {
        let Some(editor) = self.state.editors.get_mut(&node) else {
            return false;
        };
        let key = editor.key();
        let Some(path) = self.state.files.get(&key).map(|h| h.full_path().to_string()) else {
            return false;
        };
        if editor.is_read_only() {
            effects.push(Effect::Notify(Notification::warning(format!(
                "{} is read-only",
                path
            ))));
            return false;
        }
        let Some(ticket) = editor.begin_save() else {
            return false;
        };
        effects.push(Effect::WriteFile {
            key,
            version: ticket.version,
            path,
            text: ticket.text,
        });
        true
    }

    fn file_loaded(
        &mut self,
        key: FileKey,
        request_id: u64,
        result: Result<String, String>,
        effects: &mut Vec<Effect>,
    ) -> bool {
        let Some(node) = self.state.editor_node_for_key(key) else {
            debug!(%key, "load result for a closed file");
            return false;
        };
        let Some(editor) = self.state.editors.get_mut(&node) else {
            return false;
        };
        if !editor.finish_load(request_id, result) {
            debug!(%key, request_id, "stale load result");
            return false;
        }
        if let LoadState::Failed(error) = editor.load_state() {
            let path = self
                .state
                .files
                .get(&key)
                .map(|h| h.full_path().to_string())
                .unwrap_or_default();
            warn!(%path, %error, "load failed");
            effects.push(Effect::Notify(Notification::error(format!(
                "Failed to read {}: {}",
                path, error
            ))));
        }
        self.sync_editor_node(node);
        true
    }
}
