use tracing::{debug, warn};

use crate::kernel::action::{CloseDecision, CloseFilter};
use crate::kernel::close_queue::{ClosePhase, CurrentClose};
use crate::kernel::layout::{NodeId, TabAttributes};
use crate::kernel::panel::FileKey;
use crate::kernel::{Action, Effect, Notification};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_close_action(&mut self, action: Action) -> DispatchResult {
        let mut effects = Vec::new();
        let state_changed = match action {
            Action::RequestClose { node } => self.request_close(node, &mut effects),
            Action::CloseTabs { node, filter } => self.close_tabs(node, filter, &mut effects),
            Action::CloseBatch { nodes } => self.request_close_batch(&nodes, &mut effects),
            Action::ConfirmClose(decision) => self.confirm_close(decision, &mut effects),
            Action::FileSaved {
                key,
                version,
                error,
            } => self.file_saved(key, version, error, &mut effects),
            _ => false,
        };
        DispatchResult::changed(state_changed, effects)
    }

    fn request_close(&mut self, node: NodeId, effects: &mut Vec<Effect>) -> bool {
        let Some(panel) = self.state.layout.node(node) else {
            return false;
        };
        if !panel.closable {
            return false;
        }
        if self.state.is_dirty(node) {
            self.enqueue_close(node, effects)
        } else {
            self.close_node(node, effects)
        }
    }

    fn close_tabs(&mut self, node: NodeId, filter: CloseFilter, effects: &mut Vec<Effect>) -> bool {
        let siblings = self.state.layout.siblings(node);
        let Some(index) = siblings.iter().position(|n| *n == node) else {
            return false;
        };
        let targets: Vec<NodeId> = match filter {
            CloseFilter::Actual => return self.request_close(node, effects),
            CloseFilter::Others => siblings.iter().copied().filter(|n| *n != node).collect(),
            CloseFilter::Left => siblings[..index].to_vec(),
            CloseFilter::Right => siblings[index + 1..].to_vec(),
            CloseFilter::Saved => siblings
                .iter()
                .copied()
                .filter(|n| self.state.layout.node(*n).is_some_and(|p| !p.is_unsaved()))
                .collect(),
            CloseFilter::All => siblings,
        };
        self.request_close_batch(&targets, effects)
    }

    /// Clean nodes close right away, tail first; dirty ones join the queue in
    /// their original order.
    fn request_close_batch(&mut self, nodes: &[NodeId], effects: &mut Vec<Effect>) -> bool {
        let mut saved = Vec::new();
        let mut unsaved = Vec::new();
        for node in nodes {
            let Some(panel) = self.state.layout.node(*node) else {
                continue;
            };
            if !panel.closable {
                continue;
            }
            if panel.is_unsaved() {
                unsaved.push(*node);
            } else {
                saved.push(*node);
            }
        }
        debug!(saved = saved.len(), unsaved = unsaved.len(), "close batch");

        let mut changed = false;
        for node in saved.into_iter().rev() {
            changed |= self.close_node(node, effects);
        }
        for node in unsaved {
            changed |= self.enqueue_close(node, effects);
        }
        changed
    }

    fn enqueue_close(&mut self, node: NodeId, effects: &mut Vec<Effect>) -> bool {
        if !self.state.close_queue.enqueue(node) {
            return false;
        }
        self.state.layout.set_attributes(
            node,
            TabAttributes {
                closable: Some(false),
                ..TabAttributes::default()
            },
        );
        self.pump_close_queue(effects);
        true
    }

    /// Promotes the next queued node when nothing is being confirmed.
    pub(super) fn pump_close_queue(&mut self, effects: &mut Vec<Effect>) {
        while let Some(node) = self.state.close_queue.advance() {
            if let Some(file_name) = self.confirm_name(node) {
                debug!(?node, %file_name, "confirming close");
                effects.push(Effect::ShowCloseConfirm { node, file_name });
                return;
            }
            self.state.close_queue.finish_current();
        }
    }

    fn confirm_name(&self, node: NodeId) -> Option<String> {
        let panel = self.state.layout.node(node)?;
        let name = panel
            .file_key()
            .and_then(|key| self.state.files.get(&key))
            .map(|handle| handle.name().to_string())
            .unwrap_or_else(|| panel.title.clone());
        Some(name)
    }

    /// Releases the node's file handle, then removes the tab.
    pub(super) fn close_node(&mut self, node: NodeId, effects: &mut Vec<Effect>) -> bool {
        let Some(panel) = self.state.layout.node(node) else {
            return false;
        };
        let key = panel.file_key();
        self.state.editors.remove(&node);
        self.state.mounted.remove(&node);
        if let Some(key) = key {
            if let Some(handle) = self.state.files.remove(&key) {
                effects.push(Effect::FileClosed {
                    key,
                    path: handle.full_path().to_string(),
                });
            }
        }
        debug!(?node, "closing tab");
        self.state.layout.remove_tab(node)
    }

    fn confirm_close(&mut self, decision: CloseDecision, effects: &mut Vec<Effect>) -> bool {
        let Some(CurrentClose {
            node,
            phase: ClosePhase::Confirming,
        }) = self.state.close_queue.current()
        else {
            return false;
        };
        effects.push(Effect::HideCloseConfirm);

        match decision {
            CloseDecision::Save => {
                let ticket = self
                    .state
                    .editors
                    .get_mut(&node)
                    .and_then(|editor| editor.begin_save().map(|t| (editor.key(), t)));
                let Some((key, ticket)) = ticket else {
                    let name = self.confirm_name(node).unwrap_or_default();
                    effects.push(Effect::Notify(Notification::error(format!(
                        "Failed to save {}: file cannot be written",
                        name
                    ))));
                    self.abort_close_queue();
                    return true;
                };
                let Some(path) = self.state.files.get(&key).map(|h| h.full_path().to_string())
                else {
                    self.abort_close_queue();
                    return true;
                };
                self.state.close_queue.mark_saving(ticket.version);
                effects.push(Effect::WriteFile {
                    key,
                    version: ticket.version,
                    path,
                    text: ticket.text,
                });
                true
            }
            CloseDecision::Discard => {
                self.state.close_queue.finish_current();
                // Something else may already have removed the node.
                if self.state.layout.contains(node) {
                    self.close_node(node, effects);
                }
                self.pump_close_queue(effects);
                true
            }
            CloseDecision::Cancel => {
                self.abort_close_queue();
                true
            }
        }
    }

    /// Drops the whole queue and makes every dropped node closable again.
    fn abort_close_queue(&mut self) {
        let dropped = self.state.close_queue.cancel_all();
        debug!(count = dropped.len(), "close queue cancelled");
        for node in dropped {
            self.state.layout.set_attributes(
                node,
                TabAttributes {
                    closable: Some(true),
                    ..TabAttributes::default()
                },
            );
        }
    }

    fn file_saved(
        &mut self,
        key: FileKey,
        version: u64,
        error: Option<String>,
        effects: &mut Vec<Effect>,
    ) -> bool {
        let Some(node) = self.state.editor_node_for_key(key) else {
            return false;
        };
        let Some(editor) = self.state.editors.get_mut(&node) else {
            return false;
        };
        editor.finish_save(version, error.is_none());
        let still_dirty = editor.is_dirty();
        self.sync_editor_node(node);

        let closing = self.state.close_queue.current()
            == Some(CurrentClose {
                node,
                phase: ClosePhase::Saving { version },
            });

        if let Some(error) = error {
            let path = self
                .state
                .files
                .get(&key)
                .map(|h| h.full_path().to_string())
                .unwrap_or_default();
            warn!(%path, %error, "save failed");
            effects.push(Effect::Notify(Notification::error(format!(
                "Failed to save {}: {}",
                path, error
            ))));
            if closing {
                self.abort_close_queue();
            }
            return true;
        }

        if closing {
            if still_dirty {
                // Edited while the write was in flight; ask again.
                self.state.close_queue.reconfirm();
                if let Some(file_name) = self.confirm_name(node) {
                    effects.push(Effect::ShowCloseConfirm { node, file_name });
                }
            } else {
                self.state.close_queue.finish_current();
                self.close_node(node, effects);
                self.pump_close_queue(effects);
            }
        } else if !still_dirty && self.state.close_queue.contains(node) {
            // A plain save cleaned a tab that is waiting for confirmation.
            if self.state.close_queue.remove(node) {
                effects.push(Effect::HideCloseConfirm);
            }
            self.close_node(node, effects);
            self.pump_close_queue(effects);
        }
        true
    }
}
