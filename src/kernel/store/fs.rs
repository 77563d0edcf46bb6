use tracing::{debug, warn};

use crate::kernel::action::{FsOutcome, FsRequest, OpenOptions};
use crate::kernel::explorer::EntryPromptKind;
use crate::kernel::layout::{NodeId, PathMatch, SearchScope, TabAttributes};
use crate::kernel::panel::{EditorPanelConfig, PanelConfig, PanelKind};
use crate::kernel::path;
use crate::kernel::services::ports::FileHandle;
use crate::kernel::{Action, Effect, Notification};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_fs_action(&mut self, action: Action) -> DispatchResult {
        let mut effects = Vec::new();
        let state_changed = match action {
            Action::Fs(request) => {
                self.issue_fs(request, &mut effects);
                true
            }
            Action::FsCompleted { request, outcome } => {
                self.fs_completed(request, outcome, &mut effects)
            }
            Action::BeginPrompt(kind) => {
                let value = match &kind {
                    EntryPromptKind::Rename { from } | EntryPromptKind::Duplicate { from } => {
                        path::file_name(from).to_string()
                    }
                    EntryPromptKind::NewFile { .. } | EntryPromptKind::NewFolder { .. } => {
                        String::new()
                    }
                };
                self.state.explorer.open_prompt(kind, value);
                if let Some(prompt) = self.state.explorer.prompt() {
                    effects.push(Effect::ShowEntryPrompt(prompt.clone()));
                }
                true
            }
            Action::SubmitPrompt { value } => self.submit_prompt(value, &mut effects),
            Action::DismissPrompt => {
                if self.state.explorer.close_prompt().is_some() {
                    effects.push(Effect::HideEntryPrompt);
                    true
                } else {
                    false
                }
            }
            Action::EntryDeleted { path } => self.entry_deleted(&path, &mut effects),
            Action::EntryRenamed { from, to } => self.entry_renamed(&from, &to, &mut effects),
            Action::EntryCreated { path, is_dir } => {
                debug!(%path, is_dir, "entry created");
                self.refresh_if_listed(path::parent(&path), &mut effects)
            }
            _ => false,
        };
        DispatchResult::changed(state_changed, effects)
    }

    fn issue_fs(&mut self, request: FsRequest, effects: &mut Vec<Effect>) {
        if request.is_folder_level() {
            self.state.explorer.begin_busy();
        }
        effects.push(Effect::Fs(request));
    }

    fn refresh_listing(&mut self, effects: &mut Vec<Effect>) {
        let path = self.state.explorer.current_dir.clone();
        self.issue_fs(FsRequest::ListFolder { path }, effects);
    }

    fn refresh_if_listed(&mut self, dir: &str, effects: &mut Vec<Effect>) -> bool {
        if path::normalize(dir) != self.state.explorer.current_dir {
            return false;
        }
        self.refresh_listing(effects);
        true
    }

    fn submit_prompt(&mut self, value: String, effects: &mut Vec<Effect>) -> bool {
        let Some(prompt) = self.state.explorer.close_prompt() else {
            return false;
        };
        let name = value.trim().to_string();
        if !path::is_valid_name(&name) {
            self.state
                .explorer
                .warn_prompt(prompt.kind, value, "Invalid name".to_string());
            if let Some(prompt) = self.state.explorer.prompt() {
                effects.push(Effect::ShowEntryPrompt(prompt.clone()));
            }
            return true;
        }
        effects.push(Effect::HideEntryPrompt);

        let target = prompt.kind.target_path(&name);
        let request = match prompt.kind {
            EntryPromptKind::NewFile { .. } => FsRequest::CreateFile { path: target },
            EntryPromptKind::NewFolder { .. } => FsRequest::CreateFolder { path: target },
            EntryPromptKind::Rename { from } => {
                if from == target {
                    return true;
                }
                FsRequest::Rename { from, to: target }
            }
            EntryPromptKind::Duplicate { from } => FsRequest::Duplicate { from, to: target },
        };
        self.issue_fs(request, effects);
        true
    }

    fn fs_completed(
        &mut self,
        request: FsRequest,
        outcome: FsOutcome,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if request.is_folder_level() {
            self.state.explorer.end_busy();
        }

        match outcome {
            FsOutcome::Conflict => {
                let target = request.conflict_target().unwrap_or_default();
                let name = path::file_name(&target).to_string();
                let warning = format!("\"{}\" already exists", name);
                match request.prompt_kind() {
                    Some(kind) => {
                        self.state.explorer.warn_prompt(kind, name, warning);
                        if let Some(prompt) = self.state.explorer.prompt() {
                            effects.push(Effect::ShowEntryPrompt(prompt.clone()));
                        }
                    }
                    None => effects.push(Effect::Notify(Notification::warning(warning))),
                }
            }
            FsOutcome::Failed(error) => {
                warn!(op = request.op_name(), path = request.subject(), %error, "fs operation failed");
                effects.push(Effect::Notify(Notification::error(format!(
                    "Failed to {} {}: {}",
                    request.op_name(),
                    request.subject(),
                    error
                ))));
            }
            FsOutcome::Listed(entries) => {
                if let FsRequest::ListFolder { path } = &request {
                    self.state.explorer.set_listing(path, entries);
                }
            }
            FsOutcome::Moved { to } => {
                if let FsRequest::Move { from, .. } = &request {
                    self.apply_entry_renamed(from, &to, effects);
                }
                self.refresh_listing(effects);
            }
            FsOutcome::Done => {
                match &request {
                    FsRequest::CreateFile { path } => {
                        self.open_created_file(path, effects);
                    }
                    FsRequest::Rename { from, to } => {
                        self.apply_entry_renamed(from, to, effects);
                    }
                    FsRequest::Move { from, to_dir } => {
                        let to = path::join(to_dir, path::file_name(from));
                        self.apply_entry_renamed(from, &to, effects);
                    }
                    FsRequest::Delete { path, .. } => {
                        self.apply_entry_deleted(path, effects);
                    }
                    _ => {}
                }
                if !matches!(request, FsRequest::ListFolder { .. }) {
                    self.refresh_listing(effects);
                }
            }
        }
        true
    }

    fn open_created_file(&mut self, path: &str, effects: &mut Vec<Effect>) {
        let result = self.reduce_open_action(Action::OpenFile {
            handle: FileHandle::new(path),
            options: OpenOptions {
                read_only: false,
                is_new_file: true,
            },
        });
        effects.extend(result.effects);
    }

    fn entry_deleted(&mut self, path: &str, effects: &mut Vec<Effect>) -> bool {
        let closed = self.apply_entry_deleted(path, effects);
        let refreshed = self.refresh_if_listed(path::parent(path), effects);
        closed || refreshed
    }

    /// Closes every tab at or below `path` without confirmation. A pending
    /// confirmation for such a tab is dropped.
    fn apply_entry_deleted(&mut self, removed: &str, effects: &mut Vec<Effect>) -> bool {
        let removed = path::normalize(removed);
        let closed = self.close_editors_within(&removed, &[], effects);
        self.state.explorer.on_entry_deleted(&removed);
        closed
    }

    fn close_editors_within(
        &mut self,
        removed: &str,
        keep: &[NodeId],
        effects: &mut Vec<Effect>,
    ) -> bool {
        let nodes: Vec<NodeId> = self
            .state
            .layout
            .find_nodes_by_path(SearchScope::All, removed, PathMatch::Within)
            .into_iter()
            .filter(|n| n.kind == PanelKind::Editor && !keep.contains(&n.id))
            .map(|n| n.id)
            .collect();

        let mut was_current = false;
        for node in &nodes {
            if self.state.close_queue.contains(*node) {
                was_current |= self.state.close_queue.remove(*node);
            }
        }
        for node in nodes.iter().rev() {
            debug!(?node, path = %removed, "closing tab of removed entry");
            self.close_node(*node, effects);
        }
        if was_current {
            effects.push(Effect::HideCloseConfirm);
            self.pump_close_queue(effects);
        }
        !nodes.is_empty()
    }

    fn entry_renamed(&mut self, from: &str, to: &str, effects: &mut Vec<Effect>) -> bool {
        let renamed = self.apply_entry_renamed(from, to, effects);
        let from_dir = self.refresh_if_listed(path::parent(from), effects);
        let to_dir =
            path::parent(from) != path::parent(to) && self.refresh_if_listed(path::parent(to), effects);
        renamed || from_dir || to_dir
    }

    /// Re-points open editors at or below `from` to their new paths. Tabs
    /// stay open and keep their state. Editors already open at the
    /// destination were overwritten and are closed.
    fn apply_entry_renamed(&mut self, from: &str, to: &str, effects: &mut Vec<Effect>) -> bool {
        let from = path::normalize(from);
        let to = path::normalize(to);
        if from == to {
            return false;
        }
        let nodes: Vec<(NodeId, String)> = self
            .state
            .layout
            .find_nodes_by_path(SearchScope::All, &from, PathMatch::Within)
            .into_iter()
            .filter(|n| n.kind == PanelKind::Editor)
            .filter_map(|n| {
                let old = n.full_path()?;
                Some((n.id, path::rebase(old, &from, &to)?))
            })
            .collect();

        let moved: Vec<NodeId> = nodes.iter().map(|(node, _)| *node).collect();
        let overwritten = self.close_editors_within(&to, &moved, effects);

        for (node, new_path) in &nodes {
            let Some(panel) = self.state.layout.node(*node) else {
                continue;
            };
            let Some(config) = panel.config.editor() else {
                continue;
            };
            let config = EditorPanelConfig {
                full_path: new_path.clone(),
                ..config.clone()
            };
            if let Some(key) = config.file_key {
                self.state.files.insert(key, FileHandle::new(new_path));
            }
            self.state.layout.set_attributes(
                *node,
                TabAttributes {
                    config: Some(PanelConfig::Editor(config)),
                    ..TabAttributes::default()
                },
            );
            debug!(?node, path = %new_path, "editor follows rename");
            self.sync_editor_node(*node);
        }
        self.state.explorer.on_entry_renamed(&from, &to);
        overwritten || !nodes.is_empty()
    }
}
