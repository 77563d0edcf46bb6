use tracing::debug;

use crate::kernel::action::{OpenOptions, TabTarget};
use crate::kernel::editor::EditorPanelState;
use crate::kernel::layout::{InsertPosition, NodeId, PathMatch, SearchScope, TabSpec};
use crate::kernel::panel::{EditorPanelConfig, PanelConfig, PanelKind};
use crate::kernel::path;
use crate::kernel::services::ports::FileHandle;
use crate::kernel::{Action, Effect, Notification};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_open_action(&mut self, action: Action) -> DispatchResult {
        let mut effects = Vec::new();
        let state_changed = match action {
            Action::OpenFile { handle, options } => self.open_file(handle, options, &mut effects),
            Action::OpenTool { kind, title } => self.open_tool(kind, title, &mut effects),
            Action::SelectTab { node } => self.state.layout.select_tab(node),
            Action::ActivateTab { target } => match self.find_target(&target) {
                Some(node) if !self.state.layout.is_visible(node) => {
                    self.state.layout.select_tab(node)
                }
                _ => false,
            },
            Action::OpenTab { target } => match self.find_target(&target) {
                Some(node) => self.state.layout.select_tab(node),
                None => match target {
                    TabTarget::Kind(kind) => self.open_tool(kind, None, &mut effects),
                    TabTarget::Path(path) => self.open_file(
                        FileHandle::new(&path),
                        OpenOptions::default(),
                        &mut effects,
                    ),
                },
            },
            Action::SwitchTab { target } => match self.find_target(&target) {
                Some(node) => self.state.layout.select_tab(node),
                None => false,
            },
            Action::PanelMounted { node } => {
                if let Some(kind) = self.state.layout.node(node).map(|n| n.kind) {
                    if self.state.mounted.insert(node) {
                        effects.push(Effect::RegisterPanelBindings { node, kind });
                    }
                }
                false
            }
            _ => false,
        };
        DispatchResult::changed(state_changed, effects)
    }

    fn find_target(&self, target: &TabTarget) -> Option<NodeId> {
        match target {
            TabTarget::Kind(kind) => self
                .state
                .layout
                .find_nodes_by_kind(*kind)
                .first()
                .map(|n| n.id),
            TabTarget::Path(full_path) => self
                .state
                .layout
                .find_nodes_by_path(SearchScope::All, &path::normalize(full_path), PathMatch::Equal)
                .first()
                .map(|n| n.id),
        }
    }

    /// At most one editor per path: an already open file is only brought to
    /// front.
    fn open_file(
        &mut self,
        handle: FileHandle,
        options: OpenOptions,
        effects: &mut Vec<Effect>,
    ) -> bool {
        let full_path = handle.full_path().to_string();
        let existing = self
            .state
            .layout
            .find_nodes_by_path(SearchScope::All, &full_path, PathMatch::Equal)
            .into_iter()
            .find(|n| n.kind == PanelKind::Editor)
            .map(|n| n.id);
        if let Some(node) = existing {
            debug!(path = %full_path, ?node, "file already open");
            return self.state.layout.select_tab(node);
        }

        let key = self.state.mint_file_key();
        let mut editor = EditorPanelState::new(key, options.read_only);
        let title = editor.display_title(handle.name(), &self.state.config);
        let config = PanelConfig::Editor(EditorPanelConfig {
            file_key: Some(key),
            full_path: full_path.clone(),
            is_read_only: options.read_only,
            is_new_file: options.is_new_file,
        });
        let target = self.state.layout.active_tabset();
        let Some(node) = self.state.layout.add_tab(
            TabSpec::new(PanelKind::Editor, title).with_config(config),
            target,
            InsertPosition::End,
        ) else {
            effects.push(Effect::Notify(Notification::error(format!(
                "Failed to open {}: no tabset available",
                full_path
            ))));
            return false;
        };

        self.state.files.insert(key, handle);
        let request_id = editor.begin_load();
        self.state.editors.insert(node, editor);
        debug!(path = %full_path, %key, ?node, "opened editor");
        effects.push(Effect::LoadFile {
            key,
            request_id,
            path: full_path,
        });
        true
    }

    /// Tool panels are singletons per kind.
    fn open_tool(
        &mut self,
        kind: PanelKind,
        title: Option<String>,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if kind == PanelKind::Editor {
            effects.push(Effect::Notify(Notification::warning(
                "Editors are opened from a file",
            )));
            return false;
        }
        let existing = self
            .state
            .layout
            .find_nodes_by_kind(kind)
            .first()
            .map(|n| n.id);
        if let Some(node) = existing {
            return self.state.layout.select_tab(node);
        }
        let title = title.unwrap_or_else(|| kind.label().to_string());
        let target = self.state.layout.active_tabset();
        self.state
            .layout
            .add_tab(TabSpec::new(kind, title), target, InsertPosition::End)
            .is_some()
    }
}
