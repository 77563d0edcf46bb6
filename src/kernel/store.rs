//! Workspace/tab controller: the single entry point that opens, focuses and
//! closes panels and runs the close-confirmation protocol.

mod close;
mod console;
mod editor;
mod fs;
mod open;

use tracing::{debug, warn};

use super::layout::{NodeId, PanelNode, TabAttributes};
use super::panel::{PanelContent, PanelRegistry, PanelView, StatusClass};
use super::{Action, Effect, Notification, WorkspaceState};

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(state_changed: bool, effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed,
        }
    }
}

pub struct Store {
    state: WorkspaceState,
    registry: PanelRegistry,
}

impl Store {
    pub fn new(state: WorkspaceState) -> Self {
        Self::with_registry(state, PanelRegistry::with_defaults())
    }

    pub fn with_registry(state: WorkspaceState, registry: PanelRegistry) -> Self {
        Self { state, registry }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn active_node(&self) -> Option<&PanelNode> {
        self.state.layout.active_node()
    }

    pub fn panel_content(&self, node: NodeId) -> Option<PanelContent> {
        let panel = self.state.layout.node(node)?;
        let handle = panel.file_key().and_then(|key| self.state.files.get(&key));
        let view = PanelView {
            node: panel,
            handle,
            editor: self.state.editors.get(&node),
            explorer: &self.state.explorer,
            console: &self.state.console,
        };
        Some(self.registry.content(&view))
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let active_before = self.state.layout.active_node_id();
        let revision_before = self.state.layout.revision();

        let mut result = self.reduce(action);

        let revision = self.state.layout.revision();
        if revision != revision_before {
            result.state_changed = true;
            result.effects.push(Effect::LayoutChanged { revision });
        }
        let active = self.state.layout.active_node_id();
        if active != active_before {
            debug!(?active, "active panel changed");
            result.state_changed = true;
            result.effects.push(Effect::ActivePanelChanged(active));
        }
        result
    }

    fn reduce(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenFile { .. }
            | Action::OpenTool { .. }
            | Action::SelectTab { .. }
            | Action::ActivateTab { .. }
            | Action::OpenTab { .. }
            | Action::SwitchTab { .. }
            | Action::PanelMounted { .. } => self.reduce_open_action(action),
            Action::RequestClose { .. }
            | Action::CloseTabs { .. }
            | Action::CloseBatch { .. }
            | Action::ConfirmClose(_)
            | Action::FileSaved { .. } => self.reduce_close_action(action),
            Action::Edit { .. }
            | Action::Save { .. }
            | Action::MoveCursor { .. }
            | Action::SetSelection { .. }
            | Action::FileLoaded { .. } => self.reduce_editor_action(action),
            Action::Fs(_)
            | Action::FsCompleted { .. }
            | Action::BeginPrompt(_)
            | Action::SubmitPrompt { .. }
            | Action::DismissPrompt
            | Action::EntryDeleted { .. }
            | Action::EntryRenamed { .. }
            | Action::EntryCreated { .. } => self.reduce_fs_action(action),
            Action::SerialData(_) | Action::ConsoleSend(_) | Action::ConsoleClear => {
                self.reduce_console_action(action)
            }
            Action::RestoreLayout { json } => self.restore_layout(&json),
        }
    }

    fn restore_layout(&mut self, json: &str) -> DispatchResult {
        if !self.state.editors.is_empty() {
            return DispatchResult::changed(
                false,
                vec![Effect::Notify(Notification::warning(
                    "Close all editors before restoring the layout",
                ))],
            );
        }
        self.state.mounted.clear();
        let mut effects = Vec::new();
        if let Err(e) = self.state.layout.restore(json) {
            warn!(error = %e, "layout restore failed, using default layout");
            effects.push(Effect::Notify(Notification::warning(format!(
                "Could not restore layout ({}); using the default layout",
                e
            ))));
        }
        DispatchResult::changed(true, effects)
    }

    /// Mirrors an editor's dirty bit and path into its tab's title and
    /// status class.
    fn sync_editor_node(&mut self, node: NodeId) {
        let Some(editor) = self.state.editors.get(&node) else {
            return;
        };
        let Some(handle) = self.state.files.get(&editor.key()) else {
            return;
        };
        let title = editor.display_title(handle.name(), &self.state.config);
        let status_class = editor.is_dirty().then_some(StatusClass::Unsaved);
        self.state.layout.set_attributes(
            node,
            TabAttributes {
                title: Some(title),
                status_class: Some(status_class),
                ..TabAttributes::default()
            },
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
