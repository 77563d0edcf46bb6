//! Dockable layout model: an arena of rows, tabsets, borders and tab leaves.
//!
//! Every structural change goes through [`LayoutAction`] so listeners only
//! ever observe a consistent tree. Parent/child links are arena ids.

mod persist;

use slotmap::{new_key_type, SlotMap};
use std::fmt;

use super::panel::{FileKey, PanelConfig, PanelKind, StatusClass};
use super::path;

pub use persist::{
    BorderDocument, ItemDocument, LayoutDocument, RowDocument, TabDocument, TabSetDocument,
};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderLocation {
    Left,
    Right,
    Top,
    Bottom,
}

/// A tab leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelNode {
    pub id: NodeId,
    pub kind: PanelKind,
    pub title: String,
    pub config: PanelConfig,
    pub closable: bool,
    pub status_class: Option<StatusClass>,
}

impl PanelNode {
    pub fn full_path(&self) -> Option<&str> {
        self.config.editor().map(|c| c.full_path.as_str())
    }

    pub fn file_key(&self) -> Option<FileKey> {
        self.config.editor().and_then(|c| c.file_key)
    }

    pub fn is_unsaved(&self) -> bool {
        self.status_class == Some(StatusClass::Unsaved)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabSpec {
    pub kind: PanelKind,
    pub title: String,
    pub config: PanelConfig,
    pub closable: bool,
}

impl TabSpec {
    pub fn new(kind: PanelKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            config: PanelConfig::None,
            closable: true,
        }
    }

    pub fn with_config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    #[default]
    End,
    Index(usize),
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabAttributes {
    pub title: Option<String>,
    pub closable: Option<bool>,
    pub status_class: Option<Option<StatusClass>>,
    pub config: Option<PanelConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutAction {
    AddTab {
        tab: TabSpec,
        target: Option<NodeId>,
        position: InsertPosition,
    },
    RemoveTab(NodeId),
    SelectTab(NodeId),
    RenameTab {
        node: NodeId,
        title: String,
    },
    SetAttributes {
        node: NodeId,
        attrs: TabAttributes,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Added(NodeId),
    Applied,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Root,
    Borders,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    Equal,
    /// Plain string prefix.
    StartsWith,
    /// Equal, or below the given directory.
    Within,
}

impl PathMatch {
    fn matches(self, candidate: &str, path: &str) -> bool {
        match self {
            Self::Equal => candidate == path,
            Self::StartsWith => candidate.starts_with(path),
            Self::Within => path::is_within(candidate, path),
        }
    }
}

#[derive(Debug)]
pub enum LayoutError {
    Malformed(serde_json::Error),
    NoTabSet,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Malformed(e) => write!(f, "malformed layout: {}", e),
            LayoutError::NoTabSet => write!(f, "layout has no tabset"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Malformed(e) => Some(e),
            LayoutError::NoTabSet => None,
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Malformed(e)
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Row {
        weight: u32,
        children: Vec<NodeId>,
    },
    TabSet {
        weight: u32,
        children: Vec<NodeId>,
        selected: Option<usize>,
    },
    Border {
        location: BorderLocation,
        children: Vec<NodeId>,
        selected: Option<usize>,
    },
    Tab(PanelNode),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone)]
pub struct LayoutModel {
    arena: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
    borders: Vec<NodeId>,
    active_tabset: Option<NodeId>,
    revision: u64,
}

impl Default for LayoutModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutModel {
    /// The built-in default layout.
    pub fn new() -> Self {
        let mut model = Self::empty();
        let root = model.insert_row(None, 100);
        model.root = Some(root);
        let main = model.insert_tabset(root, 100);
        model.active_tabset = Some(main);
        model.insert_tab(main, TabSpec::new(PanelKind::Info, "Welcome"), InsertPosition::End);
        model.set_container_selected(main, Some(0));

        let left = model.insert_border(BorderLocation::Left);
        model.insert_tab(
            left,
            TabSpec::new(PanelKind::FolderView, PanelKind::FolderView.label()).closable(false),
            InsertPosition::End,
        );
        model.set_container_selected(left, Some(0));

        let bottom = model.insert_border(BorderLocation::Bottom);
        model.insert_tab(
            bottom,
            TabSpec::new(PanelKind::Console, PanelKind::Console.label()).closable(false),
            InsertPosition::End,
        );
        model.revision = 0;
        model
    }

    pub fn empty() -> Self {
        Self {
            arena: SlotMap::with_key(),
            root: None,
            borders: Vec::new(),
            active_tabset: None,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn borders(&self) -> &[NodeId] {
        &self.borders
    }

    pub fn border_location(&self, id: NodeId) -> Option<BorderLocation> {
        match self.arena.get(id).map(|n| &n.data) {
            Some(NodeData::Border { location, .. }) => Some(*location),
            _ => None,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&PanelNode> {
        match self.arena.get(id).map(|n| &n.data) {
            Some(NodeData::Tab(tab)) => Some(tab),
            _ => None,
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        matches!(
            self.arena.get(id).map(|n| &n.data),
            Some(NodeData::TabSet { .. } | NodeData::Border { .. })
        )
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    /// Tab children of a tabset or border.
    pub fn children(&self, container: NodeId) -> &[NodeId] {
        match self.arena.get(container).map(|n| &n.data) {
            Some(NodeData::TabSet { children, .. } | NodeData::Border { children, .. }) => {
                children
            }
            _ => &[],
        }
    }

    /// All tabs sharing `id`'s container, `id` included, in display order.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.parent(id)
            .map(|p| self.children(p).to_vec())
            .unwrap_or_default()
    }

    fn selected_index(&self, container: NodeId) -> Option<usize> {
        match self.arena.get(container).map(|n| &n.data) {
            Some(NodeData::TabSet { selected, .. } | NodeData::Border { selected, .. }) => *selected,
            _ => None,
        }
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id).filter(|_| self.contains(id)) else {
            return false;
        };
        let Some(selected) = self.selected_index(parent) else {
            return false;
        };
        self.children(parent).get(selected) == Some(&id)
    }

    pub fn active_visible_child(&self, container: NodeId) -> Option<&PanelNode> {
        let selected = self.selected_index(container)?;
        let child = *self.children(container).get(selected)?;
        self.node(child)
    }

    pub fn active_tabset(&self) -> Option<NodeId> {
        self.active_tabset.filter(|id| self.arena.contains_key(*id))
    }

    pub fn active_node(&self) -> Option<&PanelNode> {
        self.active_tabset()
            .and_then(|tabset| self.active_visible_child(tabset))
    }

    pub fn active_node_id(&self) -> Option<NodeId> {
        self.active_node().map(|n| n.id)
    }

    /// Tabsets of the main tree, depth first.
    pub fn tabsets(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.visit(root, &mut |id, data| {
                if matches!(data, NodeData::TabSet { .. }) {
                    out.push(id);
                }
            });
        }
        out
    }

    fn visit(&self, id: NodeId, f: &mut dyn FnMut(NodeId, &NodeData)) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        f(id, &node.data);
        match &node.data {
            NodeData::Row { children, .. }
            | NodeData::TabSet { children, .. }
            | NodeData::Border { children, .. } => {
                for child in children {
                    self.visit(*child, f);
                }
            }
            NodeData::Tab(_) => {}
        }
    }

    /// Tab leaves in traversal order: the main tree depth first, then borders.
    pub fn tabs(&self, scope: SearchScope) -> Vec<&PanelNode> {
        let mut ids = Vec::new();
        let mut collect = |id: NodeId, data: &NodeData| {
            if matches!(data, NodeData::Tab(_)) {
                ids.push(id);
            }
        };
        if matches!(scope, SearchScope::Root | SearchScope::All) {
            if let Some(root) = self.root {
                self.visit(root, &mut collect);
            }
        }
        if matches!(scope, SearchScope::Borders | SearchScope::All) {
            for border in &self.borders {
                self.visit(*border, &mut collect);
            }
        }
        ids.into_iter().filter_map(|id| self.node(id)).collect()
    }

    pub fn find_nodes_by_path(
        &self,
        scope: SearchScope,
        full_path: &str,
        mode: PathMatch,
    ) -> Vec<&PanelNode> {
        self.tabs(scope)
            .into_iter()
            .filter(|tab| {
                tab.full_path()
                    .is_some_and(|candidate| mode.matches(candidate, full_path))
            })
            .collect()
    }

    pub fn find_nodes_by_kind(&self, kind: PanelKind) -> Vec<&PanelNode> {
        self.tabs(SearchScope::All)
            .into_iter()
            .filter(|tab| tab.kind == kind)
            .collect()
    }

    pub fn do_action(&mut self, action: LayoutAction) -> ActionOutcome {
        let outcome = match action {
            LayoutAction::AddTab {
                tab,
                target,
                position,
            } => self.apply_add(tab, target, position),
            LayoutAction::RemoveTab(id) => self.apply_remove(id),
            LayoutAction::SelectTab(id) => self.apply_select(id),
            LayoutAction::RenameTab { node, title } => self.apply_attributes(
                node,
                TabAttributes {
                    title: Some(title),
                    ..TabAttributes::default()
                },
            ),
            LayoutAction::SetAttributes { node, attrs } => self.apply_attributes(node, attrs),
        };
        if outcome != ActionOutcome::Ignored {
            self.revision = self.revision.saturating_add(1);
        }
        outcome
    }

    pub fn add_tab(
        &mut self,
        tab: TabSpec,
        target: Option<NodeId>,
        position: InsertPosition,
    ) -> Option<NodeId> {
        match self.do_action(LayoutAction::AddTab {
            tab,
            target,
            position,
        }) {
            ActionOutcome::Added(id) => Some(id),
            _ => None,
        }
    }

    pub fn remove_tab(&mut self, id: NodeId) -> bool {
        self.do_action(LayoutAction::RemoveTab(id)) != ActionOutcome::Ignored
    }

    pub fn select_tab(&mut self, id: NodeId) -> bool {
        self.do_action(LayoutAction::SelectTab(id)) != ActionOutcome::Ignored
    }

    pub fn rename_tab(&mut self, id: NodeId, title: impl Into<String>) -> bool {
        self.do_action(LayoutAction::RenameTab {
            node: id,
            title: title.into(),
        }) != ActionOutcome::Ignored
    }

    pub fn set_attributes(&mut self, id: NodeId, attrs: TabAttributes) -> bool {
        self.do_action(LayoutAction::SetAttributes { node: id, attrs }) != ActionOutcome::Ignored
    }

    fn resolve_container(&mut self, target: Option<NodeId>) -> Option<NodeId> {
        if let Some(target) = target {
            if self.is_container(target) {
                return Some(target);
            }
            if self.contains(target) {
                return self.parent(target);
            }
        }
        if let Some(active) = self.active_tabset() {
            return Some(active);
        }
        if let Some(first) = self.tabsets().first().copied() {
            return Some(first);
        }
        let root = self.root?;
        let tabset = self.insert_tabset(root, 100);
        self.active_tabset = Some(tabset);
        Some(tabset)
    }

    fn apply_add(
        &mut self,
        tab: TabSpec,
        target: Option<NodeId>,
        position: InsertPosition,
    ) -> ActionOutcome {
        let Some(container) = self.resolve_container(target) else {
            return ActionOutcome::Ignored;
        };
        let id = self.insert_tab(container, tab, position);
        self.apply_select(id);
        ActionOutcome::Added(id)
    }

    fn apply_select(&mut self, id: NodeId) -> ActionOutcome {
        let Some(parent) = self.parent(id).filter(|_| self.contains(id)) else {
            return ActionOutcome::Ignored;
        };
        let Some(index) = self.children(parent).iter().position(|c| *c == id) else {
            return ActionOutcome::Ignored;
        };
        let is_tabset = matches!(
            self.arena.get(parent).map(|n| &n.data),
            Some(NodeData::TabSet { .. })
        );
        let was_selected = self.selected_index(parent) == Some(index);
        let was_active = !is_tabset || self.active_tabset == Some(parent);
        if was_selected && was_active {
            return ActionOutcome::Ignored;
        }
        self.set_container_selected(parent, Some(index));
        if is_tabset {
            self.active_tabset = Some(parent);
        }
        ActionOutcome::Applied
    }

    fn apply_remove(&mut self, id: NodeId) -> ActionOutcome {
        let Some(parent) = self.parent(id).filter(|_| self.contains(id)) else {
            return ActionOutcome::Ignored;
        };
        let Some(node) = self.arena.get_mut(parent) else {
            return ActionOutcome::Ignored;
        };
        match &mut node.data {
            NodeData::TabSet {
                children, selected, ..
            } => {
                let Some(index) = children.iter().position(|c| *c == id) else {
                    return ActionOutcome::Ignored;
                };
                children.remove(index);
                *selected = match *selected {
                    _ if children.is_empty() => None,
                    Some(sel) if sel > index => Some(sel - 1),
                    Some(sel) if sel >= children.len() => Some(children.len() - 1),
                    Some(sel) => Some(sel),
                    None => Some(0),
                };
            }
            NodeData::Border {
                children, selected, ..
            } => {
                let Some(index) = children.iter().position(|c| *c == id) else {
                    return ActionOutcome::Ignored;
                };
                children.remove(index);
                *selected = match *selected {
                    Some(sel) if sel == index => None,
                    Some(sel) if sel > index => Some(sel - 1),
                    other => other,
                };
            }
            _ => return ActionOutcome::Ignored,
        }
        self.arena.remove(id);
        ActionOutcome::Applied
    }

    fn apply_attributes(&mut self, id: NodeId, attrs: TabAttributes) -> ActionOutcome {
        let Some(Node {
            data: NodeData::Tab(tab),
            ..
        }) = self.arena.get_mut(id)
        else {
            return ActionOutcome::Ignored;
        };

        let mut changed = false;
        if let Some(title) = attrs.title {
            if tab.title != title {
                tab.title = title;
                changed = true;
            }
        }
        if let Some(closable) = attrs.closable {
            if tab.closable != closable {
                tab.closable = closable;
                changed = true;
            }
        }
        if let Some(status_class) = attrs.status_class {
            if tab.status_class != status_class {
                tab.status_class = status_class;
                changed = true;
            }
        }
        if let Some(config) = attrs.config {
            if tab.config != config {
                tab.config = config;
                changed = true;
            }
        }

        if changed {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Ignored
        }
    }

    fn insert_row(&mut self, parent: Option<NodeId>, weight: u32) -> NodeId {
        let id = self.arena.insert(Node {
            parent,
            data: NodeData::Row {
                weight,
                children: Vec::new(),
            },
        });
        if let Some(parent) = parent {
            self.push_child(parent, id, InsertPosition::End);
        }
        id
    }

    fn insert_tabset(&mut self, parent: NodeId, weight: u32) -> NodeId {
        let id = self.arena.insert(Node {
            parent: Some(parent),
            data: NodeData::TabSet {
                weight,
                children: Vec::new(),
                selected: None,
            },
        });
        self.push_child(parent, id, InsertPosition::End);
        id
    }

    fn insert_border(&mut self, location: BorderLocation) -> NodeId {
        let id = self.arena.insert(Node {
            parent: None,
            data: NodeData::Border {
                location,
                children: Vec::new(),
                selected: None,
            },
        });
        self.borders.push(id);
        id
    }

    fn insert_tab(&mut self, container: NodeId, tab: TabSpec, position: InsertPosition) -> NodeId {
        let id = self.arena.insert_with_key(|id| Node {
            parent: Some(container),
            data: NodeData::Tab(PanelNode {
                id,
                kind: tab.kind,
                title: tab.title,
                config: tab.config,
                closable: tab.closable,
                status_class: None,
            }),
        });
        self.push_child(container, id, position);
        id
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId, position: InsertPosition) {
        let Some(node) = self.arena.get_mut(parent) else {
            return;
        };
        match &mut node.data {
            NodeData::Row { children, .. } => children.push(child),
            NodeData::TabSet {
                children, selected, ..
            }
            | NodeData::Border {
                children, selected, ..
            } => {
                let index = match position {
                    InsertPosition::End => children.len(),
                    InsertPosition::Index(i) => i.min(children.len()),
                };
                children.insert(index, child);
                if let Some(sel) = selected.as_mut() {
                    if *sel >= index && children.len() > 1 {
                        *sel += 1;
                    }
                }
            }
            NodeData::Tab(_) => {}
        }
    }

    fn set_container_selected(&mut self, container: NodeId, index: Option<usize>) {
        if let Some(node) = self.arena.get_mut(container) {
            if let NodeData::TabSet {
                children, selected, ..
            }
            | NodeData::Border {
                children, selected, ..
            } = &mut node.data
            {
                *selected = index.filter(|i| *i < children.len());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/layout.rs"]
mod tests;
