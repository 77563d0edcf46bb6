//! JSON document form of the layout.
//!
//! Editor tabs are left out: their file handles cannot survive a reload.

use serde::{Deserialize, Serialize};

use super::{BorderLocation, LayoutError, LayoutModel, NodeData, NodeId, TabSpec};
use crate::kernel::panel::{PanelConfig, PanelKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub layout: RowDocument,
    #[serde(default)]
    pub borders: Vec<BorderDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDocument {
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub children: Vec<ItemDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDocument {
    Row(RowDocument),
    Tabset(TabSetDocument),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSetDocument {
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub selected: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
    #[serde(default)]
    pub children: Vec<TabDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderDocument {
    pub location: BorderLocation,
    #[serde(default)]
    pub selected: Option<usize>,
    #[serde(default)]
    pub children: Vec<TabDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabDocument {
    pub component: PanelKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_no_config")]
    pub config: PanelConfig,
    #[serde(rename = "enableClose", default = "default_enable_close")]
    pub enable_close: bool,
}

fn default_weight() -> u32 {
    100
}

fn default_enable_close() -> bool {
    true
}

fn is_no_config(config: &PanelConfig) -> bool {
    *config == PanelConfig::None
}

impl LayoutModel {
    pub fn to_document(&self) -> Result<LayoutDocument, LayoutError> {
        let root = self.root.ok_or(LayoutError::NoTabSet)?;
        let layout = self.row_document(root);
        let borders = self
            .borders
            .iter()
            .filter_map(|id| self.border_document(*id))
            .collect();
        Ok(LayoutDocument { layout, borders })
    }

    pub fn serialize(&self) -> Result<String, LayoutError> {
        let document = self.to_document()?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Replaces the whole tree with the one described by `json`. On any
    /// failure the model is reset to the default layout and the error is
    /// returned.
    pub fn restore(&mut self, json: &str) -> Result<(), LayoutError> {
        let revision = self.revision;
        let restored = serde_json::from_str::<LayoutDocument>(json)
            .map_err(LayoutError::from)
            .and_then(|doc| Self::from_document(&doc));
        let result = match restored {
            Ok(model) => {
                *self = model;
                Ok(())
            }
            Err(e) => {
                *self = Self::new();
                Err(e)
            }
        };
        self.revision = revision.saturating_add(1);
        result
    }

    pub fn from_document(doc: &LayoutDocument) -> Result<Self, LayoutError> {
        let mut model = Self::empty();
        let root = model.insert_row(None, doc.layout.weight);
        model.root = Some(root);
        model.build_row(root, &doc.layout);
        for border in &doc.borders {
            let id = model.insert_border(border.location);
            model.build_tabs(id, &border.children, border.selected);
        }
        let tabsets = model.tabsets();
        if tabsets.is_empty() {
            return Err(LayoutError::NoTabSet);
        }
        if model.active_tabset.is_none() {
            model.active_tabset = tabsets.first().copied();
        }
        model.revision = 0;
        Ok(model)
    }

    fn build_row(&mut self, row: NodeId, doc: &RowDocument) {
        for child in &doc.children {
            match child {
                ItemDocument::Row(inner) => {
                    let id = self.insert_row(Some(row), inner.weight);
                    self.build_row(id, inner);
                }
                ItemDocument::Tabset(tabset) => {
                    let id = self.insert_tabset(row, tabset.weight);
                    self.build_tabs(id, &tabset.children, tabset.selected);
                    if tabset.active {
                        self.active_tabset = Some(id);
                    }
                }
            }
        }
    }

    fn build_tabs(&mut self, container: NodeId, tabs: &[TabDocument], selected: Option<usize>) {
        let mut kept = 0usize;
        let mut selected_kept = None;
        for (index, tab) in tabs.iter().enumerate() {
            if tab.component == PanelKind::Editor {
                continue;
            }
            let spec = TabSpec::new(tab.component, tab.name.clone())
                .with_config(PanelConfig::None)
                .closable(tab.enable_close);
            self.insert_tab(container, spec, super::InsertPosition::End);
            if selected == Some(index) {
                selected_kept = Some(kept);
            }
            kept += 1;
        }
        let is_tabset = matches!(
            self.arena.get(container).map(|n| &n.data),
            Some(NodeData::TabSet { .. })
        );
        if selected_kept.is_none() && kept > 0 && is_tabset {
            selected_kept = Some(0);
        }
        self.set_container_selected(container, selected_kept);
    }

    fn row_document(&self, row: NodeId) -> RowDocument {
        let Some(node) = self.arena.get(row) else {
            return RowDocument {
                weight: default_weight(),
                children: Vec::new(),
            };
        };
        let NodeData::Row { weight, children } = &node.data else {
            return RowDocument {
                weight: default_weight(),
                children: Vec::new(),
            };
        };
        let children = children
            .iter()
            .filter_map(|child| match self.arena.get(*child).map(|n| &n.data) {
                Some(NodeData::Row { .. }) => Some(ItemDocument::Row(self.row_document(*child))),
                Some(NodeData::TabSet { weight, .. }) => {
                    let (selected, tabs) = self.tab_documents(*child);
                    Some(ItemDocument::Tabset(TabSetDocument {
                        weight: *weight,
                        selected,
                        active: self.active_tabset == Some(*child),
                        children: tabs,
                    }))
                }
                _ => None,
            })
            .collect();
        RowDocument {
            weight: *weight,
            children,
        }
    }

    fn border_document(&self, border: NodeId) -> Option<BorderDocument> {
        let location = self.border_location(border)?;
        let (selected, children) = self.tab_documents(border);
        Some(BorderDocument {
            location,
            selected,
            children,
        })
    }

    /// Non-editor tabs of a container with the selection remapped onto them.
    fn tab_documents(&self, container: NodeId) -> (Option<usize>, Vec<TabDocument>) {
        let selected = self.selected_index(container);
        let is_tabset = matches!(
            self.arena.get(container).map(|n| &n.data),
            Some(NodeData::TabSet { .. })
        );
        let mut docs = Vec::new();
        let mut selected_kept = None;
        for (index, child) in self.children(container).iter().enumerate() {
            let Some(tab) = self.node(*child) else {
                continue;
            };
            if tab.kind == PanelKind::Editor {
                continue;
            }
            if selected == Some(index) {
                selected_kept = Some(docs.len());
            }
            docs.push(TabDocument {
                component: tab.kind,
                name: tab.title.clone(),
                config: PanelConfig::None,
                enable_close: tab.closable,
            });
        }
        if selected_kept.is_none() && selected.is_some() && !docs.is_empty() && is_tabset {
            selected_kept = Some(0);
        }
        (selected_kept, docs)
    }
}
