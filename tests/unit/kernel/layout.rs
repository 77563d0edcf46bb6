use super::*;
use crate::kernel::panel::EditorPanelConfig;

fn editor_spec(path: &str) -> TabSpec {
    TabSpec::new(PanelKind::Editor, path::file_name(path)).with_config(PanelConfig::Editor(
        EditorPanelConfig {
            file_key: None,
            full_path: path.to_string(),
            is_read_only: false,
            is_new_file: false,
        },
    ))
}

fn main_tabset(model: &LayoutModel) -> NodeId {
    model.tabsets()[0]
}

#[test]
fn default_layout_shape() {
    let model = LayoutModel::new();
    assert_eq!(model.revision(), 0);
    assert_eq!(model.tabsets().len(), 1);

    let active = model.active_node().unwrap();
    assert_eq!(active.kind, PanelKind::Info);
    assert_eq!(active.title, "Welcome");

    let borders = model.borders();
    assert_eq!(borders.len(), 2);
    assert_eq!(model.border_location(borders[0]), Some(BorderLocation::Left));
    assert_eq!(model.border_location(borders[1]), Some(BorderLocation::Bottom));

    let files = model.find_nodes_by_kind(PanelKind::FolderView)[0];
    assert!(!files.closable);
    assert!(model.is_visible(files.id));

    let console = model.find_nodes_by_kind(PanelKind::Console)[0];
    assert!(!console.closable);
    assert!(!model.is_visible(console.id));
}

#[test]
fn add_select_and_remove_keep_selection_consistent() {
    let mut model = LayoutModel::new();
    let tabset = main_tabset(&model);
    let welcome = model.children(tabset)[0];

    let a = model
        .add_tab(editor_spec("/a.py"), None, InsertPosition::End)
        .unwrap();
    let b = model
        .add_tab(editor_spec("/b.py"), Some(tabset), InsertPosition::End)
        .unwrap();
    assert_eq!(model.children(tabset), &[welcome, a, b]);
    assert_eq!(model.active_node_id(), Some(b));
    assert_eq!(model.revision(), 2);

    assert!(model.select_tab(a));
    assert!(!model.select_tab(a));
    assert_eq!(model.revision(), 3);

    // Removing a tab left of the selection shifts it.
    assert!(model.remove_tab(welcome));
    assert_eq!(model.active_node_id(), Some(a));

    // Removing the selected last tab selects the new last one.
    assert!(model.select_tab(b));
    assert!(model.remove_tab(b));
    assert_eq!(model.active_node_id(), Some(a));
    assert!(!model.contains(b));
    assert!(!model.remove_tab(b));

    assert!(model.remove_tab(a));
    assert_eq!(model.active_node_id(), None);
    assert!(model.children(tabset).is_empty());
}

#[test]
fn insert_at_index_shifts_selection() {
    let mut model = LayoutModel::new();
    let tabset = main_tabset(&model);
    let welcome = model.children(tabset)[0];

    let first = model
        .add_tab(editor_spec("/x.py"), Some(welcome), InsertPosition::Index(0))
        .unwrap();
    assert_eq!(model.children(tabset), &[first, welcome]);
    assert!(model.is_visible(first));
    assert!(!model.is_visible(welcome));
}

#[test]
fn removing_selected_border_tab_collapses_border() {
    let mut model = LayoutModel::new();
    let files = model.find_nodes_by_kind(PanelKind::FolderView)[0].id;
    let left = model.parent(files).unwrap();

    assert!(model.remove_tab(files));
    assert!(model.children(left).is_empty());
    assert!(model.active_visible_child(left).is_none());
}

#[test]
fn selecting_border_tab_keeps_active_tabset() {
    let mut model = LayoutModel::new();
    let tabset = main_tabset(&model);
    let console = model.find_nodes_by_kind(PanelKind::Console)[0].id;

    assert!(model.select_tab(console));
    assert!(model.is_visible(console));
    assert_eq!(model.active_tabset(), Some(tabset));
    assert_eq!(model.active_node().unwrap().kind, PanelKind::Info);
}

#[test]
fn set_attributes_without_change_is_ignored() {
    let mut model = LayoutModel::new();
    let welcome = model.active_node_id().unwrap();

    assert!(!model.rename_tab(welcome, "Welcome"));
    assert_eq!(model.revision(), 0);

    assert!(model.set_attributes(
        welcome,
        TabAttributes {
            status_class: Some(Some(StatusClass::Unsaved)),
            closable: Some(false),
            ..TabAttributes::default()
        }
    ));
    assert_eq!(model.revision(), 1);
    let node = model.node(welcome).unwrap();
    assert!(node.is_unsaved());
    assert!(!node.closable);

    assert_eq!(
        model.do_action(LayoutAction::SetAttributes {
            node: welcome,
            attrs: TabAttributes::default(),
        }),
        ActionOutcome::Ignored
    );
    assert_eq!(model.revision(), 1);
}

#[test]
fn find_nodes_by_path_modes() {
    let mut model = LayoutModel::new();
    for path in ["/lib", "/lib/util.py", "/library.py", "/main.py"] {
        model.add_tab(editor_spec(path), None, InsertPosition::End);
    }

    let paths = |nodes: Vec<&PanelNode>| {
        nodes
            .into_iter()
            .filter_map(|n| n.full_path().map(str::to_string))
            .collect::<Vec<_>>()
    };

    assert_eq!(
        paths(model.find_nodes_by_path(SearchScope::All, "/lib", PathMatch::Equal)),
        vec!["/lib"]
    );
    assert_eq!(
        paths(model.find_nodes_by_path(SearchScope::Root, "/lib", PathMatch::StartsWith)),
        vec!["/lib", "/lib/util.py", "/library.py"]
    );
    assert_eq!(
        paths(model.find_nodes_by_path(SearchScope::All, "/lib", PathMatch::Within)),
        vec!["/lib", "/lib/util.py"]
    );
    assert!(model
        .find_nodes_by_path(SearchScope::Borders, "/main.py", PathMatch::Equal)
        .is_empty());
}

#[test]
fn serialize_strips_editors_and_remaps_selection() {
    let mut model = LayoutModel::new();
    let settings = model
        .add_tab(TabSpec::new(PanelKind::Settings, "Settings"), None, InsertPosition::End)
        .unwrap();
    model.add_tab(editor_spec("/main.py"), None, InsertPosition::Index(0));
    model.select_tab(settings);

    let json = model.serialize().unwrap();
    assert!(!json.contains("main.py"));
    assert!(!json.contains("\"editor\""));

    let doc: LayoutDocument = serde_json::from_str(&json).unwrap();
    let ItemDocument::Tabset(tabset) = &doc.layout.children[0] else {
        panic!("expected a tabset");
    };
    assert!(tabset.active);
    assert_eq!(tabset.children.len(), 2);
    assert_eq!(tabset.selected, Some(1));
    assert_eq!(tabset.children[1].component, PanelKind::Settings);

    let mut restored = LayoutModel::new();
    restored.restore(&json).unwrap();
    assert_eq!(restored.revision(), 1);
    assert_eq!(restored.active_node().unwrap().kind, PanelKind::Settings);
    assert!(restored.find_nodes_by_kind(PanelKind::Editor).is_empty());
    let files = restored.find_nodes_by_kind(PanelKind::FolderView)[0];
    assert!(!files.closable);
}

#[test]
fn selected_editor_falls_back_to_first_kept_tab() {
    let mut model = LayoutModel::new();
    model.add_tab(editor_spec("/main.py"), None, InsertPosition::End);

    let doc = model.to_document().unwrap();
    let ItemDocument::Tabset(tabset) = &doc.layout.children[0] else {
        panic!("expected a tabset");
    };
    assert_eq!(tabset.selected, Some(0));
    assert_eq!(tabset.children[0].component, PanelKind::Info);
}

#[test]
fn restore_reads_hand_written_document() {
    let json = r#"{
        "layout": {
            "children": [
                { "type": "tabset", "selected": 1, "children": [
                    { "component": "editor", "name": "main.py",
                      "config": { "fullPath": "/main.py" } },
                    { "component": "dashboard", "name": "Board" }
                ] },
                { "type": "row", "children": [
                    { "type": "tabset", "active": true, "children": [
                        { "component": "navigation", "name": "Nav", "enableClose": false }
                    ] }
                ] }
            ]
        },
        "borders": [
            { "location": "right", "children": [ { "component": "console", "name": "REPL" } ] }
        ]
    }"#;

    let mut model = LayoutModel::new();
    model.restore(json).unwrap();

    let tabsets = model.tabsets();
    assert_eq!(tabsets.len(), 2);
    assert_eq!(model.active_tabset(), Some(tabsets[1]));
    let nav = model.active_node().unwrap();
    assert_eq!(nav.kind, PanelKind::Navigation);
    assert!(!nav.closable);

    let board = model.active_visible_child(tabsets[0]).unwrap();
    assert_eq!(board.kind, PanelKind::Dashboard);
    assert!(model.find_nodes_by_kind(PanelKind::Editor).is_empty());

    let border = model.borders()[0];
    assert_eq!(model.border_location(border), Some(BorderLocation::Right));
    assert!(model.active_visible_child(border).is_none());
}

#[test]
fn malformed_document_falls_back_to_default() {
    let mut model = LayoutModel::new();
    model.add_tab(TabSpec::new(PanelKind::Tool, "Flash"), None, InsertPosition::End);
    let revision = model.revision();

    let err = model.restore("{ not json").unwrap_err();
    assert!(matches!(err, LayoutError::Malformed(_)));
    assert!(model.find_nodes_by_kind(PanelKind::Tool).is_empty());
    assert_eq!(model.active_node().unwrap().kind, PanelKind::Info);
    assert_eq!(model.revision(), revision + 1);

    let err = model
        .restore(r#"{ "layout": { "children": [] } }"#)
        .unwrap_err();
    assert!(matches!(err, LayoutError::NoTabSet));
    assert!(err.to_string().contains("no tabset"));
}
