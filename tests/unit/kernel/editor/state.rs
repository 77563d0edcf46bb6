use super::*;

fn loaded(text: &str) -> EditorPanelState {
    let mut state = EditorPanelState::new(FileKey::new(1), false);
    let id = state.begin_load();
    assert!(state.finish_load(id, Ok(text.to_string())));
    state
}

#[test]
fn load_resets_dirty_and_sets_buffer() {
    let state = loaded("print(1)\n");
    assert_eq!(state.load_state(), &LoadState::Loaded);
    assert!(!state.is_dirty());
    assert_eq!(state.text(), "print(1)\n");
}

#[test]
fn superseded_load_is_ignored() {
    let mut state = EditorPanelState::new(FileKey::new(1), false);
    let first = state.begin_load();
    let second = state.begin_load();
    assert_ne!(first, second);

    assert!(state.finish_load(second, Ok("new".to_string())));
    assert!(!state.finish_load(first, Ok("old".to_string())));
    assert_eq!(state.text(), "new");
}

#[test]
fn load_failure_leaves_empty_recoverable_state() {
    let mut state = EditorPanelState::new(FileKey::new(1), false);
    let id = state.begin_load();
    state.finish_load(id, Err("boom".to_string()));
    assert_eq!(state.load_state(), &LoadState::Failed("boom".to_string()));
    assert_eq!(state.rope().len_chars(), 0);
    assert!(!state.edit("x"));
    assert!(state.begin_save().is_none());

    let retry = state.begin_load();
    assert!(state.finish_load(retry, Ok("ok".to_string())));
    assert_eq!(state.load_state(), &LoadState::Loaded);
}

#[test]
fn edit_marks_dirty_even_when_text_round_trips() {
    let mut state = loaded("abc");
    assert!(state.edit("abcd"));
    assert!(state.edit("abc"));
    assert!(state.is_dirty());
}

#[test]
fn read_only_rejects_edits_and_saves() {
    let mut state = EditorPanelState::new(FileKey::new(1), true);
    let id = state.begin_load();
    state.finish_load(id, Ok("abc".to_string()));
    assert!(!state.edit("x"));
    assert!(!state.is_dirty());
    assert!(state.begin_save().is_none());
}

#[test]
fn successful_save_clears_dirty() {
    let mut state = loaded("a");
    state.edit("b");
    let ticket = state.begin_save().unwrap();
    assert_eq!(ticket.text, "b");
    assert!(state.is_saving());

    assert!(state.finish_save(ticket.version, true));
    assert!(!state.is_dirty());
    assert!(!state.is_saving());
}

#[test]
fn failed_save_keeps_dirty() {
    let mut state = loaded("a");
    state.edit("b");
    let ticket = state.begin_save().unwrap();
    assert!(!state.finish_save(ticket.version, false));
    assert!(state.is_dirty());
}

#[test]
fn save_of_stale_snapshot_keeps_dirty() {
    let mut state = loaded("a");
    state.edit("b");
    let ticket = state.begin_save().unwrap();
    state.edit("c");
    assert!(!state.finish_save(ticket.version, true));
    assert!(state.is_dirty());
}

#[test]
fn cursor_and_selection_are_clamped() {
    let mut state = loaded("one\ntwo\n");
    state.set_cursor(10, 10);
    assert_eq!(state.cursor(), Cursor { line: 2, column: 0 });

    state.set_cursor(0, 99);
    assert_eq!(state.cursor(), Cursor { line: 0, column: 3 });

    state.set_selection(Cursor { line: 0, column: 0 }, Cursor { line: 1, column: 2 });
    let sel = state.selection().unwrap();
    assert_eq!(sel.head, Cursor { line: 1, column: 2 });
    assert_eq!(state.cursor(), sel.head);

    state.edit("x");
    assert_eq!(state.cursor(), Cursor { line: 0, column: 1 });
    assert_eq!(state.selection(), None);
}

#[test]
fn title_reflects_dirty_and_read_only() {
    let config = WorkbenchConfig::default();
    let mut state = loaded("a");
    assert_eq!(state.display_title("main.py", &config), "main.py");
    state.edit("b");
    assert_eq!(state.display_title("main.py", &config), "\u{25cf} main.py");

    let ro = EditorPanelState::new(FileKey::new(2), true);
    assert_eq!(ro.display_title("boot.py", &config), "boot.py [RO]");
}
