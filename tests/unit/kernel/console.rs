use super::*;

#[test]
fn splits_lines_across_chunks() {
    let mut console = ConsoleState::new(10);
    assert_eq!(console.push_bytes(b"hel"), 0);
    assert_eq!(console.partial(), "hel");
    assert_eq!(console.push_bytes(b"lo\r\nwor"), 1);
    assert_eq!(console.push_bytes(b"ld\n"), 1);

    let lines: Vec<_> = console.lines().collect();
    assert_eq!(lines, vec!["hello", "world"]);
    assert_eq!(console.partial(), "");
}

#[test]
fn empty_lines_are_kept() {
    let mut console = ConsoleState::new(10);
    assert_eq!(console.push_bytes(b"\n\n>>> "), 2);
    assert_eq!(console.len(), 2);
    assert_eq!(console.partial(), ">>> ");
}

#[test]
fn scrollback_is_bounded() {
    let mut console = ConsoleState::new(2);
    console.push_bytes(b"a\nb\nc\n");
    let lines: Vec<_> = console.lines().collect();
    assert_eq!(lines, vec!["b", "c"]);

    console.set_scrollback(1);
    assert_eq!(console.lines().collect::<Vec<_>>(), vec!["c"]);
}

#[test]
fn invalid_utf8_is_replaced() {
    let mut console = ConsoleState::new(4);
    console.push_bytes(&[0xff, b'o', b'k', b'\n']);
    assert_eq!(console.lines().next(), Some("\u{fffd}ok"));
}

#[test]
fn clear_drops_partial_too() {
    let mut console = ConsoleState::new(4);
    console.push_bytes(b"x\ny");
    console.clear();
    assert!(console.is_empty());
    assert_eq!(console.partial(), "");
}

#[test]
fn long_unterminated_tail_is_flushed() {
    let mut console = ConsoleState::new(4);
    let noise = vec![b'x'; MAX_PARTIAL + 10];
    assert_eq!(console.push_bytes(&noise), 1);
    assert_eq!(console.lines().next().map(str::len), Some(MAX_PARTIAL));
    assert_eq!(console.partial().len(), 10);
}
