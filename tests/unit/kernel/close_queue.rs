use super::*;
use slotmap::SlotMap;

fn ids(n: usize) -> Vec<NodeId> {
    let mut arena: SlotMap<NodeId, ()> = SlotMap::with_key();
    (0..n).map(|_| arena.insert(())).collect()
}

#[test]
fn fifo_with_single_current() {
    let n = ids(3);
    let mut queue = CloseQueue::new();
    for id in &n {
        assert!(queue.enqueue(*id));
    }

    assert_eq!(queue.advance(), Some(n[0]));
    assert_eq!(queue.advance(), None);
    assert_eq!(queue.current_node(), Some(n[0]));

    assert_eq!(queue.finish_current(), Some(n[0]));
    assert_eq!(queue.advance(), Some(n[1]));
    queue.finish_current();
    assert_eq!(queue.advance(), Some(n[2]));
    queue.finish_current();
    assert!(queue.is_idle());
}

#[test]
fn enqueue_never_duplicates() {
    let n = ids(2);
    let mut queue = CloseQueue::new();
    assert!(queue.enqueue(n[0]));
    assert!(!queue.enqueue(n[0]));
    queue.advance();
    assert!(!queue.enqueue(n[0]));
    assert!(queue.enqueue(n[1]));
    assert_eq!(queue.len(), 2);
}

#[test]
fn cancel_drops_everything() {
    let n = ids(3);
    let mut queue = CloseQueue::new();
    for id in &n {
        queue.enqueue(*id);
    }
    queue.advance();
    assert_eq!(queue.cancel_all(), n);
    assert!(queue.is_idle());
    assert_eq!(queue.advance(), None);
}

#[test]
fn saving_phase_round_trip() {
    let n = ids(1);
    let mut queue = CloseQueue::new();
    queue.enqueue(n[0]);
    assert!(!queue.mark_saving(1));
    queue.advance();
    assert!(queue.mark_saving(4));
    assert_eq!(
        queue.current().map(|c| c.phase),
        Some(ClosePhase::Saving { version: 4 })
    );
    assert!(!queue.mark_saving(5));
    queue.reconfirm();
    assert_eq!(
        queue.current().map(|c| c.phase),
        Some(ClosePhase::Confirming)
    );
}

#[test]
fn remove_reports_current() {
    let n = ids(3);
    let mut queue = CloseQueue::new();
    for id in &n {
        queue.enqueue(*id);
    }
    queue.advance();
    assert!(!queue.remove(n[2]));
    assert_eq!(queue.pending().collect::<Vec<_>>(), vec![n[1]]);
    assert!(queue.remove(n[0]));
    assert_eq!(queue.current(), None);
    assert_eq!(queue.advance(), Some(n[1]));
}
