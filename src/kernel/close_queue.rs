//! Backlog of dirty panels waiting for a save/discard/cancel decision.
//!
//! At most one entry is current; the next one is only promoted once the
//! current one has been resolved.

use std::collections::VecDeque;

use super::layout::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePhase {
    /// The confirmation prompt is showing.
    Confirming,
    /// Save was chosen; waiting for the write of `version`.
    Saving { version: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentClose {
    pub node: NodeId,
    pub phase: ClosePhase,
}

#[derive(Debug, Default)]
pub struct CloseQueue {
    pending: VecDeque<NodeId>,
    current: Option<CurrentClose>,
}

impl CloseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    pub fn current(&self) -> Option<CurrentClose> {
        self.current
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.current.map(|c| c.node)
    }

    pub fn pending(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.pending.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.current_node() == Some(node) || self.pending.contains(&node)
    }

    /// Appends `node` unless it is already queued or current.
    pub fn enqueue(&mut self, node: NodeId) -> bool {
        if self.contains(node) {
            return false;
        }
        self.pending.push_back(node);
        true
    }

    /// Promotes the head of the backlog when nothing is current. Returns the
    /// newly promoted node.
    pub fn advance(&mut self) -> Option<NodeId> {
        if self.current.is_some() {
            return None;
        }
        let node = self.pending.pop_front()?;
        self.current = Some(CurrentClose {
            node,
            phase: ClosePhase::Confirming,
        });
        Some(node)
    }

    pub fn mark_saving(&mut self, version: u64) -> bool {
        match self.current.as_mut() {
            Some(current) if current.phase == ClosePhase::Confirming => {
                current.phase = ClosePhase::Saving { version };
                true
            }
            _ => false,
        }
    }

    /// Puts a saving entry back into the confirming phase.
    pub fn reconfirm(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.phase = ClosePhase::Confirming;
        }
    }

    pub fn finish_current(&mut self) -> Option<NodeId> {
        self.current.take().map(|c| c.node)
    }

    /// Drops everything: current and backlog. Returns the dropped nodes in
    /// queue order.
    pub fn cancel_all(&mut self) -> Vec<NodeId> {
        let mut dropped = Vec::with_capacity(self.len());
        dropped.extend(self.current.take().map(|c| c.node));
        dropped.extend(self.pending.drain(..));
        dropped
    }

    /// Removes `node` wherever it sits. Returns `true` when it was current.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if self.current_node() == Some(node) {
            self.current = None;
            return true;
        }
        self.pending.retain(|n| *n != node);
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/close_queue.rs"]
mod tests;
