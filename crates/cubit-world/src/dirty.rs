//! Deduplicating FIFO of nodes whose scene representation may be stale.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::node::NodeId;

/// Work queue of dirty nodes.
///
/// Marking is idempotent: a node already pending keeps its place in line.
/// Membership says nothing about *what* changed; the consumer re-reads the
/// node when it gets to it.
#[derive(Debug, Default)]
pub struct DirtySet {
    /// Processing order.
    queue: VecDeque<NodeId>,
    /// Ids currently in `queue` (dedup guard).
    pending: FxHashSet<NodeId>,
}

impl DirtySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` dirty. Returns `false` if it was already pending.
    pub fn mark(&mut self, id: NodeId) -> bool {
        if self.pending.insert(id) {
            self.queue.push_back(id);
            true
        } else {
            false
        }
    }

    /// The next node to process, without removing it.
    pub fn front(&self) -> Option<NodeId> {
        self.queue.front().copied()
    }

    /// Removes and returns the next node to process.
    pub fn pop_front(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        self.pending.remove(&id);
        Some(id)
    }

    /// Returns `true` if `id` is pending.
    pub fn contains(&self, id: NodeId) -> bool {
        self.pending.contains(&id)
    }

    /// Number of pending nodes.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> NodeId {
        NodeId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn test_repeated_mark_is_idempotent() {
        let mut set = DirtySet::new();
        assert!(set.mark(id(1)));
        assert!(!set.mark(id(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_pop_order_is_first_marked_first() {
        let mut set = DirtySet::new();
        set.mark(id(3));
        set.mark(id(1));
        set.mark(id(3));
        set.mark(id(2));
        assert_eq!(set.pop_front(), Some(id(3)));
        assert_eq!(set.pop_front(), Some(id(1)));
        assert_eq!(set.pop_front(), Some(id(2)));
        assert_eq!(set.pop_front(), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_front_does_not_consume() {
        let mut set = DirtySet::new();
        set.mark(id(5));
        assert_eq!(set.front(), Some(id(5)));
        assert!(set.contains(id(5)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remark_after_pop_requeues() {
        let mut set = DirtySet::new();
        set.mark(id(7));
        set.pop_front();
        assert!(!set.contains(id(7)));
        assert!(set.mark(id(7)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_generations_are_distinct_entries() {
        let mut set = DirtySet::new();
        set.mark(NodeId {
            index: 0,
            generation: 0,
        });
        set.mark(NodeId {
            index: 0,
            generation: 1,
        });
        assert_eq!(set.len(), 2);
    }
}
