use std::collections::VecDeque;

use fxhash::FxHashMap;

use crate::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchQueueItem {
    pub end_node: NodeId,

    /// Cost from the start to `end_node` through `parent`
    pub cost_so_far: f64,

    /// cost_so_far + straight line distance from `end_node` to the target
    pub heuristic_bound: f64,

    pub parent: NodeId,
}

/// Pending items sorted ascending by heuristic bound.
///
/// Items with equal bounds keep their insertion order. The queue also tracks
/// the bound of the latest pending entry per node so the search can check
/// for a pending entry without scanning.
pub(crate) struct PendingQueue {
    items: VecDeque<SearchQueueItem>,
    pending: FxHashMap<NodeId, f64>,
}

impl PendingQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        PendingQueue {
            items: VecDeque::with_capacity(capacity),
            pending: FxHashMap::default(),
        }
    }

    pub fn pending_bound(&self, node: NodeId) -> Option<f64> {
        self.pending.get(&node).copied()
    }

    /// Inserts `item` just before the first item with a strictly greater
    /// bound. Any older entry for the same node stays in the queue and is
    /// left for the search to discard as stale.
    pub fn push(&mut self, item: SearchQueueItem) {
        let position = self
            .items
            .partition_point(|queued| queued.heuristic_bound <= item.heuristic_bound);

        self.items.insert(position, item);
        self.pending.insert(item.end_node, item.heuristic_bound);
    }

    pub fn pop_front(&mut self) -> Option<SearchQueueItem> {
        let item = self.items.pop_front()?;
        self.pending.remove(&item.end_node);
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
