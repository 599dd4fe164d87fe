use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{
    error::SearchError,
    state_node::{Cost, NodeId},
};

/// Anything that can sit in a [Fringe]
pub trait Prioritized {
    fn priority(&self) -> Cost;
}

/// Frontier entry for nodes stored in a [crate::state_node::SearchTree]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FringeEntry {
    pub id: NodeId,
    pub f: Cost,
}

impl Prioritized for FringeEntry {
    fn priority(&self) -> Cost {
        self.f
    }
}

/// The set of generated but not yet expanded nodes
pub trait Fringe<T: Prioritized> {
    /// Empty the fringe
    fn initialize(&mut self);

    fn push(&mut self, node: T);

    fn push_all<I: IntoIterator<Item = T>>(&mut self, nodes: I)
    where
        Self: Sized,
    {
        for node in nodes {
            self.push(node);
        }
    }

    /// Remove a node with the lowest priority
    fn pop(&mut self) -> Result<T, SearchError>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;
}

struct Entry<T> {
    priority: Cost,
    sequence: u64,
    node: T,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap
// instead of a max-heap.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Notice that the we flip the ordering on priorities.
        // In case of a tie the earlier insertion wins, which keeps the order stable.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

// `PartialOrd` needs to be implemented as well.
impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

/// Binary heap ordered by ascending priority, first-in-first-out among equal priorities
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }
}

impl<T> std::fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.heap.len())
            .finish()
    }
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl<T: Prioritized> Fringe<T> for PriorityQueue<T> {
    fn initialize(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }

    fn push(&mut self, node: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.heap.push(Entry {
            priority: node.priority(),
            sequence,
            node,
        });
    }

    fn pop(&mut self) -> Result<T, SearchError> {
        self.heap
            .pop()
            .map(|entry| entry.node)
            .ok_or(SearchError::EmptyFringe)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
