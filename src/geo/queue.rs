//! The min-priority queue driving best-first search.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// An entry in the search frontier.
///
/// Either a subtree that has not been expanded yet, keyed by a lower bound on the distance to
/// anything inside it, or a single point keyed by its exact distance. Distances are haversine
/// distances (see [`sphere`][crate::geo::sphere]) and are fixed when the entry is created.
#[derive(Debug, Clone, Copy)]
pub enum Candidate<T> {
    /// A subtree root
    Node {
        /// The node to expand
        node: T,
        /// Lower bound on the distance to every point below `node`
        dist: f64,
    },
    /// A single indexed point
    Point {
        /// Insertion id of the point
        id: u32,
        /// Exact distance to the point
        dist: f64,
    },
}

impl<T> Candidate<T> {
    /// The sort key of this entry.
    #[inline]
    pub fn dist(&self) -> f64 {
        match self {
            Self::Node { dist, .. } | Self::Point { dist, .. } => *dist,
        }
    }
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Candidate<T> {}

impl<T> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Query validation keeps NaN out of the queue; total_cmp keeps the heap sound regardless
        self.dist().total_cmp(&other.dist())
    }
}

impl<T> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A binary min-heap of [`Candidate`]s ordered by distance.
///
/// One queue belongs to one search at a time. Callers running many queries can keep a queue
/// around and hand it to [`around_with_queue`][crate::geo::around_with_queue], which clears it
/// before use, to reuse its allocation.
#[derive(Debug, Clone)]
pub struct NeighborQueue<T> {
    heap: BinaryHeap<Reverse<Candidate<T>>>,
}

impl<T> Default for NeighborQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NeighborQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Create an empty queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Add an entry.
    #[inline]
    pub fn push(&mut self, candidate: Candidate<T>) {
        self.heap.push(Reverse(candidate));
    }

    /// Remove and return the entry with the smallest distance.
    #[inline]
    pub fn pop(&mut self) -> Option<Candidate<T>> {
        self.heap.pop().map(|Reverse(candidate)| candidate)
    }

    /// The entry with the smallest distance, without removing it.
    pub fn peek(&self) -> Option<&Candidate<T>> {
        self.heap.peek().map(|Reverse(candidate)| candidate)
    }

    /// The number of pending entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if there are no pending entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
