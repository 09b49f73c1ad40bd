// Min-priority queue shared by both search engines.
//
// Wraps a `BinaryHeap` with reversed ordering to give a min-heap over
// `(priority, sequence)` keys. The monotonic sequence counter makes ties on
// priority break by insertion order — first inserted among equals pops first —
// which keeps settlement order fully deterministic.
//
// The queue never deduplicates: the engines may push the same node several
// times as cheaper paths to it are discovered, and discard stale entries on
// extraction via their settled-set.
//
// See also: `search.rs` for the engines driving this queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Entry in the pending set (min-heap via reversed ordering).
#[derive(Clone, Debug)]
struct Entry<T> {
    priority: f32,
    /// Unique ordering key for deterministic tiebreaking among equal
    /// priorities. Lower values pop first.
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority.total_cmp(&other.priority) == Ordering::Equal
            && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest (priority, sequence) is "greatest".
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority queue over `(item, priority)` pairs.
#[derive(Clone, Debug)]
pub struct MinQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> MinQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Insert an item with the given priority. Duplicate items with
    /// different priorities may be pending simultaneously.
    pub fn push(&mut self, item: T, priority: f32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            priority,
            sequence,
            item,
        });
    }

    /// Extract the lowest-priority pending item.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    /// Number of pending entries (counting duplicates).
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
