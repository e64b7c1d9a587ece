use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::tree::HuffmanTree;
use crate::{Error, Result, ALPHABET_SIZE};

// Ordered by tree weight, then by insertion sequence.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    tree: HuffmanTree,
    sequence: u64,
}

/// Bounded min-queue of partial trees. Equal weights come out in the order
/// they went in.
#[derive(Debug)]
pub struct PriorityQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    capacity: usize,
    next_sequence: u64,
}

impl PriorityQueue {
    /// A queue sized for every byte value plus the end-of-data sentinel.
    pub fn new() -> Self {
        Self::with_capacity(ALPHABET_SIZE + 1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    pub fn insert(&mut self, tree: HuffmanTree) -> Result<()> {
        if self.heap.len() >= self.capacity {
            return Err(Error::QueueOverflow(self.capacity));
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(Entry { tree, sequence }));
        Ok(())
    }

    pub fn extract_min(&mut self) -> Option<HuffmanTree> {
        self.heap.pop().map(|Reverse(entry)| entry.tree)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
