use derivative::Derivative;
use tracing::trace;

use crate::frequency::FrequencyTable;
use crate::queue::PriorityQueue;
use crate::{Error, Result, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
        weight: u64,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    fn from_children(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Internal { left, .. } => Some(left.as_ref()),
            HuffmanNode::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Internal { right, .. } => Some(right.as_ref()),
            HuffmanNode::Leaf { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        match self {
            HuffmanNode::Leaf { symbol: s, .. } => *s == symbol,
            HuffmanNode::Internal { left, right, .. } => {
                left.contains(symbol) || right.contains(symbol)
            }
        }
    }
}

/// A Huffman tree together with its total weight. Trees order by weight only,
/// which is all the priority queue needs from them.
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
pub struct HuffmanTree {
    weight: u64,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    root: HuffmanNode,
}

impl HuffmanTree {
    pub fn new(root: HuffmanNode) -> Self {
        Self {
            weight: root.weight(),
            root,
        }
    }

    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        Self::new(HuffmanNode::leaf(symbol, weight))
    }

    /// Joins two trees under a new internal node, `a` on the left.
    pub fn merge(a: HuffmanTree, b: HuffmanTree) -> Self {
        let weight = a.weight + b.weight;
        Self {
            weight,
            root: HuffmanNode::from_children(a.root, b.root),
        }
    }

    /// Builds the code tree for `table` plus one end-of-data leaf of weight 1.
    ///
    /// Leaves enter the queue in ascending byte order with the sentinel last,
    /// and the queue breaks weight ties first-in first-out, so the same counts
    /// always produce the same tree.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        let mut queue = PriorityQueue::new();
        for (byte, count) in table.iter() {
            queue.insert(HuffmanTree::leaf(Symbol::from(byte), count))?;
        }
        queue.insert(HuffmanTree::leaf(Symbol::EOF, 1))?;

        while queue.len() > 1 {
            let a = queue.extract_min().ok_or(Error::QueueUnderflow)?;
            let b = queue.extract_min().ok_or(Error::QueueUnderflow)?;
            trace!(left = a.weight, right = b.weight, "merging trees");
            queue.insert(HuffmanTree::merge(a, b))?;
        }

        let tree = queue.extract_min().ok_or(Error::QueueUnderflow)?;
        trace!(weight = tree.weight, leaves = tree.leaf_count(), "built tree");
        Ok(tree)
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    pub fn into_root(self) -> HuffmanNode {
        self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}
