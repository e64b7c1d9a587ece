//! The self-describing file header: a 32-bit magic number followed by the
//! code tree in preorder.
//!
//! ```text
//! [32 bits]  MAGIC_NUMBER
//! [tree]     per node one flag bit
//!              1 (leaf):     9-bit symbol, 0..=256
//!              0 (internal): left subtree, then right subtree
//! ```

use tracing::trace;

use crate::bit_channel::{BitSink, BitSource};
use crate::tree::{HuffmanNode, HuffmanTree};
use crate::{Error, Result, Symbol, BITS_PER_INT, BITS_PER_SYMBOL, MAGIC_NUMBER};

/// No tree built from 257 leaves is deeper than this.
pub const MAX_TREE_DEPTH: usize = 256;

/// Header length in bits, magic number included.
pub fn header_size(tree: &HuffmanTree) -> u64 {
    u64::from(BITS_PER_INT) + tree_size(tree.root())
}

pub fn tree_size(node: &HuffmanNode) -> u64 {
    match node {
        HuffmanNode::Leaf { .. } => 1 + u64::from(BITS_PER_SYMBOL),
        HuffmanNode::Internal { left, right, .. } => 1 + tree_size(left) + tree_size(right),
    }
}

/// Writes the magic number and `tree`, returning the number of bits written.
pub fn write_header<S: BitSink>(tree: &HuffmanTree, sink: &mut S) -> Result<u64> {
    sink.write_bits(BITS_PER_INT, MAGIC_NUMBER)?;
    write_tree(tree.root(), sink)?;
    Ok(header_size(tree))
}

fn write_tree<S: BitSink>(node: &HuffmanNode, sink: &mut S) -> Result<()> {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            sink.write_bits(1, 1)?;
            sink.write_bits(BITS_PER_SYMBOL, u32::from(symbol.value()))?;
        }
        HuffmanNode::Internal { left, right, .. } => {
            sink.write_bits(1, 0)?;
            write_tree(left, sink)?;
            write_tree(right, sink)?;
        }
    }
    Ok(())
}

/// Checks the magic number and rebuilds the tree that follows it.
///
/// Weights are not stored in the header, so every node of the returned tree
/// has weight 0.
pub fn read_header<S: BitSource>(source: &mut S) -> Result<HuffmanTree> {
    let found = source.read_bits(BITS_PER_INT)?.ok_or(Error::UnexpectedEof)?;
    if found != MAGIC_NUMBER {
        return Err(Error::BadMagic {
            expected: MAGIC_NUMBER,
            found,
        });
    }

    let root = read_tree(source)?;
    if !root.contains(Symbol::EOF) {
        return Err(Error::MissingEof);
    }

    let tree = HuffmanTree::new(root);
    trace!(leaves = tree.leaf_count(), bits = header_size(&tree), "read header");
    Ok(tree)
}

/// Rebuilds one preorder-encoded tree, without a magic number in front.
pub fn read_tree<S: BitSource>(source: &mut S) -> Result<HuffmanNode> {
    read_node(source, 0)
}

fn read_node<S: BitSource>(source: &mut S, depth: usize) -> Result<HuffmanNode> {
    if depth > MAX_TREE_DEPTH {
        return Err(Error::TreeTooDeep(MAX_TREE_DEPTH));
    }

    match source.read_bits(1)?.ok_or(Error::UnexpectedEof)? {
        1 => {
            let value = source
                .read_bits(BITS_PER_SYMBOL)?
                .ok_or(Error::UnexpectedEof)?;
            let symbol = Symbol::new(value).ok_or(Error::InvalidSymbol(value))?;
            Ok(HuffmanNode::leaf(symbol, 0))
        }
        _ => {
            let left = read_node(source, depth + 1)?;
            let right = read_node(source, depth + 1)?;
            Ok(HuffmanNode::Internal {
                left: Box::new(left),
                right: Box::new(right),
                weight: 0,
            })
        }
    }
}
