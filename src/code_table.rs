use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tree::{HuffmanNode, HuffmanTree};
use crate::Symbol;

/// Root-to-leaf path of every leaf in one tree; 0 is left, 1 is right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, BitVec>,
}

impl CodeTable {
    pub fn build(tree: &HuffmanTree) -> Self {
        fn traverse(node: &HuffmanNode, v: &mut BitVec, codes: &mut BTreeMap<Symbol, BitVec>) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, v.clone());
                }
                HuffmanNode::Internal { left, right, .. } => {
                    v.push(false);
                    traverse(left, v, codes);
                    v.pop();

                    v.push(true);
                    traverse(right, v, codes);
                    v.pop();
                }
            }
        }

        let mut bv = BitVec::new();
        let mut codes = BTreeMap::new();
        // a lone sentinel root gets the empty code
        traverse(tree.root(), &mut bv, &mut codes);

        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitSlice> {
        self.codes.get(&symbol).map(|bv| bv.as_bitslice())
    }

    pub fn code_len(&self, symbol: Symbol) -> Option<usize> {
        self.codes.get(&symbol).map(|bv| bv.len())
    }

    /// The code as a string of `0`s and `1`s.
    pub fn code_string(&self, symbol: Symbol) -> Option<String> {
        self.get(symbol)
            .map(|code| code.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitSlice)> + '_ {
        self.codes.iter().map(|(s, bv)| (*s, bv.as_bitslice()))
    }
}

#[derive(Serialize, Deserialize)]
pub struct SerializableCodeTable {
    codes: BTreeMap<Symbol, (usize, Box<[usize]>)>,
}

impl<'a> From<&'a CodeTable> for SerializableCodeTable {
    fn from(other: &'a CodeTable) -> Self {
        Self {
            codes: other
                .codes
                .iter()
                .map(|(k, v)| {
                    // serialize a BitVec as a pair of usize, Box<[usize]>
                    let len = v.len();
                    let slice = v.clone().into_boxed_bitslice().into_boxed_slice();

                    (*k, (len, slice))
                })
                .collect(),
        }
    }
}

impl From<SerializableCodeTable> for CodeTable {
    fn from(other: SerializableCodeTable) -> Self {
        Self {
            codes: other
                .codes
                .into_iter()
                .map(|(k, (len, bs))| {
                    let mut bv = BitBox::from_boxed_slice(bs).into_bitvec();
                    bv.resize(len, false);
                    (k, bv)
                })
                .collect(),
        }
    }
}
