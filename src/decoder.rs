use bitstream_io::{BigEndian, BitReader, BitWriter};
use std::io::{Read, Write};
use tracing::debug;

use crate::bit_channel::{BitSink, BitSource};
use crate::header;
use crate::tree::{HuffmanNode, HuffmanTree};
use crate::{Error, Result, BITS_PER_WORD};

pub struct Decoder {
    tree: HuffmanTree,
}

impl Decoder {
    pub fn new(tree: HuffmanTree) -> Self {
        Self { tree }
    }

    /// Reads the header from `source` and keeps the tree it describes.
    pub fn read_header<S: BitSource>(source: &mut S) -> Result<Self> {
        Ok(Self::new(header::read_header(source)?))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Walks the tree one bit at a time, emitting a byte at every leaf, until
    /// the sentinel is reached. Returns the number of bits emitted.
    ///
    /// Bytes emitted before an error are left in `sink`.
    pub fn decode_body<S: BitSource, K: BitSink>(&self, source: &mut S, sink: &mut K) -> Result<u64> {
        let root = self.tree.root();
        let (root_left, root_right) = match root {
            HuffmanNode::Internal { left, right, .. } => (left.as_ref(), right.as_ref()),
            // empty input: the whole tree is the sentinel
            HuffmanNode::Leaf { symbol, .. } if symbol.is_eof() => return Ok(0),
            HuffmanNode::Leaf { .. } => return Err(Error::MissingEof),
        };

        let (mut left, mut right) = (root_left, root_right);
        let mut written = 0;
        loop {
            let bit = source.read_bits(1)?.ok_or(Error::UnexpectedEof)?;
            let next = if bit == 0 { left } else { right };

            match next {
                HuffmanNode::Internal {
                    left: l, right: r, ..
                } => {
                    left = l.as_ref();
                    right = r.as_ref();
                }
                HuffmanNode::Leaf { symbol, .. } => {
                    if symbol.is_eof() {
                        break;
                    }
                    sink.write_bits(BITS_PER_WORD, u32::from(symbol.value()))?;
                    written += u64::from(BITS_PER_WORD);

                    left = root_left;
                    right = root_right;
                }
            }
        }

        Ok(written)
    }
}

/// Decompresses `input` into `output`, returning the number of bits written.
///
/// A bad magic number fails before anything reaches `output`. A stream that
/// ends before its sentinel fails with [`Error::UnexpectedEof`], leaving what
/// was decoded so far in `output`.
pub fn decode<R: Read, W: Write>(input: R, output: W) -> Result<u64> {
    let mut source = BitReader::endian(input, BigEndian);
    let mut sink = BitWriter::endian(output, BigEndian);

    let decoder = Decoder::read_header(&mut source)?;
    let written = decoder.decode_body(&mut source, &mut sink);
    sink.finish()?;

    let written = written?;
    debug!(bits = written, "decoded stream");
    Ok(written)
}
