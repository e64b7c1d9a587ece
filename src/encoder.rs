use bitstream_io::{BigEndian, BitReader, BitWriter};
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::{debug, info};

use crate::bit_channel::{BitSink, BitSource};
use crate::code_table::CodeTable;
use crate::frequency::{self, FrequencyTable};
use crate::header;
use crate::tree::HuffmanTree;
use crate::{Error, Result, Symbol, BITS_PER_WORD};

/// Everything derived from one input's counts: the tree, its code table, and
/// the sizes needed to decide whether writing pays off.
#[derive(Debug, Clone)]
pub struct Encoder {
    counts: FrequencyTable,
    tree: HuffmanTree,
    codes: CodeTable,
}

impl Encoder {
    pub fn from_counts(counts: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(&counts)?;
        let codes = CodeTable::build(&tree);
        Ok(Self {
            counts,
            tree,
            codes,
        })
    }

    /// Counts every chunk of `reader`, then builds the tree and codes.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut source = BitReader::endian(reader, BigEndian);
        Self::from_counts(frequency::count(&mut source)?)
    }

    pub fn counts(&self) -> &FrequencyTable {
        &self.counts
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.codes
    }

    pub fn header_size(&self) -> u64 {
        header::header_size(&self.tree)
    }

    /// Size of the input as it was counted.
    pub fn original_bits(&self) -> u64 {
        self.counts.total() * u64::from(BITS_PER_WORD)
    }

    /// Exact size of the compressed stream before byte padding.
    pub fn compressed_bits(&self) -> u64 {
        let body: u64 = self
            .counts
            .iter()
            .map(|(byte, count)| count * self.code_len(Symbol::from(byte)))
            .sum();

        self.header_size() + body + self.code_len(Symbol::EOF)
    }

    /// Whether [`write`](Self::write) should run for this input.
    pub fn should_write(&self, force: bool) -> bool {
        force || self.compressed_bits() < self.original_bits()
    }

    /// Writes the header, one code per chunk of `input`, and the sentinel
    /// code, then pads to a byte boundary. Returns the bits written, padding
    /// excluded.
    ///
    /// `input` must hold the same bytes that were counted.
    pub fn write<R: Read, W: Write>(&self, input: R, output: W) -> Result<u64> {
        let mut source = BitReader::endian(input, BigEndian);
        let mut sink = BitWriter::endian(output, BigEndian);

        let mut written = header::write_header(&self.tree, &mut sink)?;
        written += self.write_body(&mut source, &mut sink)?;
        sink.finish()?;

        debug!(bits = written, "wrote compressed stream");
        Ok(written)
    }

    fn write_body<S: BitSource, K: BitSink>(&self, source: &mut S, sink: &mut K) -> Result<u64> {
        let mut written = 0;
        while let Some(chunk) = source.read_bits(BITS_PER_WORD)? {
            // an 8-bit read never exceeds u8::MAX
            written += self.write_symbol(Symbol::from_byte(chunk as u8), sink)?;
        }
        written += self.write_symbol(Symbol::EOF, sink)?;
        Ok(written)
    }

    fn write_symbol<K: BitSink>(&self, symbol: Symbol, sink: &mut K) -> Result<u64> {
        let code = self.codes.get(symbol).ok_or(Error::UnknownSymbol(symbol))?;
        sink.write_code(code)?;
        Ok(code.len() as u64)
    }

    fn code_len(&self, symbol: Symbol) -> u64 {
        self.codes.code_len(symbol).unwrap_or(0) as u64
    }
}

/// Compresses `input` into `output`.
///
/// Nothing is written and 0 is returned when compressing would not save
/// space, unless `force` is set. `input` is read twice: once to count, then
/// again from the same starting position to write.
pub fn encode<R: Read + Seek, W: Write>(input: &mut R, output: W, force: bool) -> Result<u64> {
    let start = input.stream_position()?;
    let encoder = Encoder::from_reader(&mut *input)?;

    if !encoder.should_write(force) {
        info!(
            original = encoder.original_bits(),
            compressed = encoder.compressed_bits(),
            "not worth compressing"
        );
        return Ok(0);
    }

    input.seek(SeekFrom::Start(start))?;
    encoder.write(input, output)
}
