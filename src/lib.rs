//! # huff
//!
//! Byte-oriented Huffman compression with a self-describing header.
//!
//! A compressed stream is a 32-bit magic number, the code tree in preorder,
//! one code per input byte, and finally the code of an end-of-data sentinel.
//! There is no length field; decoding stops at the sentinel.
//!
//! ```no_run
//! let bits = huff::encode_file("input.txt", "input.huff", false)?;
//! if bits > 0 {
//!     huff::decode_file("input.huff", "input.out")?;
//! }
//! # Ok::<(), huff::Error>(())
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

pub mod bit_channel;
pub mod code_table;
pub mod decoder;
pub mod encoder;
mod error;
pub mod frequency;
pub mod header;
pub mod queue;
mod symbol;
pub mod tree;

pub use code_table::CodeTable;
pub use decoder::{decode, Decoder};
pub use encoder::{encode, Encoder};
pub use error::{Error, Result};
pub use frequency::{FrequencyCounter, FrequencyTable};
pub use symbol::Symbol;
pub use tree::{HuffmanNode, HuffmanTree};

/// Identifies a compressed stream.
pub const MAGIC_NUMBER: u32 = 0xface_8200;

/// Width of one input chunk.
pub const BITS_PER_WORD: u32 = 8;

/// Width of a symbol in the header: one more than a chunk, to fit the sentinel.
pub const BITS_PER_SYMBOL: u32 = BITS_PER_WORD + 1;

pub const BITS_PER_INT: u32 = 32;

/// Number of distinct chunk values.
pub const ALPHABET_SIZE: usize = 1 << BITS_PER_WORD;

/// Symbol value of the end-of-data sentinel.
pub const PSEUDO_EOF: u16 = 1 << BITS_PER_WORD;

/// Compresses the file at `input` into `output`.
///
/// Returns the compressed size in bits, or 0 without creating `output` when
/// compression would not save space and `force` is unset.
pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q, force: bool) -> Result<u64> {
    let mut reader = BufReader::new(File::open(input.as_ref())?);
    let encoder = Encoder::from_reader(&mut reader)?;

    if !encoder.should_write(force) {
        info!(
            path = %input.as_ref().display(),
            original = encoder.original_bits(),
            compressed = encoder.compressed_bits(),
            "not worth compressing"
        );
        return Ok(0);
    }

    reader.seek(SeekFrom::Start(0))?;
    let writer = BufWriter::new(File::create(output.as_ref())?);
    let bits = encoder.write(reader, writer)?;

    debug!(path = %output.as_ref().display(), bits, "compressed file");
    Ok(bits)
}

/// Decompresses the file at `input` into `output`.
///
/// The whole output is decoded in memory first; `output` is only created once
/// the end-of-data sentinel has been read, so a corrupt or truncated input
/// leaves nothing behind.
pub fn decode_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<u64> {
    let reader = BufReader::new(File::open(input.as_ref())?);
    let mut decoded = Vec::new();
    let bits = decode(reader, &mut decoded)?;

    fs::write(output.as_ref(), &decoded)?;
    debug!(path = %output.as_ref().display(), bits, "decompressed file");
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("huff-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn round_trip(data: &[u8]) -> Vec<u8> {
        let mut packed = Vec::new();
        encode(&mut Cursor::new(data), &mut packed, true).unwrap();

        let mut out = Vec::new();
        let bits = decode(&packed[..], &mut out).unwrap();
        assert_eq!(bits, data.len() as u64 * 8);
        out
    }

    fn prefix_free(table: &CodeTable) -> bool {
        let codes: Vec<_> = table.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(*a))
        })
    }

    #[test]
    fn test_encode_decode() {
        let s = String::from(
            "This is a really long message, I sure do hope it encodes and decodes properly.",
        );
        let dec = String::from_utf8(round_trip(s.as_bytes())).unwrap();

        assert_eq!(dec, s);
    }

    #[test]
    fn every_byte_value() {
        let data: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn file_round_trip() {
        let dir = scratch_dir("file-round-trip");
        let (plain, packed, unpacked) = (dir.join("in.txt"), dir.join("in.huff"), dir.join("out.txt"));
        let text = "so much repetition, so much repetition, so much repetition\n".repeat(20);
        fs::write(&plain, &text).unwrap();

        let bits = encode_file(&plain, &packed, false).unwrap();
        assert!(bits > 0 && bits < text.len() as u64 * 8);
        assert_eq!(fs::metadata(&packed).unwrap().len(), (bits + 7) / 8);

        let bits = decode_file(&packed, &unpacked).unwrap();
        assert_eq!(bits, text.len() as u64 * 8);
        assert_eq!(fs::read_to_string(&unpacked).unwrap(), text);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_not_worth_compressing() {
        let dir = scratch_dir("not-worth");
        let (plain, packed) = (dir.join("in.txt"), dir.join("in.huff"));
        fs::write(&plain, "teststr").unwrap();

        assert_eq!(encode_file(&plain, &packed, false).unwrap(), 0);
        assert!(!packed.exists());

        assert_eq!(encode_file(&plain, &packed, true).unwrap(), 104);
        assert!(packed.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_file_leaves_no_output() {
        let dir = scratch_dir("corrupt");
        let (plain, packed, unpacked) = (dir.join("in.txt"), dir.join("in.huff"), dir.join("out.txt"));
        fs::write(&plain, "abracadabra abracadabra abracadabra").unwrap();
        encode_file(&plain, &packed, true).unwrap();

        let mut bytes = fs::read(&packed).unwrap();
        bytes.truncate(bytes.len() - 2);
        fs::write(&packed, &bytes).unwrap();
        assert!(matches!(decode_file(&packed, &unpacked), Err(Error::UnexpectedEof)));
        assert!(!unpacked.exists());

        bytes[1] = 0;
        fs::write(&packed, &bytes).unwrap();
        assert!(matches!(decode_file(&packed, &unpacked), Err(Error::BadMagic { .. })));
        assert!(!unpacked.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_file() {
        let dir = scratch_dir("missing");
        let err = decode_file(dir.join("not_exist.txt"), dir.join("not_exist_1.txt")).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));

        fs::remove_dir_all(&dir).unwrap();
    }

    proptest! {
        #[test]
        fn forced_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            prop_assert_eq!(round_trip(&data), data);
        }

        #[test]
        fn codes_prefix_free_and_weights_add_up(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let counts: FrequencyTable = data.iter().copied().collect();
            prop_assert_eq!(counts.total(), data.len() as u64);

            let tree = HuffmanTree::from_frequencies(&counts).unwrap();
            prop_assert_eq!(tree.weight(), data.len() as u64 + 1);

            let leaves = tree.leaf_count() as u64;
            let expected = if leaves == 1 { 42 } else { 32 + 10 * leaves + (leaves - 1) };
            prop_assert_eq!(header::header_size(&tree), expected);

            prop_assert!(prefix_free(&CodeTable::build(&tree)));
        }

        #[test]
        fn size_estimate_matches_output(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let mut packed = Vec::new();
            let bits = encode(&mut Cursor::new(&data[..]), &mut packed, true).unwrap();
            prop_assert_eq!(packed.len() as u64, (bits + 7) / 8);
        }
    }
}
