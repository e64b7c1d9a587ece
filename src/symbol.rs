use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PSEUDO_EOF;

/// One leaf label of a Huffman tree: an 8-bit chunk, or the end-of-data
/// sentinel that terminates every encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(u16);

impl Symbol {
    pub const EOF: Symbol = Symbol(PSEUDO_EOF);

    /// Returns `None` for values above the sentinel.
    pub fn new(value: u32) -> Option<Self> {
        match u16::try_from(value) {
            Ok(v) if v <= PSEUDO_EOF => Some(Self(v)),
            _ => None,
        }
    }

    pub const fn from_byte(byte: u8) -> Self {
        Self(byte as u16)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub fn is_eof(self) -> bool {
        self == Self::EOF
    }

    pub fn as_byte(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_byte() {
            None => f.write_str("EOF"),
            Some(b) if b.is_ascii_graphic() => write!(f, "{:?}", b as char),
            Some(b) => write!(f, "{:#04x}", b),
        }
    }
}
