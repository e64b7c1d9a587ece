use std::io;

use thiserror::Error;

use crate::Symbol;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("illegal argument ({0}): chunks range over 0..=255")]
    SymbolOutOfRange(i32),

    #[error("magic number not right: expected {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("corrupt header: symbol {0} is outside 0..=256")]
    InvalidSymbol(u32),

    #[error("corrupt header: tree nests deeper than {0} levels")]
    TreeTooDeep(usize),

    #[error("corrupt header: tree has no end-of-data leaf")]
    MissingEof,

    #[error("unexpected end of input file")]
    UnexpectedEof,

    #[error("chunk {0} has no code, the input changed between passes")]
    UnknownSymbol(Symbol),

    #[error("priority queue is full ({0} trees)")]
    QueueOverflow(usize),

    #[error("priority queue is empty")]
    QueueUnderflow,

    #[error(transparent)]
    Io(#[from] io::Error),
}
