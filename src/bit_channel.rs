//! Fixed-width bit I/O over `bitstream-io`, MSB-first.
//!
//! The rest of the crate only talks to [`BitSource`] and [`BitSink`]; running
//! out of input is an explicit `None` rather than an `UnexpectedEof` error.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use bitvec::prelude::*;
use std::io;

pub trait BitSource {
    /// Reads exactly `bits` bits (at most 32), or `None` once the stream
    /// cannot satisfy the request.
    fn read_bits(&mut self, bits: u32) -> io::Result<Option<u32>>;
}

pub trait BitSink {
    /// Writes the low `bits` bits of `value`, most significant first.
    fn write_bits(&mut self, bits: u32, value: u32) -> io::Result<()>;

    /// Zero-pads to the next byte boundary and flushes the underlying writer.
    fn finish(&mut self) -> io::Result<()>;

    fn write_code(&mut self, code: &BitSlice) -> io::Result<()> {
        for bit in code.iter().by_vals() {
            self.write_bits(1, u32::from(bit))?;
        }
        Ok(())
    }
}

impl<R: io::Read> BitSource for BitReader<R, BigEndian> {
    fn read_bits(&mut self, bits: u32) -> io::Result<Option<u32>> {
        match BitRead::read::<u32>(self, bits) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<W: io::Write> BitSink for BitWriter<W, BigEndian> {
    fn write_bits(&mut self, bits: u32, value: u32) -> io::Result<()> {
        BitWrite::write(self, bits, value)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.byte_align()?;
        match self.writer() {
            Some(w) => io::Write::flush(w),
            None => Ok(()),
        }
    }
}
