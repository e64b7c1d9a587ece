use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::bit_channel::BitSource;
use crate::{Error, Result, BITS_PER_WORD};

/// Observed count per 8-bit chunk. Bytes never seen are absent and count as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts.get(&byte).copied().unwrap_or(0)
    }

    /// Like [`get`](Self::get), but takes any integer and rejects anything
    /// that is not a byte value.
    pub fn lookup(&self, chunk: i32) -> Result<u64> {
        let byte = u8::try_from(chunk).map_err(|_| Error::SymbolOutOfRange(chunk))?;
        Ok(self.get(byte))
    }

    pub fn add(&mut self, byte: u8) {
        *self.counts.entry(byte).or_default() += 1;
    }

    pub fn set(&mut self, byte: u8, count: u64) {
        if count == 0 {
            self.counts.remove(&byte);
        } else {
            self.counts.insert(byte, count);
        }
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Sum of all counts, i.e. the number of chunks seen.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bytes with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Nonzero counts in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&b, &c)| (b, c))
    }
}

impl FromIterator<u8> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut table = Self::new();
        for b in iter {
            table.add(b);
        }
        table
    }
}

#[derive(Debug, Default)]
pub struct FrequencyCounter {
    table: FrequencyTable,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears any previous state, then counts every chunk `source` yields.
    /// Returns the number of chunks read.
    pub fn count_all<S: BitSource>(&mut self, source: &mut S) -> Result<u64> {
        self.clear();

        let mut chunks = 0;
        while let Some(chunk) = source.read_bits(BITS_PER_WORD)? {
            // an 8-bit read never exceeds u8::MAX
            self.table.add(chunk as u8);
            chunks += 1;
        }

        debug!(chunks, distinct = self.table.distinct(), "counted input");
        Ok(chunks)
    }

    pub fn count(&self, chunk: i32) -> Result<u64> {
        self.table.lookup(chunk)
    }

    pub fn add(&mut self, byte: u8) {
        self.table.add(byte);
    }

    pub fn set(&mut self, byte: u8, count: u64) {
        self.table.set(byte, count);
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn into_table(self) -> FrequencyTable {
        self.table
    }
}

/// Counts all chunks of `source` into a fresh table.
pub fn count<S: BitSource>(source: &mut S) -> Result<FrequencyTable> {
    let mut counter = FrequencyCounter::new();
    counter.count_all(source)?;
    Ok(counter.into_table())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitstream_io::{BigEndian, BitReader};
    use std::io::Cursor;

    fn counter_over(s: &str) -> FrequencyCounter {
        let mut counter = FrequencyCounter::new();
        let mut source = BitReader::endian(Cursor::new(s.as_bytes()), BigEndian);
        counter.count_all(&mut source).unwrap();
        counter
    }

    #[test]
    fn count_all() {
        let cc = counter_over("teststr");

        assert_eq!(cc.count('t' as i32).unwrap(), 3);
        assert_eq!(cc.count('s' as i32).unwrap(), 2);
        assert_eq!(cc.count('e' as i32).unwrap(), 1);
        assert_eq!(cc.count('r' as i32).unwrap(), 1);
        assert_eq!(cc.count('b' as i32).unwrap(), 0);
        assert_eq!(cc.table().total(), 7);
    }

    #[test]
    fn count_all_blank_space() {
        let cc = counter_over(" ");
        assert_eq!(cc.count(' ' as i32).unwrap(), 1);
        assert_eq!(cc.table().distinct(), 1);
    }

    #[test]
    fn count_all_clears_previous_state() {
        let mut cc = counter_over("aaaa");
        let mut source = BitReader::endian(Cursor::new(&b"b"[..]), BigEndian);

        assert_eq!(cc.count_all(&mut source).unwrap(), 1);
        assert_eq!(cc.count('a' as i32).unwrap(), 0);
        assert_eq!(cc.count('b' as i32).unwrap(), 1);
    }

    #[test]
    fn lookup_out_of_range() {
        let cc = FrequencyCounter::new();

        assert!(matches!(cc.count(256), Err(Error::SymbolOutOfRange(256))));
        assert!(matches!(cc.count(-1), Err(Error::SymbolOutOfRange(-1))));
        assert_eq!(
            cc.count(256).unwrap_err().to_string(),
            "illegal argument (256): chunks range over 0..=255"
        );
    }

    #[test]
    fn add_set_clear() {
        let mut cc = FrequencyCounter::new();
        cc.add(b't');
        assert_eq!(cc.count('t' as i32).unwrap(), 1);

        cc.set(b't', 3);
        cc.add(b't');
        assert_eq!(cc.count('t' as i32).unwrap(), 4);

        cc.set(b'a', 100);
        assert_eq!(cc.table().get(b'a'), 100);
        assert_eq!(cc.table().iter().collect::<Vec<_>>(), vec![(b'a', 100), (b't', 4)]);

        cc.clear();
        assert_eq!(cc.count('t' as i32).unwrap(), 0);
        assert_eq!(cc.count('a' as i32).unwrap(), 0);
        assert!(cc.table().is_empty());
    }

    #[test]
    fn set_zero_drops_entry() {
        let mut table: FrequencyTable = b"xxy".iter().copied().collect();
        table.set(b'y', 0);

        assert_eq!(table.distinct(), 1);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn serialized_counts_restore() {
        let table: FrequencyTable = b"abracadabra".iter().copied().collect();
        let packed = rmp_serde::to_vec(&table).unwrap();
        let restored: FrequencyTable = rmp_serde::from_slice(&packed).unwrap();

        assert_eq!(restored, table);
        assert_eq!(restored.get(b'a'), 5);
    }
}
