//! The write side: streaming construction of the two-segment database file.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::{INDEX_SEGMENT_SIZE, RECORD_SIZE};

/// Number of 3-byte prefixes, and therefore of index entries.
const PREFIX_COUNT: u32 = 1 << 24;

/// Streaming writer for the database file.
///
/// Records must arrive in strictly ascending order of their full 20-byte
/// hash; [`push`] rejects out-of-order and duplicate hashes. The index
/// segment is accumulated in memory and written out by [`finish`], with
/// every empty prefix back-filled to point at the start of the next
/// populated run so that readers can always compute a run length as
/// `index[p+1] - index[p]`.
///
/// [`push`]: DatabaseBuilder::push
/// [`finish`]: DatabaseBuilder::finish
pub struct DatabaseBuilder {
    data: BufWriter<File>,
    index: Vec<u8>,
    data_pointer: u64,
    last_hash: Option<[u8; 20]>,
    records: u64,
}

impl DatabaseBuilder {
    /// Creates the output file and reserves the index segment as a hole at
    /// the front (sparse on filesystems that support it).
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::create(path.as_ref())?;
        file.seek(SeekFrom::Start(INDEX_SEGMENT_SIZE))?;

        Ok(Self {
            data: BufWriter::with_capacity(16 << 20, file),
            index: vec![0; INDEX_SEGMENT_SIZE as usize],
            data_pointer: 0,
            last_hash: None,
            records: 0,
        })
    }

    /// Appends one record to the data segment.
    ///
    /// Counts above 65,535 must be capped by the caller; a zero count is
    /// rejected because absence is encoded by not storing a record at all.
    pub fn push(&mut self, hash: [u8; 20], count: u16) -> Result<()> {
        if count == 0 {
            return Err(Error::ZeroCount { hash: hex(&hash) });
        }

        let prefix = prefix24(&hash);
        let fill = match self.last_hash {
            Some(prev) => {
                if hash <= prev {
                    return Err(Error::Unsorted {
                        hash: hex(&hash),
                        prev: hex(&prev),
                    });
                }
                let current = prefix24(&prev);
                (current != prefix).then_some(current + 1)
            }
            None => Some(0),
        };

        // On a prefix change, point every index entry since the previous run
        // (the skipped, empty prefixes and this record's own) at the current
        // end of data. An empty prefix thus gets index[p] == index[p+1].
        if let Some(first) = fill {
            self.fill_index(first, prefix + 1);
        }

        self.data.write_all(&hash[3..20])?;
        self.data.write_all(&count.to_be_bytes())?;
        self.data_pointer += RECORD_SIZE as u64;
        self.last_hash = Some(hash);
        self.records += 1;

        Ok(())
    }

    /// Back-fills the index entries past the last populated run, writes the
    /// index segment, and returns the number of records written.
    pub fn finish(mut self) -> Result<u64> {
        let next = match self.last_hash {
            Some(hash) => prefix24(&hash) + 1,
            None => 0,
        };
        self.fill_index(next, PREFIX_COUNT);

        debug_assert_eq!(self.index.len() as u64, INDEX_SEGMENT_SIZE);
        if self.data_pointer != self.records * RECORD_SIZE as u64 {
            return Err(Error::SizeMismatch {
                expected: self.records * RECORD_SIZE as u64,
                actual: self.data_pointer,
            });
        }

        self.data.flush()?;
        let mut file = self
            .data
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&self.index)?;
        file.sync_all()?;

        Ok(self.records)
    }

    /// Writes `data_pointer` into the index entries for prefixes
    /// `[first, until)`.
    fn fill_index(&mut self, first: u32, until: u32) {
        let word = self.data_pointer.to_be_bytes();
        for p in first..until {
            let at = p as usize * 8;
            self.index[at..at + 8].copy_from_slice(&word);
        }
    }
}

fn prefix24(hash: &[u8; 20]) -> u32 {
    u32::from_be_bytes([0, hash[0], hash[1], hash[2]])
}

fn hex(hash: &[u8; 20]) -> String {
    hash.iter().map(|b| format!("{b:02X}")).collect()
}
