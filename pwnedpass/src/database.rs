//! The read side: point lookups and prefix range scans over a mapped file.

use std::path::Path;

use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::mmap::MappedFile;
use crate::pool::BufferPool;
use crate::{DATA_SEGMENT_OFFSET, INDEX_SEGMENT_SIZE, LAST_PREFIX, RECORD_SIZE};

/// A client for querying Pwned Passwords locally.
///
/// The handle is re-entrant: any number of threads may call [`pwned`] and
/// [`scan`] concurrently. Per-scan state such as the scratch buffer and the
/// assembled hash is local to each call; the mapping itself is immutable for
/// the handle's lifetime.
///
/// [`pwned`]: OfflineDatabase::pwned
/// [`scan`]: OfflineDatabase::scan
pub struct OfflineDatabase {
    database: MappedFile,
    scratch: BufferPool,
}

impl OfflineDatabase {
    /// Opens the database file at `path`, mapping it read-only.
    ///
    /// The mapping is released when the handle is dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let database = MappedFile::open(path.as_ref())?;
        Ok(Self {
            database,
            scratch: BufferPool::new(),
        })
    }

    /// Number of records in the data segment.
    pub fn record_count(&self) -> u64 {
        (self.database.len() - INDEX_SEGMENT_SIZE) / RECORD_SIZE as u64
    }

    /// Checks how frequently the given hash is included in the database.
    ///
    /// Hashes that are not present return a frequency of 0 and no error. The
    /// on-disk count is 16 bits; the return type is wider so the format can
    /// grow without breaking callers.
    pub fn pwned(&self, hash: &[u8; 20]) -> Result<u32> {
        let prefix = [hash[0], hash[1], hash[2]];

        let mut frequency = 0;
        self.scan(prefix, prefix, |candidate, count| {
            if candidate == hash {
                frequency = u32::from(count);
                return true;
            }
            false
        })?;

        Ok(frequency)
    }

    /// SHA-1s `password` and checks its frequency.
    ///
    /// Note that counts above 65,535 are capped at build time, so the result
    /// is a floor for extremely common passwords.
    pub fn pwned_password(&self, password: &str) -> Result<u32> {
        let mut hasher = Sha1::new();
        hasher.update(password.as_bytes());
        let hash: [u8; 20] = hasher.finalize().into();
        self.pwned(&hash)
    }

    /// Iterates all records with prefixes between `start` and `end`,
    /// inclusive, in strictly ascending hash order.
    ///
    /// The consumer receives each `(hash, count)` pair and returns `true` to
    /// stop iteration early; stopping is not an error. The hash reference is
    /// only valid for the duration of the callback; the next invocation
    /// overwrites it.
    ///
    /// Fails with [`Error::InvalidRange`] when `start` sorts after `end`.
    pub fn scan<F>(&self, start: [u8; 3], end: [u8; 3], mut consumer: F) -> Result<()>
    where
        F: FnMut(&[u8; 20], u16) -> bool,
    {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        let mut buffer = self.scratch.get();
        let result = self.scan_runs(start, end, &mut buffer, &mut consumer);
        self.scratch.put(buffer);
        result
    }

    fn scan_runs<F>(
        &self,
        start: [u8; 3],
        end: [u8; 3],
        buffer: &mut Vec<u8>,
        consumer: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&[u8; 20], u16) -> bool,
    {
        let mut hash = [0u8; 20];
        hash[0..3].copy_from_slice(&start);

        // The 24-bit prefix is widened to 32 bits so it can be incremented
        // and narrowed back on every prefix advance.
        let mut current = u32::from_be_bytes([0, start[0], start[1], start[2]]);
        let last = u32::from_be_bytes([0, end[0], end[1], end[2]]);

        loop {
            let prefix = [hash[0], hash[1], hash[2]];
            let (offset, length) = self.lookup(prefix)?;

            // An empty run contributes no consumer calls but still counts as
            // a traversed prefix.
            let run = length as usize;
            if buffer.len() < run {
                buffer.resize(run, 0);
            }
            self.database
                .read_at(&mut buffer[..run], DATA_SEGMENT_OFFSET + offset)?;

            for record in buffer[..run].chunks_exact(RECORD_SIZE) {
                hash[3..20].copy_from_slice(&record[0..17]);
                let count = u16::from_be_bytes([record[17], record[18]]);

                if consumer(&hash, count) {
                    return Ok(());
                }
            }

            // stop once the end prefix has been traversed, inclusive
            if current == last {
                return Ok(());
            }

            current += 1;
            if current > 0x00FF_FFFF {
                return Ok(());
            }
            let [_, a, b, c] = current.to_be_bytes();
            hash[0] = a;
            hash[1] = b;
            hash[2] = c;
        }
    }

    /// Returns the `(offset, length)` of the run of records carrying
    /// `prefix`, relative to the start of the data segment.
    ///
    /// Costs at most one 16-byte read of the index segment. A length of zero
    /// means the prefix has no records.
    pub fn lookup(&self, prefix: [u8; 3]) -> Result<(u64, u64)> {
        let entry = u64::from(u32::from_be_bytes([0, prefix[0], prefix[1], prefix[2]])) * 8;

        // For the very last prefix there is no successor entry; the run
        // extends to the end of the file.
        if prefix == LAST_PREFIX {
            let mut word = [0u8; 8];
            self.database.read_at(&mut word, entry)?;
            let offset = u64::from_be_bytes(word);
            let length = (self.database.len() - INDEX_SEGMENT_SIZE)
                .checked_sub(offset)
                .ok_or(Error::CorruptIndex { prefix })?;
            return Ok((offset, length));
        }

        let mut entries = [0u8; 16];
        self.database.read_at(&mut entries, entry)?;

        let mut word = [0u8; 8];
        word.copy_from_slice(&entries[0..8]);
        let offset = u64::from_be_bytes(word);
        word.copy_from_slice(&entries[8..16]);
        let next = u64::from_be_bytes(word);

        let length = next
            .checked_sub(offset)
            .ok_or(Error::CorruptIndex { prefix })?;

        Ok((offset, length))
    }
}
