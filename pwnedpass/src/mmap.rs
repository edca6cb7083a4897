use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Error, Result};
use crate::INDEX_SEGMENT_SIZE;

/// Read-only memory mapping of a database file.
///
/// The mapping is the only long-lived OS resource the reader holds; it is
/// released when the value is dropped. All reads are plain memory copies out
/// of the mapped region, so concurrent readers need no coordination.
#[derive(Debug)]
pub(crate) struct MappedFile {
    map: Mmap,
}

impl MappedFile {
    /// Maps `path` read-only.
    ///
    /// Fails if the file is missing, unreadable, or smaller than the index
    /// segment (the minimum legal database). No parsing happens here.
    pub fn open(path: &Path) -> Result<Self> {
        let open = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open)?;
        let len = file.metadata().map_err(open)?.len();
        if len < INDEX_SEGMENT_SIZE {
            return Err(Error::Undersized {
                path: path.to_path_buf(),
                len,
            });
        }

        // SAFETY: the mapping is read-only, and the database file is never
        // written or truncated while a reader holds it open (the builder
        // always produces a fresh file).
        let map = unsafe { Mmap::map(&file) }.map_err(open)?;

        Ok(Self { map })
    }

    /// Fills `dst` from the mapping starting at byte `offset`.
    pub fn read_at(&self, dst: &mut [u8], offset: u64) -> Result<()> {
        let start = usize::try_from(offset).ok();
        let end = start.and_then(|s| s.checked_add(dst.len()));

        match (start, end) {
            (Some(start), Some(end)) if end <= self.map.len() => {
                dst.copy_from_slice(&self.map[start..end]);
                Ok(())
            }
            _ => Err(Error::OutOfBounds {
                offset,
                len: dst.len(),
            }),
        }
    }

    /// Total length of the mapped file in bytes.
    pub fn len(&self) -> u64 {
        self.map.len() as u64
    }
}
