use std::io;
use std::path::PathBuf;

use crate::INDEX_SEGMENT_SIZE;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error opening database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "database {} is {len} bytes, smaller than the {}-byte index segment",
        path.display(),
        INDEX_SEGMENT_SIZE
    )]
    Undersized { path: PathBuf, len: u64 },

    #[error("read of {len} bytes at offset {offset} is outside the mapping")]
    OutOfBounds { offset: u64, len: usize },

    #[error("index entry for prefix {prefix:02X?} sorts after its successor")]
    CorruptIndex { prefix: [u8; 3] },

    #[error("invalid range: start prefix {start:02X?} sorts after end prefix {end:02X?}")]
    InvalidRange { start: [u8; 3], end: [u8; 3] },

    #[error("input hash {hash} does not sort after its predecessor {prev}")]
    Unsorted { hash: String, prev: String },

    #[error("record for hash {hash} has a zero count")]
    ZeroCount { hash: String },

    #[error("data segment is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A `pwnedpass` Result returning [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
