//! Offline client for querying Pwned Passwords without network access.
//!
//! This library reads a purpose-built two-segment database file holding the
//! full Pwned Passwords corpus (on the order of 600-800 million SHA-1 hashes)
//! and answers two questions about it:
//!
//! - **Point lookup**: how many times does this 20-byte SHA-1 hash appear?
//!   See [`OfflineDatabase::pwned`].
//! - **Prefix scan**: enumerate every `(hash, count)` pair whose 3-byte
//!   prefix falls in an inclusive range. See [`OfflineDatabase::scan`].
//!
//! # Database format
//!
//! The file is two concatenated segments:
//!
//! - An **index segment** of exactly 2^24 big-endian u64 entries (128 MiB).
//!   Entry `p` is the byte offset, relative to the start of the data segment,
//!   of the first record whose hash begins with the 3-byte prefix `p`.
//! - A **data segment** of packed 19-byte records: the trailing 17 bytes of
//!   the hash followed by a big-endian u16 appearance count. Records are
//!   globally sorted by full hash.
//!
//! The run of records for prefix `p` occupies `[index[p], index[p+1])` of the
//! data segment (`[index[p], end-of-file)` for the last prefix), so a point
//! read costs one index probe and one run read. The file is memory-mapped
//! read-only; the kernel page cache keeps hot prefixes in RAM with no
//! explicit cache layer.
//!
//! Counts above 65,535 are capped at build time by the 16-bit record field.
//!
//! # Example
//!
//! ```rust,ignore
//! use pwnedpass::OfflineDatabase;
//!
//! let db = OfflineDatabase::open("pwned-passwords.bin")?;
//! let frequency = db.pwned_password("hunter2")?;
//! if frequency > 0 {
//!     println!("seen {frequency} times");
//! }
//! # Ok::<(), pwnedpass::Error>(())
//! ```

pub mod builder;
pub mod database;
pub mod error;
mod mmap;
mod pool;

pub use builder::DatabaseBuilder;
pub use database::OfflineDatabase;
pub use error::{Error, Result};

/// Default path to the database file.
pub const DATABASE_FILENAME: &str = "pwned-passwords.bin";

/// Exact size of the index segment in bytes: one 8-byte offset for each of
/// the 2^24 possible 3-byte prefixes. Also the smallest legal database file
/// (an empty data segment).
pub const INDEX_SEGMENT_SIZE: u64 = 256 * 256 * 256 * 8;

/// Byte offset in the database where the data segment begins.
pub const DATA_SEGMENT_OFFSET: u64 = INDEX_SEGMENT_SIZE;

/// On-disk record length: 17-byte hash suffix plus big-endian u16 count.
pub const RECORD_SIZE: usize = 19;

/// The very first prefix in the dataset. It is intended to be used as a
/// parameter to [`OfflineDatabase::scan`].
pub const FIRST_PREFIX: [u8; 3] = [0x00, 0x00, 0x00];

/// The very last prefix in the dataset. It is intended to be used as a
/// parameter to [`OfflineDatabase::scan`].
pub const LAST_PREFIX: [u8; 3] = [0xFF, 0xFF, 0xFF];
