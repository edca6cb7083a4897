//! Builds the offline pwned-passwords database from a text export.
//!
//! The input is the ordered-by-hash Pwned Passwords export: one
//! `HASH:COUNT` line per password, where `HASH` is 40 hex characters of
//! SHA-1 and `COUNT` is a decimal appearance count. Lines must arrive in
//! ascending hash order; the builder fails fast on anything out of order,
//! because a corrupt database is worse than no database.
//!
//! Counts above 65,535 are capped to fit the database's 16-bit count field.

pub mod conversion;
pub mod error;

pub use conversion::parse_line;
pub use error::Error;

use std::io::BufRead;
use std::path::Path;

use pwnedpass::DatabaseBuilder;

/// Streams `HASH:COUNT` lines from `input` into a new database at `output`.
///
/// Blank lines are skipped. `on_record` is called with the running record
/// count after each write, for progress reporting. Returns the total number
/// of records written.
pub fn generate<R, F>(mut input: R, output: &Path, mut on_record: F) -> Result<u64, Error>
where
    R: BufRead,
    F: FnMut(u64),
{
    let mut builder = DatabaseBuilder::create(output)?;

    let mut line = Vec::new();
    let mut line_no = 0u64;
    let mut records = 0u64;

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        line_no += 1;

        let record = conversion::trim_line(&line);
        if record.is_empty() {
            continue;
        }

        let (hash, count) = parse_line(record).ok_or(Error::Malformed { line: line_no })?;
        builder.push(hash, count)?;

        records += 1;
        on_record(records);
    }

    builder.finish().map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use pwnedpass::{OfflineDatabase, INDEX_SEGMENT_SIZE, RECORD_SIZE};

    #[test]
    fn generates_a_queryable_database() {
        // password123 -> SHA1: CBFDAC6008F9CAB4083784CBD1874F76618D2A97
        let input = "\
0000000000000000000000000000000000000001:3\n\
00000000000000000000000000000000000000FF:12\n\
CBFDAC6008F9CAB4083784CBD1874F76618D2A97:2254650\n\
FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF:1\n";

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.bin");

        let mut last_seen = 0;
        let records = generate(Cursor::new(input), &path, |n| last_seen = n).unwrap();
        assert_eq!(records, 4);
        assert_eq!(last_seen, 4);
        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            INDEX_SEGMENT_SIZE + 4 * RECORD_SIZE as u64
        );

        let db = OfflineDatabase::open(&path).unwrap();
        // the 2,254,650 appearances cap at the format's 16-bit limit
        assert_eq!(db.pwned_password("password123").unwrap(), 65535);
        assert_eq!(db.pwned_password("not in the corpus").unwrap(), 0);
    }

    #[test]
    fn skips_blank_lines_and_trailing_padding() {
        let input = "\
0000000000000000000000000000000000000001:3   \r\n\
\n\
00000000000000000000000000000000000000FF:12\n";

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.bin");

        let records = generate(Cursor::new(input), &path, |_| {}).unwrap();
        assert_eq!(records, 2);
    }

    #[test]
    fn reports_the_offending_line_number() {
        let input = "\
0000000000000000000000000000000000000001:3\n\
this is not a record\n";

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.bin");

        let err = generate(Cursor::new(input), &path, |_| {}).unwrap_err();
        assert!(matches!(err, Error::Malformed { line: 2 }));
    }

    #[test]
    fn unsorted_input_fails_fast() {
        let input = "\
00000000000000000000000000000000000000FF:12\n\
0000000000000000000000000000000000000001:3\n";

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.bin");

        let err = generate(Cursor::new(input), &path, |_| {}).unwrap_err();
        assert!(matches!(err, Error::Build(pwnedpass::Error::Unsorted { .. })));
    }
}
