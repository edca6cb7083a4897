use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pwnedpass::DatabaseBuilder;

/// Generates a sorted synthetic corpus of the given size.
/// Uses a fixed seed for reproducible benchmark results.
pub fn generate_corpus(count: usize) -> Vec<([u8; 20], u16)> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut records: Vec<([u8; 20], u16)> = (0..count)
        .map(|_| {
            let mut hash = [0u8; 20];
            rng.fill(&mut hash[..]);
            (hash, rng.gen_range(1..=u16::MAX))
        })
        .collect();

    records.sort_by(|a, b| a.0.cmp(&b.0));
    records.dedup_by(|a, b| a.0 == b.0);
    records
}

/// Builds a database from `records` and returns its path inside `dir`.
pub fn build_database(dir: &tempfile::TempDir, records: &[([u8; 20], u16)]) -> std::path::PathBuf {
    let path = dir.path().join(pwnedpass::DATABASE_FILENAME);
    let mut builder = DatabaseBuilder::create(&path).expect("create database");
    for &(hash, count) in records {
        builder.push(hash, count).expect("push record");
    }
    builder.finish().expect("finish database");
    path
}
