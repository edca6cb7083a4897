#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: not a HASH:COUNT record")]
    Malformed { line: u64 },

    #[error(transparent)]
    Build(#[from] pwnedpass::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
