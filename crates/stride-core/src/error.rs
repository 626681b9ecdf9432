use thiserror::Error;

/// Errors that can occur in stride-core.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The open-addressing table has no free slot left.
    #[error("vocabulary full: hash table holds at most {0} nodes")]
    VocabFull(usize),
    /// An edge record that cannot be parsed. Fatal per the error policy;
    /// out-of-vocabulary endpoints and capacity overflows are not errors,
    /// they are counted in [`crate::GraphStats`].
    #[error("malformed edge record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// Result type alias for stride-core.
pub type Result<T> = std::result::Result<T, Error>;
