use thiserror::Error;

/// Errors that can occur in stride-embed.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error surfaced from the graph layer.
    #[error(transparent)]
    Core(#[from] stride_core::Error),
    /// Config file deserialization error.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    /// No node survived vocabulary construction.
    #[error("empty vocabulary: the edge stream produced no trainable nodes")]
    EmptyVocabulary,
    /// Pre-trained vectors do not match the configured embedding size.
    #[error("pre-trained vectors are {found}-dimensional, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A vector file line that cannot be parsed.
    #[error("malformed vector line {line}: {reason}")]
    MalformedVector { line: usize, reason: String },
    /// More clusters requested than vectors available.
    #[error("cannot form {k} clusters from {n} vectors")]
    TooFewVectors { k: usize, n: usize },
}

/// Result type alias for stride-embed.
pub type Result<T> = std::result::Result<T, Error>;
