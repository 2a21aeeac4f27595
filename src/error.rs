//! Error types for the key search.

use thiserror::Error;

/// Crate-level error. Everything that reaches this type ends the run.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("sample decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("keyspace error: {0}")]
    Keyspace(#[from] KeyspaceError),

    /// The per-phase worker pool could not be created.
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Malformed input samples, detected before any search begins.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("no samples given")]
    Empty,

    #[error("sample {index}: invalid base64: {source}")]
    Base64 {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("sample {index}: ciphertext length {len} is not a non-zero multiple of the block size")]
    BlockLength { index: usize, len: usize },
}

/// Trailing bytes do not form valid padding.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid padding")]
pub struct PaddingError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyspaceError {
    #[error("radix {0} outside 1..=256")]
    Radix(u16),

    #[error("keyspace of length {length} at radix {radix} does not fit a 128-bit index")]
    TooLarge { length: usize, radix: u16 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("chunk size must be at least 1")]
    ZeroChunk,

    #[error("progress interval must be at least 1")]
    ZeroProgressInterval,

    #[error("max length {0} exceeds the {1}-byte key size")]
    KeyTooLong(usize, usize),
}

pub type Result<T> = std::result::Result<T, SolverError>;
