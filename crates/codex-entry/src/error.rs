//! Error types for codex-entry

use thiserror::Error;

/// Result type for codex-entry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while assembling or signing entries
#[derive(Debug, Error)]
pub enum Error {
    /// Canonicalization or serialization of the entry failed
    #[error(transparent)]
    Types(#[from] codex_types::Error),

    /// The signing primitive failed
    #[error(transparent)]
    Crypto(#[from] codex_crypto::Error),
}
