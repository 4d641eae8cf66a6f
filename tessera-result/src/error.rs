use std::io;
use thiserror::Error;

/// Unified error type for all tessera operations.
///
/// The failure taxonomy is deliberately small. Missing metadata and absent
/// datasets surface as [`Error::NotFound`]; undecodable metadata blobs as
/// [`Error::Corrupt`]. There is no soft-error or retry tier: callers are
/// expected to treat any of these as dataset-fatal.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the backing object store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A storage key, dataset, or column was not found.
    ///
    /// Raised when an expected metadata key (header, footer, cluster footer)
    /// or page payload is absent, or when a dataset location cannot be
    /// opened. No recovery path is defined.
    #[error("storage key not found")]
    NotFound,

    /// A metadata blob was present but could not be decoded.
    #[error("corrupt metadata: {0}")]
    Corrupt(String),

    /// Invalid user input or API parameter.
    #[error("invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}
