use crate::error::Error;

/// Result type alias used throughout tessera.
pub type Result<T> = std::result::Result<T, Error>;
