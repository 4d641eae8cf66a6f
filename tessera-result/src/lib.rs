//! Error types and result definitions for the tessera storage engine.
//!
//! All tessera crates share a single error enum ([`Error`]) and the
//! [`Result<T>`] alias. Fallible operations propagate errors with the `?`
//! operator. Invariant violations that indicate a corrupted or incompatible
//! dataset are not represented here; those are asserted, since no recovery
//! path is defined for them.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
