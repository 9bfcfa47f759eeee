//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers the few
//! fallible operations on the primitives in this crate.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f64),
}

/// Shorthand result type for `lift-core`.
pub type CoreResult<T> = Result<T, CoreError>;
