//! Recipe Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// A recipe error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for recipe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A serving count was zero. Both the recipe default and the requested
    /// serving count must be at least one.
    #[display("invalid {field}: {value} (must be at least 1)")]
    InvalidServings {
        /// Which serving count was rejected.
        field: &'static str,
        value: u32,
    },
    /// A scale factor was zero, negative, or not a finite number.
    #[display("invalid scale factor: {_0}")]
    InvalidFactor(#[error(not(source))] String),
    /// The recipe is missing something it cannot exist without.
    #[display("invalid recipe: {_0}")]
    InvalidRecipe(#[error(not(source))] &'static str),
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// Details about the parsing failure.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Everything in this crate is a pure function of its input.
        false
    }
}
