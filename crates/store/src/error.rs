//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};
use simmer_recipe::error::Error as RecipeError;
use simmer_recipe::models::{RecipeId, UserId};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The recipe does not exist (or is not visible to the caller).
    #[display("recipe not found: {_0}")]
    NotFound(#[error(not(source))] RecipeId),
    /// The acting user may not perform this operation on the recipe.
    #[display("user {actor} may not {action} recipe {recipe}")]
    Unauthorized {
        actor: UserId,
        action: &'static str,
        recipe: RecipeId,
    },
    /// The request was rejected before reaching storage.
    #[display("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    /// The backing service failed for reasons outside the caller's control.
    #[display("server error: {_0}")]
    Server(#[error(not(source))] String),
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// Stored data could not be converted into a model.
    #[display("invalid stored data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

/// The four-way classification every repository error falls into.
///
/// Callers that only need to decide between "show a 404", "ask the user to
/// sign in", "show the form errors" and "try again later" should match on
/// this rather than on [`ErrorKind`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    NotFound,
    Unauthorized,
    Validation,
    Server,
}

impl ErrorKind {
    /// Convert a recipe error into a validation error, preserving the recipe
    /// crate's `Exn` frame (error tree) as a child in its own error tree.
    #[track_caller]
    pub fn validation(field: &'static str, err: RecipeError) -> Error {
        let message = (*err).to_string();
        err.raise(ErrorKind::Validation { field, message })
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Unauthorized { .. } => ErrorClass::Unauthorized,
            Self::Validation { .. } => ErrorClass::Validation,
            Self::Server(_) | Self::Database | Self::Migration | Self::InvalidData(_) => ErrorClass::Server,
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Database)
    }
}
