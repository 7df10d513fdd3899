//! Recipe persistence.
//!
//! This crate owns the boundary between the recipe core and wherever recipes
//! are actually kept. Everything above it talks to a [`RecipeRepository`];
//! everything below it is a backend:
//!
//! - [`SqliteRepository`](backend::SqliteRepository): a local SQLite database
//!   with embedded migrations.
//! - `MockRepository` (feature `mock`): an in-memory map for tests.
//!
//! Ingredient and instruction lists are stored as JSON and read back through
//! the recipe crate's validation boundary, so malformed stored entries are
//! dropped rather than failing the whole recipe.

pub mod backend;
pub mod error;
mod models;

pub use crate::backend::RecipeRepository;
pub use crate::models::ServingsPreference;
use std::sync::Arc;

pub type RepositoryHandle = Arc<dyn RecipeRepository + Send + Sync>;
