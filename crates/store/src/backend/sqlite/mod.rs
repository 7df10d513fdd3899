//! SQLite-backed recipe repository.
//!
//! Ingredient and instruction lists are stored as JSON text columns; every
//! other field gets its own column so listings can be sorted in SQL.

mod db;
mod repo;
mod rows;

pub use self::db::Database;
pub use self::repo::SqliteRepository;
