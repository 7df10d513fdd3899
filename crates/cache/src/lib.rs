//! In-process recipe cache.
//!
//! Recipes are read far more often than they are written, and every read from
//! the repository is a round-trip. [`RecipeCache`] keeps recently fetched
//! recipes in memory for a short time:
//!
//! - Entries expire [`TTL`] after they were stored. Expiry is only noticed on
//!   lookup; nothing sweeps the cache in the background.
//! - The cache holds at most [`MAX_SIZE`] recipes. Adding one more evicts the
//!   recipe that was *inserted* first, however recently it was read.
//! - Recipes are invalidated explicitly when they are updated or deleted.
//!
//! [`CachingRepository`] wires the cache in front of any
//! [`RecipeRepository`](simmer_store::RecipeRepository).

mod cache;
mod caching;
mod clock;

pub use crate::cache::{CacheOptions, CacheStats, MAX_SIZE, RecipeCache, TTL};
pub use crate::caching::CachingRepository;
pub use crate::clock::{Clock, ManualClock, SystemClock};
