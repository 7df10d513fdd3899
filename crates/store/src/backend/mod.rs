//! Recipe repository trait and implementations.
//!
//! This module defines the `RecipeRepository` trait, which provides a unified
//! interface for persisted recipe data across different backends (a local
//! SQLite database, an in-memory mock for tests, or decorators wrapping
//! either).

#[cfg(any(test, feature = "mock"))]
mod mock;
mod sqlite;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockRepository;
pub use self::sqlite::{Database, SqliteRepository};
use crate::ServingsPreference;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use simmer_recipe::models::{Recipe, RecipeId, UserId};

/// Unified interface for recipe storage.
///
/// All operations are asynchronous: every real backend is a network or disk
/// round-trip away. Errors are classified (see
/// [`ErrorKind::class`](crate::error::ErrorKind::class)) so callers can react
/// without knowing which backend produced them.
///
/// # Ownership
/// Only a recipe's author may update or delete it. Implementations return
/// [`ErrorKind::Unauthorized`] for anyone else, and [`ErrorKind::NotFound`]
/// when the recipe doesn't exist at all.
///
/// # Examples
///
/// ```
/// use simmer_recipe::models::{RecipeId, UserId};
/// use simmer_store::{RecipeRepository, error::Result};
///
/// async fn servings_for(repository: &dyn RecipeRepository, recipe: &RecipeId, user: &UserId) -> Result<u32> {
///     let default = repository.fetch(recipe).await?.servings;
///     let preferred = repository.servings_preference(recipe, user).await?;
///     Ok(preferred.map(|p| p.servings).unwrap_or(default))
/// }
/// ```
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Name of the backend, for logging.
    fn name(&self) -> &str;

    /// Fetch a single recipe by ID.
    ///
    /// Returns [`ErrorKind::NotFound`] if no such recipe exists.
    async fn fetch(&self, id: &RecipeId) -> Result<Recipe>;

    /// Whether a recipe exists.
    ///
    /// Default implementation of this method calls [`fetch()`](Self::fetch)
    /// and maps [`ErrorKind::NotFound`] to `false`.
    async fn exists(&self, id: &RecipeId) -> Result<bool> {
        match self.fetch(id).await {
            Ok(_) => Ok(true),
            Err(err) if matches!(*err, ErrorKind::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// List the most recently updated recipes, newest first.
    async fn list(&self, limit: usize) -> Result<Vec<Recipe>>;

    /// Store a new recipe.
    ///
    /// Returns [`ErrorKind::Validation`] if the recipe is invalid or a recipe
    /// with the same ID already exists.
    async fn insert(&self, recipe: &Recipe) -> Result<()>;

    /// Replace an existing recipe's content, on behalf of `actor`.
    ///
    /// The author and creation date are never changed. Returns the recipe as
    /// stored after the update.
    async fn update(&self, actor: &UserId, recipe: &Recipe) -> Result<Recipe>;

    /// Delete a recipe (and every servings preference for it), on behalf of
    /// `actor`.
    async fn delete(&self, actor: &UserId, id: &RecipeId) -> Result<()>;

    /// Load a user's preferred serving count for a recipe, if they have one.
    async fn servings_preference(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<Option<ServingsPreference>>;

    /// Store a user's preferred serving count for a recipe, replacing any
    /// previous preference.
    ///
    /// Returns [`ErrorKind::Validation`] for fewer than one serving and
    /// [`ErrorKind::NotFound`] if the recipe doesn't exist.
    async fn set_servings_preference(&self, preference: &ServingsPreference) -> Result<()>;
}

/// Rules shared by every backend, applied before anything touches storage.
pub(crate) fn check_recipe(recipe: &Recipe) -> Result<()> {
    recipe.validate().map_err(|err| ErrorKind::validation("recipe", err))
}

pub(crate) fn check_preference(preference: &ServingsPreference) -> Result<()> {
    if preference.servings < 1 {
        exn::bail!(ErrorKind::Validation {
            field: "servings",
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_author(actor: &UserId, author: &UserId, action: &'static str, recipe: &RecipeId) -> Result<()> {
    if actor != author {
        exn::bail!(ErrorKind::Unauthorized {
            actor: actor.clone(),
            action,
            recipe: recipe.clone(),
        });
    }
    Ok(())
}
