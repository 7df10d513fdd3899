//! Repository decorator that serves fetches from a [`RecipeCache`].

use async_trait::async_trait;
use simmer_recipe::models::{Recipe, RecipeId, UserId};
use simmer_recipe::scale_recipe;
use simmer_store::error::{ErrorKind, Result};
use simmer_store::{RecipeRepository, RepositoryHandle, ServingsPreference};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use tracing::instrument;

use crate::cache::RecipeCache;

/// Caching recipe repository.
///
/// Wraps another repository. Fetches go through the cache; updates and deletes
/// go straight to the inner repository and then invalidate the cached recipe.
/// Everything else is passed through untouched.
pub struct CachingRepository {
    inner: RepositoryHandle,
    cache: RecipeCache,
}
impl CachingRepository {
    pub fn new(inner: RepositoryHandle, cache: RecipeCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &RecipeCache {
        &self.cache
    }

    /// Fetch a recipe scaled to the serving count a user prefers for it.
    ///
    /// Users without a stored preference get the recipe's default servings
    /// (the amounts are still rewritten with two decimal places).
    #[instrument(skip(self))]
    pub async fn scaled_for(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<Recipe> {
        let recipe = self.fetch(recipe_id).await?;
        let servings = self
            .inner
            .servings_preference(recipe_id, user_id)
            .await?
            .map_or(recipe.servings, |preference| preference.servings);
        scale_recipe(&recipe, servings).map_err(|err| ErrorKind::validation("servings", err))
    }
}

impl Debug for CachingRepository {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CachingRepository")
            .field("inner", &self.inner.name())
            .field("cache", &self.cache)
            .finish()
    }
}

#[async_trait]
impl RecipeRepository for CachingRepository {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, id: &RecipeId) -> Result<Recipe> {
        self.cache.get_or_fetch(id, |id| async move { self.inner.fetch(&id).await }).await
    }

    async fn list(&self, limit: usize) -> Result<Vec<Recipe>> {
        self.inner.list(limit).await
    }

    async fn insert(&self, recipe: &Recipe) -> Result<()> {
        self.inner.insert(recipe).await
    }

    async fn update(&self, actor: &UserId, recipe: &Recipe) -> Result<Recipe> {
        let updated = self.inner.update(actor, recipe).await?;
        self.cache.invalidate(&recipe.id);
        Ok(updated)
    }

    async fn delete(&self, actor: &UserId, id: &RecipeId) -> Result<()> {
        self.inner.delete(actor, id).await?;
        self.cache.invalidate(id);
        Ok(())
    }

    async fn servings_preference(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<Option<ServingsPreference>> {
        self.inner.servings_preference(recipe_id, user_id).await
    }

    async fn set_servings_preference(&self, preference: &ServingsPreference) -> Result<()> {
        self.inner.set_servings_preference(preference).await
    }
}
