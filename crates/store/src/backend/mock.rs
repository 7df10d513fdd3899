//! In-memory recipe repository for testing.

use super::{check_author, check_preference, check_recipe};
use crate::error::{ErrorKind, Result};
use crate::{RecipeRepository, ServingsPreference};
use async_trait::async_trait;
use simmer_recipe::models::{Recipe, RecipeId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::UtcDateTime;
use tokio::sync::RwLock;

type PreferenceKey = (RecipeId, UserId);

/// In-memory recipe repository for testing.
///
/// Recipes and preferences are stored in `HashMap`s behind [`RwLock`]s, so all
/// trait methods can operate on `&self` without external synchronisation. It
/// enforces the same validation and ownership rules as the real backends, and
/// counts calls to [`fetch`](RecipeRepository::fetch) so tests can assert on
/// how often a caching layer went through to storage.
pub struct MockRepository {
    name: String,
    recipes: RwLock<HashMap<RecipeId, Recipe>>,
    preferences: RwLock<HashMap<PreferenceKey, ServingsPreference>>,
    fetches: AtomicUsize,
}

impl MockRepository {
    /// Create a mock repository pre-populated with recipes.
    ///
    /// Panics if any recipe fails validation. If test setup is wrong, then
    /// test should not pass.
    pub fn with_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let mut map = HashMap::new();
        for recipe in recipes {
            if let Err(err) = recipe.validate() {
                panic!("MockRepository::with_recipes: invalid recipe {}: {err:?}", recipe.id);
            }
            map.insert(recipe.id.clone(), recipe);
        }
        Self {
            name: "mock".to_string(),
            recipes: RwLock::new(map),
            preferences: RwLock::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// How many times [`fetch`](RecipeRepository::fetch) has been called,
    /// successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}
impl Default for MockRepository {
    fn default() -> Self {
        Self::with_recipes([])
    }
}

#[async_trait]
impl RecipeRepository for MockRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, id: &RecipeId) -> Result<Recipe> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.recipes
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(id.clone())))
    }

    async fn list(&self, limit: usize) -> Result<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self.recipes.read().await.values().cloned().collect();
        recipes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        recipes.truncate(limit);
        Ok(recipes)
    }

    async fn insert(&self, recipe: &Recipe) -> Result<()> {
        check_recipe(recipe)?;
        let mut recipes = self.recipes.write().await;
        if recipes.contains_key(&recipe.id) {
            exn::bail!(ErrorKind::Validation {
                field: "id",
                message: format!("recipe {} already exists", recipe.id),
            });
        }
        recipes.insert(recipe.id.clone(), recipe.clone());
        Ok(())
    }

    async fn update(&self, actor: &UserId, recipe: &Recipe) -> Result<Recipe> {
        check_recipe(recipe)?;
        let mut recipes = self.recipes.write().await;
        let stored = recipes.get_mut(&recipe.id).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(recipe.id.clone())))?;
        check_author(actor, &stored.author_id, "update", &recipe.id)?;
        *stored = Recipe {
            author_id: stored.author_id.clone(),
            created_at: stored.created_at,
            updated_at: UtcDateTime::now(),
            ..recipe.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, actor: &UserId, id: &RecipeId) -> Result<()> {
        let mut recipes = self.recipes.write().await;
        let stored = recipes.get(id).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(id.clone())))?;
        check_author(actor, &stored.author_id, "delete", id)?;
        recipes.remove(id);
        self.preferences.write().await.retain(|(recipe_id, _), _| recipe_id != id);
        Ok(())
    }

    async fn servings_preference(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<Option<ServingsPreference>> {
        let key = (recipe_id.clone(), user_id.clone());
        Ok(self.preferences.read().await.get(&key).cloned())
    }

    async fn set_servings_preference(&self, preference: &ServingsPreference) -> Result<()> {
        check_preference(preference)?;
        if !self.recipes.read().await.contains_key(&preference.recipe_id) {
            exn::bail!(ErrorKind::NotFound(preference.recipe_id.clone()));
        }
        let key = (preference.recipe_id.clone(), preference.user_id.clone());
        self.preferences.write().await.insert(key, preference.clone());
        Ok(())
    }
}
