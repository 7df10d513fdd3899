//! Recipe scaling, caching and persistence.
//!
//! [`Simmer`] owns the process-wide pieces: the recipe database and the recipe
//! cache in front of it. Build it once on start-up with [`Simmer::init`], hand
//! out [`Simmer::recipes`] to whatever needs to read or write recipes, and
//! call [`Simmer::dispose`] on shutdown.
//!
//! The individual crates are re-exported for callers that need more than the
//! facade offers.

pub mod error;

pub use simmer_cache as cache;
pub use simmer_config as config;
pub use simmer_recipe as recipe;
pub use simmer_store as store;

use exn::ResultExt;
use simmer_cache::{CacheOptions, CacheStats, CachingRepository, RecipeCache};
use simmer_config::{CacheConfig, Config};
use simmer_recipe::models::{Recipe, RecipeId, UserId};
use simmer_store::RepositoryHandle;
use simmer_store::backend::{Database, SqliteRepository};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

fn cache_options(config: &CacheConfig) -> CacheOptions {
    CacheOptions {
        ttl: config.ttl(),
        max_entries: config.max_entries,
    }
}

/// The recipe store and its cache, wired together.
#[derive(Debug)]
pub struct Simmer {
    database: Option<Database>,
    repository: Arc<CachingRepository>,
}

impl Simmer {
    /// Open (creating and migrating if needed) the configured SQLite database
    /// and put a fresh cache in front of it.
    #[instrument(skip_all)]
    pub async fn init(config: &Config) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;
        let path = config.database.resolved_path().or_raise(|| ErrorKind::Config)?;
        let database = Database::open(&path, config.database.max_connections)
            .await
            .or_raise(|| ErrorKind::Storage)?;
        tracing::info!(path = %path.display(), "Opened recipe database");
        let inner = Arc::new(SqliteRepository::from(&database));
        Ok(Self {
            database: Some(database),
            repository: Arc::new(CachingRepository::new(inner, RecipeCache::init(cache_options(&config.cache)))),
        })
    }

    /// Same as [`init`](Self::init), but with a throwaway in-memory database.
    pub async fn in_memory(config: &CacheConfig) -> Result<Self> {
        let database = Database::open_in_memory().await.or_raise(|| ErrorKind::Storage)?;
        let inner = Arc::new(SqliteRepository::from(&database));
        Ok(Self {
            database: Some(database),
            repository: Arc::new(CachingRepository::new(inner, RecipeCache::init(cache_options(config)))),
        })
    }

    /// Put a fresh cache in front of an existing repository.
    pub fn with_repository(inner: RepositoryHandle, config: &CacheConfig) -> Self {
        Self {
            database: None,
            repository: Arc::new(CachingRepository::new(inner, RecipeCache::init(cache_options(config)))),
        }
    }

    /// The cached recipe repository.
    pub fn recipes(&self) -> RepositoryHandle {
        self.repository.clone()
    }

    pub fn cache(&self) -> &RecipeCache {
        self.repository.cache()
    }

    /// Fetch a recipe scaled to the serving count `user_id` prefers for it.
    pub async fn scaled_recipe(&self, user_id: &UserId, recipe_id: &RecipeId) -> simmer_store::error::Result<Recipe> {
        self.repository.scaled_for(user_id, recipe_id).await
    }

    /// Drop every cached recipe and close the database.
    ///
    /// Returns the cache's statistics for the lifetime of this instance.
    #[instrument(skip_all)]
    pub async fn dispose(self) -> CacheStats {
        let stats = self.repository.cache().dispose();
        if let Some(database) = self.database {
            database.close().await;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simmer_recipe::models::Ingredient;
    use simmer_store::{RecipeRepository, ServingsPreference};
    use simmer_store::backend::MockRepository;
    use simmer_store::error::ErrorClass;

    fn flapjacks() -> Recipe {
        Recipe::new("flapjacks", "baker", "Flapjacks", 12)
            .with_ingredients([
                Ingredient::new("250", "g", "oats"),
                Ingredient::new("125", "g", "butter"),
                Ingredient::new("a pinch", "", "salt"),
            ])
            .with_instructions(["Melt 125 g butter", "Bake at 180 degrees for 25 minutes"])
    }

    #[tokio::test]
    async fn test_init_with_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = Some(dir.path().join("nested").join("recipes.sqlite"));

        let simmer = Simmer::init(&config).await.unwrap();
        simmer.recipes().insert(&flapjacks()).await.unwrap();
        simmer.dispose().await;

        // Reopening sees the recipe written before.
        let simmer = Simmer::init(&config).await.unwrap();
        let recipe = simmer.recipes().fetch(&RecipeId::new("flapjacks")).await.unwrap();
        assert_eq!(recipe.title, "Flapjacks");
        simmer.dispose().await;
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_config() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        let err = Simmer::init(&config).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Config));
    }

    #[tokio::test]
    async fn test_scaled_recipe_round_trip() {
        let simmer = Simmer::in_memory(&CacheConfig::default()).await.unwrap();
        let recipes = simmer.recipes();
        recipes.insert(&flapjacks()).await.unwrap();
        recipes
            .set_servings_preference(&ServingsPreference::new("flapjacks", "guest", 6))
            .await
            .unwrap();

        let scaled = simmer.scaled_recipe(&UserId::new("guest"), &RecipeId::new("flapjacks")).await.unwrap();
        assert_eq!(scaled.servings, 6);
        assert_eq!(scaled.ingredients[0].amount, "125.00");
        assert_eq!(scaled.ingredients[2].amount, "a pinch");
        assert_eq!(scaled.instructions[0].as_str(), "Melt 62.50 g butter");
        assert_eq!(scaled.instructions[1].as_str(), "Bake at 180 degrees for 25 minutes");
        assert_eq!(simmer.cache().len(), 1);

        let stats = simmer.dispose().await;
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_with_repository() {
        let mock = Arc::new(MockRepository::with_recipes([flapjacks()]));
        let simmer = Simmer::with_repository(mock.clone(), &CacheConfig::default());
        let id = RecipeId::new("flapjacks");
        simmer.recipes().fetch(&id).await.unwrap();
        simmer.recipes().fetch(&id).await.unwrap();
        assert_eq!(mock.fetch_count(), 1);

        let err = simmer.recipes().delete(&UserId::new("guest"), &id).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unauthorized);
        simmer.recipes().delete(&UserId::new("baker"), &id).await.unwrap();
        assert!(simmer.cache().is_empty());
        simmer.dispose().await;
    }
}
