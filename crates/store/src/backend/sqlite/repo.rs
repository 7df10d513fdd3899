use super::Database;
use super::rows::{PreferenceRow, RecipeRow};
use crate::backend::{RecipeRepository, check_author, check_preference, check_recipe};
use crate::error::{ErrorKind, Result};
use crate::ServingsPreference;
use async_trait::async_trait;
use exn::ResultExt;
use simmer_recipe::models::{Recipe, RecipeId, UserId};
use sqlx::SqlitePool;
use time::UtcDateTime;
use tracing::instrument;

/// Recipe repository on top of a [`Database`] connection pool.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    name: String,
    pool: SqlitePool,
}
impl From<&Database> for SqliteRepository {
    fn from(db: &Database) -> Self {
        Self::new(db.pool().clone())
    }
}
impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            name: "sqlite".to_string(),
            pool,
        }
    }

    async fn author_of(&self, id: &RecipeId) -> Result<UserId> {
        let row: Option<(String,)> = sqlx::query_as(include_str!("../../../queries/get_author.sql"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match row {
            Some((author,)) => Ok(UserId::new(author)),
            None => exn::bail!(ErrorKind::NotFound(id.clone())),
        }
    }
}

#[async_trait]
impl RecipeRepository for SqliteRepository {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn fetch(&self, id: &RecipeId) -> Result<Recipe> {
        let row: Option<RecipeRow> = sqlx::query_as(include_str!("../../../queries/get_recipe.sql"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match row {
            Some(row) => row.try_into(),
            None => exn::bail!(ErrorKind::NotFound(id.clone())),
        }
    }

    async fn list(&self, limit: usize) -> Result<Vec<Recipe>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<RecipeRow> = sqlx::query_as(include_str!("../../../queries/list_recipes.sql"))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Recipe::try_from).collect()
    }

    #[instrument(skip_all, fields(backend = %self.name, recipe = %recipe.id))]
    async fn insert(&self, recipe: &Recipe) -> Result<()> {
        check_recipe(recipe)?;
        let row = RecipeRow::try_from(recipe)?;
        let result = sqlx::query(include_str!("../../../queries/insert_recipe.sql"))
            .bind(row.id)
            .bind(row.author_id)
            .bind(row.title)
            .bind(row.description)
            .bind(row.servings)
            .bind(row.prep_minutes)
            .bind(row.cook_minutes)
            .bind(row.ingredients)
            .bind(row.instructions)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => exn::bail!(ErrorKind::Validation {
                field: "id",
                message: format!("recipe {} already exists", recipe.id),
            }),
            Err(err) => Err::<(), _>(err).or_raise(|| ErrorKind::Database),
        }
    }

    #[instrument(skip_all, fields(backend = %self.name, actor = %actor, recipe = %recipe.id))]
    async fn update(&self, actor: &UserId, recipe: &Recipe) -> Result<Recipe> {
        check_recipe(recipe)?;
        let author = self.author_of(&recipe.id).await?;
        check_author(actor, &author, "update", &recipe.id)?;
        let row = RecipeRow::try_from(&Recipe {
            updated_at: UtcDateTime::now(),
            ..recipe.clone()
        })?;
        sqlx::query(include_str!("../../../queries/update_recipe.sql"))
            .bind(row.title)
            .bind(row.description)
            .bind(row.servings)
            .bind(row.prep_minutes)
            .bind(row.cook_minutes)
            .bind(row.ingredients)
            .bind(row.instructions)
            .bind(row.updated_at)
            .bind(row.id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.fetch(&recipe.id).await
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn delete(&self, actor: &UserId, id: &RecipeId) -> Result<()> {
        let author = self.author_of(id).await?;
        check_author(actor, &author, "delete", id)?;
        // Preferences go with it (ON DELETE CASCADE).
        sqlx::query(include_str!("../../../queries/delete_recipe.sql"))
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn servings_preference(&self, recipe_id: &RecipeId, user_id: &UserId) -> Result<Option<ServingsPreference>> {
        let row: Option<PreferenceRow> = sqlx::query_as(include_str!("../../../queries/get_servings_preference.sql"))
            .bind(recipe_id.as_str())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(ServingsPreference::try_from).transpose()
    }

    #[instrument(skip_all, fields(backend = %self.name, recipe = %preference.recipe_id, user = %preference.user_id))]
    async fn set_servings_preference(&self, preference: &ServingsPreference) -> Result<()> {
        check_preference(preference)?;
        // Surfaces NotFound instead of a foreign key violation.
        self.author_of(&preference.recipe_id).await?;
        sqlx::query(include_str!("../../../queries/upsert_servings_preference.sql"))
            .bind(preference.recipe_id.as_str())
            .bind(preference.user_id.as_str())
            .bind(i64::from(preference.servings))
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use rstest::rstest;
    use simmer_recipe::models::{Ingredient, Instruction};

    fn pancakes() -> Recipe {
        Recipe::new("pancakes", "chef", "Pancakes", 4)
            .with_times(Some(10), Some(15))
            .with_ingredients([
                Ingredient::new("2", "cups", "flour"),
                Ingredient::new("1.5", "cups", "milk"),
                Ingredient::new("2", "", "eggs"),
            ])
            .with_instructions(["Whisk 2 cups flour with 1.5 cups milk", "Fry in batches"])
    }

    async fn repository() -> SqliteRepository {
        let db = Database::open_in_memory().await.unwrap();
        SqliteRepository::from(&db)
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let repository = repository().await;
        let recipe = pancakes();
        repository.insert(&recipe).await.unwrap();
        let fetched = repository.fetch(&recipe.id).await.unwrap();
        assert_eq!(fetched.title, "Pancakes");
        assert_eq!(fetched.servings, 4);
        assert_eq!(fetched.total_minutes(), Some(25));
        assert_eq!(fetched.ingredients, recipe.ingredients);
        assert_eq!(fetched.instructions, recipe.instructions);
        assert_eq!(fetched.created_at.unix_timestamp(), recipe.created_at.unix_timestamp());
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let repository = repository().await;
        let err = repository.fetch(&RecipeId::new("waffles")).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
        assert!(!repository.exists(&RecipeId::new("waffles")).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_duplicate() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let err = repository.insert(&pancakes()).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Validation { field: "id", .. }));
    }

    #[tokio::test]
    async fn test_insert_invalid() {
        let repository = repository().await;
        let mut recipe = pancakes();
        recipe.servings = 0;
        let err = repository.insert(&recipe).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
        assert!(!repository.exists(&recipe.id).await.unwrap());
    }

    #[rstest]
    #[case::blank_item(vec![Ingredient::new("2", "slices", ""), Ingredient::new("1", "tbsp", "butter")], vec![])]
    #[case::blank_step(vec![], vec![Instruction::new(""), Instruction::new("Toast the bread")])]
    #[tokio::test]
    async fn test_insert_rejects_blank_lines(
        #[case] ingredients: Vec<Ingredient>,
        #[case] instructions: Vec<Instruction>,
    ) {
        let repository = repository().await;
        let recipe = Recipe::new("toast", "chef", "Buttered Toast", 1)
            .with_ingredients(ingredients)
            .with_instructions(instructions);
        let err = repository.insert(&recipe).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
        assert!(!repository.exists(&recipe.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_item() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let mut changed = pancakes();
        changed.ingredients.push(Ingredient::new("1", "pinch", " "));
        let err = repository.update(&UserId::new("chef"), &changed).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
        let stored = repository.fetch(&changed.id).await.unwrap();
        assert_eq!(stored.ingredients, pancakes().ingredients);
    }

    #[tokio::test]
    async fn test_round_trip_keeps_every_line() {
        let repository = repository().await;
        let recipe = Recipe::new("toast", "chef", "Buttered Toast", 1)
            .with_ingredients([
                Ingredient::new("2", "slices", "bread"),
                Ingredient::new("", "", "butter"),
                Ingredient::new("to taste", "", "salt"),
            ])
            .with_instructions(["Toast 2 slices bread", "Butter while hot"]);
        repository.insert(&recipe).await.unwrap();
        let fetched = repository.fetch(&recipe.id).await.unwrap();
        assert_eq!(fetched.ingredients, recipe.ingredients);
        assert_eq!(fetched.instructions, recipe.instructions);
    }

    #[tokio::test]
    async fn test_update_by_author() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let mut changed = pancakes();
        changed.servings = 8;
        changed.author_id = UserId::new("impostor");
        let updated = repository.update(&UserId::new("chef"), &changed).await.unwrap();
        assert_eq!(updated.servings, 8);
        assert_eq!(updated.author_id, UserId::new("chef"));
    }

    #[tokio::test]
    async fn test_update_by_other_user() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let err = repository.update(&UserId::new("guest"), &pancakes()).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unauthorized);
        assert_eq!((*err).to_string(), "user guest may not update recipe pancakes");
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repository = repository().await;
        let err = repository.update(&UserId::new("chef"), &pancakes()).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_preferences() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let preference = ServingsPreference::new("pancakes", "reader", 2);
        repository.set_servings_preference(&preference).await.unwrap();

        let err = repository.delete(&UserId::new("reader"), &preference.recipe_id).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unauthorized);

        repository.delete(&UserId::new("chef"), &preference.recipe_id).await.unwrap();
        assert!(!repository.exists(&preference.recipe_id).await.unwrap());
        let found = repository.servings_preference(&preference.recipe_id, &preference.user_id).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_servings_preference_upsert() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let recipe = RecipeId::new("pancakes");
        let user = UserId::new("reader");
        assert_eq!(repository.servings_preference(&recipe, &user).await.unwrap(), None);

        repository.set_servings_preference(&ServingsPreference::new("pancakes", "reader", 2)).await.unwrap();
        repository.set_servings_preference(&ServingsPreference::new("pancakes", "reader", 6)).await.unwrap();
        let found = repository.servings_preference(&recipe, &user).await.unwrap().unwrap();
        assert_eq!(found.servings, 6);
    }

    #[tokio::test]
    async fn test_servings_preference_rejected() {
        let repository = repository().await;
        repository.insert(&pancakes()).await.unwrap();
        let err = repository.set_servings_preference(&ServingsPreference::new("pancakes", "reader", 0)).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
        let err = repository.set_servings_preference(&ServingsPreference::new("waffles", "reader", 2)).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repository = repository().await;
        let mut older = Recipe::new("older", "chef", "Older", 2);
        older.updated_at = UtcDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let mut newer = Recipe::new("newer", "chef", "Newer", 2);
        newer.updated_at = UtcDateTime::from_unix_timestamp(1_800_000_000).unwrap();
        repository.insert(&older).await.unwrap();
        repository.insert(&newer).await.unwrap();

        let ids: Vec<String> = repository.list(10).await.unwrap().into_iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["newer", "older"]);
        assert_eq!(repository.list(1).await.unwrap().len(), 1);
    }
}
