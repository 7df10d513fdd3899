use crate::ServingsPreference;
use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use serde_json::Value;
use simmer_recipe::models::{Recipe, RecipeId, UserId};
use simmer_recipe::{ingredients_from_json, instructions_from_json};
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct RecipeRow {
    pub(crate) id: String,
    pub(crate) author_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) servings: i64,
    pub(crate) prep_minutes: Option<i64>,
    pub(crate) cook_minutes: Option<i64>,
    pub(crate) ingredients: String,
    pub(crate) instructions: String,
    pub(crate) created_at: i64,
    pub(crate) updated_at: i64,
}
impl TryFrom<&Recipe> for RecipeRow {
    type Error = Error;
    fn try_from(recipe: &Recipe) -> Result<Self, Self::Error> {
        Ok(Self {
            id: recipe.id.to_string(),
            author_id: recipe.author_id.to_string(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            servings: i64::from(recipe.servings),
            prep_minutes: recipe.prep_minutes.map(i64::from),
            cook_minutes: recipe.cook_minutes.map(i64::from),
            ingredients: serde_json::to_string(&recipe.ingredients).or_raise(|| ErrorKind::InvalidData("ingredients"))?,
            instructions: serde_json::to_string(&recipe.instructions)
                .or_raise(|| ErrorKind::InvalidData("instructions"))?,
            created_at: recipe.created_at.unix_timestamp(),
            updated_at: recipe.updated_at.unix_timestamp(),
        })
    }
}
impl TryFrom<RecipeRow> for Recipe {
    type Error = Error;
    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        // Lists are untrusted: anything that was written by another client
        // goes through the validation boundary, which drops malformed entries.
        let ingredients: Value = serde_json::from_str(&row.ingredients).or_raise(|| ErrorKind::InvalidData("ingredients"))?;
        let instructions: Value =
            serde_json::from_str(&row.instructions).or_raise(|| ErrorKind::InvalidData("instructions"))?;
        Ok(Self {
            id: RecipeId::new(row.id),
            author_id: UserId::new(row.author_id),
            title: row.title,
            description: row.description,
            servings: u32::try_from(row.servings).or_raise(|| ErrorKind::InvalidData("servings"))?,
            prep_minutes: row
                .prep_minutes
                .map(|m| u32::try_from(m).or_raise(|| ErrorKind::InvalidData("prep minutes")))
                .transpose()?,
            cook_minutes: row
                .cook_minutes
                .map(|m| u32::try_from(m).or_raise(|| ErrorKind::InvalidData("cook minutes")))
                .transpose()?,
            ingredients: ingredients_from_json(&ingredients),
            instructions: instructions_from_json(&instructions),
            created_at: UtcDateTime::from_unix_timestamp(row.created_at)
                .or_raise(|| ErrorKind::InvalidData("creation date"))?,
            updated_at: UtcDateTime::from_unix_timestamp(row.updated_at)
                .or_raise(|| ErrorKind::InvalidData("update date"))?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PreferenceRow {
    pub(crate) recipe_id: String,
    pub(crate) user_id: String,
    pub(crate) servings: i64,
}
impl TryFrom<PreferenceRow> for ServingsPreference {
    type Error = Error;
    fn try_from(row: PreferenceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            recipe_id: RecipeId::new(row.recipe_id),
            user_id: UserId::new(row.user_id),
            servings: u32::try_from(row.servings).or_raise(|| ErrorKind::InvalidData("servings"))?,
        })
    }
}
