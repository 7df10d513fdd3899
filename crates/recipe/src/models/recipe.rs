use super::{Ingredient, Instruction, RecipeId, UserId};
use crate::error::{ErrorKind, Result};
use time::UtcDateTime;

/// A recipe as stored and served by the recipe repository.
///
/// `servings` is the author's default serving count: the number every
/// quantity in `ingredients` and `instructions` was written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub servings: u32,
    pub prep_minutes: Option<u32>,
    pub cook_minutes: Option<u32>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub created_at: UtcDateTime,
    pub updated_at: UtcDateTime,
}
impl Recipe {
    /// Create an empty recipe, timestamped now.
    pub fn new(id: impl Into<RecipeId>, author_id: impl Into<UserId>, title: impl Into<String>, servings: u32) -> Self {
        let now = UtcDateTime::now();
        Self {
            id: id.into(),
            author_id: author_id.into(),
            title: title.into(),
            description: None,
            servings,
            prep_minutes: None,
            cook_minutes: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_times(mut self, prep_minutes: Option<u32>, cook_minutes: Option<u32>) -> Self {
        self.prep_minutes = prep_minutes;
        self.cook_minutes = cook_minutes;
        self
    }

    pub fn with_ingredients(mut self, ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        self.ingredients = ingredients.into_iter().collect();
        self
    }

    pub fn with_instructions(mut self, instructions: impl IntoIterator<Item = impl Into<Instruction>>) -> Self {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    /// Total hands-on plus oven time, when at least one of them is known.
    pub fn total_minutes(&self) -> Option<u32> {
        match (self.prep_minutes, self.cook_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
        }
    }

    /// Check the invariants every stored recipe must hold.
    ///
    /// Every ingredient needs an item and every instruction needs some text.
    /// Amounts and units may be blank.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            exn::bail!(ErrorKind::InvalidRecipe("title must not be empty"));
        }
        if self.servings == 0 {
            exn::bail!(ErrorKind::InvalidServings {
                field: "servings",
                value: self.servings,
            });
        }
        if self.ingredients.iter().any(|ingredient| ingredient.item.trim().is_empty()) {
            exn::bail!(ErrorKind::InvalidRecipe("ingredient item must not be empty"));
        }
        if self.instructions.iter().any(|step| step.as_str().trim().is_empty()) {
            exn::bail!(ErrorKind::InvalidRecipe("instruction must not be empty"));
        }
        Ok(())
    }
}
