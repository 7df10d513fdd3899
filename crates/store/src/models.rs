use simmer_recipe::models::{RecipeId, UserId};

/// A user's preferred serving count for a recipe.
///
/// Loading this is the caller's responsibility; the scaler only ever sees the
/// resulting number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServingsPreference {
    pub recipe_id: RecipeId,
    pub user_id: UserId,
    pub servings: u32,
}
impl ServingsPreference {
    pub fn new(recipe_id: impl Into<RecipeId>, user_id: impl Into<UserId>, servings: u32) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            user_id: user_id.into(),
            servings,
        }
    }
}
