//! Recipe models and the quantity scaling engine.
//!
//! Scaling a recipe from its default serving count to the number of servings
//! a reader asked for rewrites two things:
//!
//! - every numeric ingredient amount ([`scale_ingredients`]), and
//! - every quantity mentioned in the method text that is followed by a
//!   recognized unit ([`scale_text`]), e.g. "whisk in 2 cups milk".
//!
//! Everything here is pure. Loading the recipe, and loading the reader's
//! preferred serving count, is the caller's job.

mod consts;
pub mod error;
pub mod models;
mod payload;
mod scale;

use tracing::instrument;

use crate::error::Result;
use crate::models::Recipe;
pub use crate::payload::{ingredient_from_json, ingredients_from_json, instruction_from_json, instructions_from_json};
pub use crate::scale::{ScaleFactor, scale_ingredient, scale_ingredients, scale_text};

/// Easy, top-level entrypoint for scaling a whole [`Recipe`] to a serving count.
///
/// - Validates the serving counts (see [`ScaleFactor::from_servings`]),
/// - Scales ingredient amounts and the quantities mentioned in each step, and
/// - Returns a new recipe whose `servings` is the requested count.
///
/// The original recipe is left untouched.
///
/// # Examples
///
/// ```rust
/// use simmer_recipe::models::{Ingredient, Recipe};
/// use simmer_recipe::scale_recipe;
/// let recipe = Recipe::new("pancakes", "chef", "Pancakes", 4)
///     .with_ingredients([Ingredient::new("2", "cups", "flour")])
///     .with_instructions(["Sift 2 cups flour", "Cook 3 minutes per side"]);
/// let scaled = scale_recipe(&recipe, 6).unwrap();
/// assert_eq!(scaled.servings, 6);
/// assert_eq!(scaled.ingredients[0].amount, "3.00");
/// assert_eq!(scaled.instructions[0].as_str(), "Sift 3.00 cups flour");
/// assert_eq!(scaled.instructions[1].as_str(), "Cook 3 minutes per side");
/// ```
#[instrument(skip(recipe), fields(recipe_id = %recipe.id, from = recipe.servings))]
pub fn scale_recipe(recipe: &Recipe, servings: u32) -> Result<Recipe> {
    let factor = ScaleFactor::from_servings(recipe.servings, servings)?;
    Ok(Recipe {
        id: recipe.id.clone(),
        author_id: recipe.author_id.clone(),
        title: recipe.title.clone(),
        description: recipe.description.clone(),
        servings,
        prep_minutes: recipe.prep_minutes,
        cook_minutes: recipe.cook_minutes,
        ingredients: scale_ingredients(&recipe.ingredients, factor),
        instructions: recipe.instructions.iter().map(|step| step.scaled(factor)).collect(),
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{Ingredient, Instruction};

    fn pancakes() -> Recipe {
        Recipe::new("pancakes", "chef", "Pancakes", 4)
            .with_ingredients([
                Ingredient::new("2", "cups", "flour"),
                Ingredient::new("1", "tbsp", "sugar"),
                Ingredient::new("to taste", "", "salt"),
            ])
            .with_instructions(["Preheat the pan to 200 degrees", "Whisk 2 cups flour with 1 tbsp sugar"])
    }

    #[test]
    fn test_scale_recipe() {
        let recipe = pancakes();
        let scaled = scale_recipe(&recipe, 8).unwrap();
        assert_eq!(scaled.servings, 8);
        assert_eq!(
            scaled.ingredients,
            vec![
                Ingredient::new("4.00", "cups", "flour"),
                Ingredient::new("2.00", "tbsp", "sugar"),
                Ingredient::new("to taste", "", "salt"),
            ]
        );
        assert_eq!(
            scaled.instructions,
            vec![
                Instruction::new("Preheat the pan to 200 degrees"),
                Instruction::new("Whisk 4.00 cups flour with 2.00 tbsp sugar"),
            ]
        );
        assert_eq!(scaled.id, recipe.id);
        assert_eq!(scaled.title, recipe.title);
        // The original is untouched.
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.ingredients[0].amount, "2");
    }

    #[test]
    fn test_scale_recipe_rejects_zero_servings() {
        let err = scale_recipe(&pancakes(), 0).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidServings { value: 0, .. }));
    }

    #[test]
    fn test_scale_recipe_rejects_recipe_without_servings() {
        let mut recipe = pancakes();
        recipe.servings = 0;
        let err = scale_recipe(&recipe, 2).unwrap_err();
        assert!(matches!(
            *err,
            ErrorKind::InvalidServings {
                field: "default servings",
                ..
            }
        ));
    }
}
