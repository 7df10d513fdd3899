use tracing::instrument;

use super::ScaleFactor;
use crate::models::Ingredient;

/// Scales the amount of every ingredient in a list.
///
/// Numeric amounts are multiplied by `factor` and rewritten with exactly two
/// decimal places. Anything [`Ingredient::quantity`] doesn't consider a number
/// ("to taste", "1/2", "a pinch") is passed through unchanged; that is policy,
/// not an error. So is an amount that would overflow once scaled. The input is
/// never modified.
///
/// # Examples
///
/// ```rust
/// use simmer_recipe::models::Ingredient;
/// use simmer_recipe::{ScaleFactor, scale_ingredients};
/// let scaled = scale_ingredients(
///     &[Ingredient::new("2", "cup", "flour"), Ingredient::new("to taste", "", "salt")],
///     ScaleFactor::new(2.0).unwrap(),
/// );
/// assert_eq!(scaled[0].amount, "4.00");
/// assert_eq!(scaled[1].amount, "to taste");
/// ```
#[instrument(level = "trace", skip(ingredients), fields(count = ingredients.len()))]
pub fn scale_ingredients(ingredients: &[Ingredient], factor: ScaleFactor) -> Vec<Ingredient> {
    ingredients.iter().map(|ingredient| scale_ingredient(ingredient, factor)).collect()
}

/// Scales the amount of a single ingredient. See [`scale_ingredients`].
pub fn scale_ingredient(ingredient: &Ingredient, factor: ScaleFactor) -> Ingredient {
    let amount = ingredient
        .quantity()
        .and_then(|quantity| factor.apply_formatted(quantity))
        .unwrap_or_else(|| ingredient.amount.clone());
    Ingredient {
        amount,
        unit: ingredient.unit.clone(),
        item: ingredient.item.clone(),
    }
}
