use regex::Captures;
use tracing::instrument;

use super::ScaleFactor;
use crate::consts;

/// Scales every unit-qualified quantity mentioned in free text.
///
/// A quantity is a number followed (optionally after one whitespace character)
/// by a recognized [`Unit`](crate::models::Unit). Its number is multiplied by
/// `factor` and written back with two decimal places; the separator and the
/// unit keep their original spelling and case. Numbers that aren't followed by
/// a unit (oven temperatures, step numbers, timings) and every other byte of
/// the input are left exactly as they were.
///
/// Fractions ("1/2 cup") and ranges ("2-3 cups") are not understood: only the
/// number directly in front of the unit is considered.
///
/// # Examples
///
/// ```rust
/// use simmer_recipe::{ScaleFactor, scale_text};
/// let factor = ScaleFactor::new(1.5).unwrap();
/// assert_eq!(
///     scale_text("Whisk 2 cups flour, bake at 350 degrees", factor),
///     "Whisk 3.00 cups flour, bake at 350 degrees",
/// );
/// ```
#[instrument(level = "trace", skip(text), fields(text_len = text.len()))]
pub fn scale_text(text: &str, factor: ScaleFactor) -> String {
    consts::QUANTITY_REGEX
        .replace_all(text, |captures: &Captures<'_>| {
            let scaled = captures[1]
                .parse::<f64>()
                .ok()
                .filter(|quantity| quantity.is_finite())
                .and_then(|quantity| factor.apply_formatted(quantity));
            match scaled {
                Some(amount) => format!("{}{}{}", amount, &captures[2], &captures[3]),
                // `\d` is Unicode-aware: digits from other scripts match the
                // pattern but don't parse. Those, and overflowing products,
                // keep the original text.
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn factor(value: f64) -> ScaleFactor {
        ScaleFactor::new(value).unwrap()
    }

    #[rstest]
    #[case("Mix 2 cups flour", 1.5, "Mix 3.00 cups flour")]
    #[case("Add 500g sugar", 2.0, "Add 1000.00g sugar")]
    #[case("Add 1kg potatoes", 0.5, "Add 0.50kg potatoes")]
    #[case("Stir in 2 TBSP butter", 2.0, "Stir in 4.00 TBSP butter")]
    #[case("Pour 1.5 l water", 2.0, "Pour 3.00 l water")]
    #[case("Pour 3 liters stock", 2.0, "Pour 6.00 liters stock")]
    #[case("Season with 2lbs brisket", 2.0, "Season with 4.00lbs brisket")]
    #[case("Use 10 oz. chocolate", 0.5, "Use 5.00 oz. chocolate")]
    #[case("Fold in 250 grams of cream", 2.0, "Fold in 500.00 grams of cream")]
    #[case("Add 1 teaspoon vanilla", 3.0, "Add 3.00 teaspoon vanilla")]
    #[case("Add 100 ml milk", 1.0, "Add 100.00 ml milk")]
    #[case(
        "Step 3: add 1 cup milk and 2 tsp salt",
        2.0,
        "Step 3: add 2.00 cup milk and 4.00 tsp salt"
    )]
    fn test_scales_unit_quantities(#[case] input: &str, #[case] factor_value: f64, #[case] expected: &str) {
        assert_eq!(scale_text(input, factor(factor_value)), expected);
    }

    #[rstest]
    #[case("Add 1 cup sugar", 8, 1, "Add 0.13 cup sugar")]
    #[case("Add 3 cups stock", 8, 1, "Add 0.38 cups stock")]
    #[case("Fold in 2.5 cups flour", 4, 1, "Fold in 0.63 cups flour")]
    fn test_rounds_half_up(#[case] input: &str, #[case] default: u32, #[case] requested: u32, #[case] expected: &str) {
        let factor = ScaleFactor::from_servings(default, requested).unwrap();
        assert_eq!(scale_text(input, factor), expected);
    }

    #[test]
    fn test_overflowing_quantity_is_untouched() {
        // 2e308 is past f64::MAX.
        let input = format!("Add 1{} g salt", "0".repeat(308));
        assert_eq!(scale_text(&input, factor(2.0)), input);
        assert_eq!(scale_text(&input, factor(0.5)), format!("Add {:.2} g salt", 5e307));
    }

    #[rstest]
    #[case("Bake at 350 degrees for 20 minutes")]
    #[case("Beat 2 large eggs")]
    #[case("Bake 2 cupcakes")]
    #[case("Add 2 gallons water")]
    #[case("Serves 4")]
    #[case("")]
    #[case("No numbers here at all.")]
    #[case("Add \u{0662} cups flour")]
    fn test_leaves_other_text_untouched(#[case] input: &str) {
        for value in [0.25, 1.0, 1.5, 3.0] {
            assert_eq!(scale_text(input, factor(value)), input);
        }
    }

    #[test]
    fn test_only_quantities_with_units_change() {
        let input = "Preheat to 350 degrees. Mix 2 cups flour with 3 eggs, rest 10 minutes.";
        assert_eq!(
            scale_text(input, factor(2.0)),
            "Preheat to 350 degrees. Mix 4.00 cups flour with 3 eggs, rest 10 minutes."
        );
    }

    #[test]
    fn test_unicode_is_preserved() {
        let input = "Ajouter 2 cups de farine — très bien 🍞";
        assert_eq!(scale_text(input, factor(0.5)), "Ajouter 1.00 cups de farine — très bien 🍞");
    }

    #[test]
    fn test_deterministic() {
        let input = "Add 3 tbsp oil then 1 cup rice";
        assert_eq!(scale_text(input, factor(1.25)), scale_text(input, factor(1.25)));
    }
}
