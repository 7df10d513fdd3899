use std::fmt::{Display, Formatter, Result as FmtResult};

use super::Unit;

/// A single line of a recipe's ingredient list.
///
/// All three fields are free text. The `amount` is usually a number ("2",
/// "0.5") but may be anything the author typed ("to taste", "1/2", "a handful").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ingredient {
    pub amount: String,
    pub unit: String,
    pub item: String,
}
impl Ingredient {
    pub fn new(amount: impl Into<String>, unit: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            unit: unit.into(),
            item: item.into(),
        }
    }

    /// The amount as a number, if it is one.
    ///
    /// Parsing is strict: fractions ("1/2"), mixed numbers ("1 1/2") and
    /// anything with trailing text are not numbers. Neither are `NaN` or the
    /// infinities, even though [`f64`]'s parser accepts them.
    pub fn quantity(&self) -> Option<f64> {
        self.amount.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }

    /// The unit, if it is one the scaler recognizes.
    pub fn unit(&self) -> Option<Unit> {
        self.unit.parse().ok()
    }
}
impl Display for Ingredient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let parts = [self.amount.trim(), self.unit.trim(), self.item.trim()];
        let mut first = true;
        for part in parts.into_iter().filter(|p| !p.is_empty()) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2", Some(2.0))]
    #[case(" 0.5 ", Some(0.5))]
    #[case("1/2", None)]
    #[case("1 1/2", None)]
    #[case("to taste", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    #[case("", None)]
    fn test_quantity(#[case] amount: &str, #[case] expected: Option<f64>) {
        assert_eq!(Ingredient::new(amount, "cup", "flour").quantity(), expected);
    }

    #[rstest]
    #[case(Ingredient::new("2", "cups", "flour"), "2 cups flour")]
    #[case(Ingredient::new("to taste", "", "salt"), "to taste salt")]
    #[case(Ingredient::new("", "", "eggs"), "eggs")]
    fn test_display(#[case] ingredient: Ingredient, #[case] expected: &str) {
        assert_eq!(ingredient.to_string(), expected);
    }

    #[test]
    fn test_unit() {
        assert_eq!(Ingredient::new("2", "Tbsp", "butter").unit(), Some(Unit::Tablespoon));
        assert_eq!(Ingredient::new("1", "pinch", "salt").unit(), None);
    }
}
