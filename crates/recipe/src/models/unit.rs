use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::{Error, ErrorKind};

/// Units of measure recognized by the quantity scaler.
///
/// Each unit accepts its singular and plural names plus the usual kitchen
/// abbreviations. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Cup,
    Tablespoon,
    Teaspoon,
    Ounce,
    Pound,
    Gram,
    Kilogram,
    Milliliter,
    Liter,
}
impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::Cup,
        Unit::Tablespoon,
        Unit::Teaspoon,
        Unit::Ounce,
        Unit::Pound,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milliliter,
        Unit::Liter,
    ];

    /// Every accepted spelling of this unit, lowercase.
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            Unit::Cup => &["cup", "cups"],
            Unit::Tablespoon => &["tablespoon", "tablespoons", "tbsp"],
            Unit::Teaspoon => &["teaspoon", "teaspoons", "tsp"],
            Unit::Ounce => &["ounce", "ounces", "oz"],
            Unit::Pound => &["pound", "pounds", "lb", "lbs"],
            Unit::Gram => &["gram", "grams", "g"],
            Unit::Kilogram => &["kilogram", "kilograms", "kg"],
            Unit::Milliliter => &["milliliter", "milliliters", "ml"],
            Unit::Liter => &["liter", "liters", "l"],
        }
    }

    /// Returns the singular name of the unit.
    pub fn as_str(&self) -> &'static str {
        self.spellings()[0]
    }

    /// Regex alternation of every spelling of every unit, longest first.
    ///
    /// The regex crate picks the first alternative that lets the whole pattern
    /// match, so ordering by length keeps short abbreviations (`g`, `l`) from
    /// shadowing the full names that start with the same letters.
    pub(crate) fn alternation() -> String {
        let mut spellings: Vec<&str> = Self::ALL.iter().flat_map(|unit| unit.spellings().iter().copied()).collect();
        spellings.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        spellings.into_iter().map(regex::escape).collect::<Vec<_>>().join("|")
    }
}
impl FromStr for Unit {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|unit| unit.spellings().contains(&needle.as_str()))
            .ok_or_else(|| {
                exn::Exn::from(ErrorKind::ParseError {
                    field: "unit",
                    value: format!("unknown unit: {s}"),
                })
            })
    }
}
impl TryFrom<String> for Unit {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cup", Unit::Cup)]
    #[case("Cups", Unit::Cup)]
    #[case("TBSP", Unit::Tablespoon)]
    #[case("teaspoons", Unit::Teaspoon)]
    #[case("oz", Unit::Ounce)]
    #[case("lbs", Unit::Pound)]
    #[case(" g ", Unit::Gram)]
    #[case("Kilograms", Unit::Kilogram)]
    #[case("ml", Unit::Milliliter)]
    #[case("L", Unit::Liter)]
    fn test_parse(#[case] input: &str, #[case] expected: Unit) {
        assert_eq!(input.parse::<Unit>().unwrap(), expected);
    }

    #[rstest]
    #[case("pinch")]
    #[case("")]
    #[case("degrees")]
    fn test_parse_unknown(#[case] input: &str) {
        let err = input.parse::<Unit>().unwrap_err();
        assert!(matches!(*err, ErrorKind::ParseError { field: "unit", .. }));
    }

    #[test]
    fn test_alternation_is_longest_first() {
        let alternation = Unit::alternation();
        let position = |needle: &str| alternation.split('|').position(|s| s == needle).unwrap();
        assert!(position("kilograms") < position("kg"));
        assert!(position("grams") < position("g"));
        assert!(position("liters") < position("l"));
        assert!(position("lbs") < position("lb"));
    }
}
