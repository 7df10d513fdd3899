use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{Error, ErrorKind, Result};

/// Multiplier applied to every scalable quantity in a recipe.
///
/// Always finite and strictly positive. Construct it from serving counts with
/// [`from_servings`](Self::from_servings), which rejects the inputs a caller
/// must never pass on (a recipe with no default servings, or a request for
/// fewer than one serving).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);
impl ScaleFactor {
    /// The factor that leaves quantities as they are (apart from formatting).
    pub const IDENTITY: Self = Self(1.0);

    pub fn new(factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            exn::bail!(ErrorKind::InvalidFactor(factor.to_string()));
        }
        Ok(Self(factor))
    }

    /// `requested / default`, after checking both are at least one.
    pub fn from_servings(default: u32, requested: u32) -> Result<Self> {
        if default == 0 {
            exn::bail!(ErrorKind::InvalidServings {
                field: "default servings",
                value: default,
            });
        }
        if requested < 1 {
            exn::bail!(ErrorKind::InvalidServings {
                field: "requested servings",
                value: requested,
            });
        }
        Ok(Self(f64::from(requested) / f64::from(default)))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0 == 1.0
    }

    /// Multiply a quantity by this factor.
    pub fn apply(&self, quantity: f64) -> f64 {
        quantity * self.0
    }

    /// Multiply a quantity by this factor and render it with exactly two
    /// decimal places, the format every scaled amount is written back in.
    ///
    /// Ties round half away from zero (`0.625` becomes `"0.63"`). Returns
    /// `None` when the product overflows to infinity.
    pub fn apply_formatted(&self, quantity: f64) -> Option<String> {
        let scaled = self.apply(quantity);
        if !scaled.is_finite() {
            return None;
        }
        let cents = scaled * 100.0;
        // Past ~1e15 there is nothing left to round, and `cents` may overflow.
        let rounded = if cents.is_finite() { cents.round() / 100.0 } else { scaled };
        Some(format!("{rounded:.2}"))
    }
}
impl TryFrom<f64> for ScaleFactor {
    type Error = Error;
    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl Display for ScaleFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "x{}", self.0)
    }
}
