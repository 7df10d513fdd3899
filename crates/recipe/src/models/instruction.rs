use derive_more::{Display, From};

use crate::scale::{ScaleFactor, scale_text};

/// One step of a recipe's method, as free text.
///
/// Steps routinely mention quantities ("whisk in 2 cups milk"), which is why
/// scaling a recipe has to rewrite them too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Instruction(String);
impl Instruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a copy of this step with every unit-qualified quantity scaled.
    pub fn scaled(&self, factor: ScaleFactor) -> Self {
        Self(scale_text(&self.0, factor))
    }
}
impl From<&str> for Instruction {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl AsRef<str> for Instruction {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
