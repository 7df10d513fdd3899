//! Proportional scaling of recipe quantities.

mod factor;
mod ingredients;
mod text;

pub use self::factor::ScaleFactor;
pub use self::ingredients::{scale_ingredient, scale_ingredients};
pub use self::text::scale_text;
