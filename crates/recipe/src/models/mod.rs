mod ids;
mod ingredient;
mod instruction;
mod recipe;
mod unit;

pub use self::ids::{RecipeId, UserId};
pub use self::ingredient::Ingredient;
pub use self::instruction::Instruction;
pub use self::recipe::Recipe;
pub use self::unit::Unit;
