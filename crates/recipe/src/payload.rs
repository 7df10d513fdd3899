//! Validation boundary for loosely-typed recipe payloads.
//!
//! Ingredient and instruction lists arrive from storage as arbitrary JSON.
//! Everything passes through here before it becomes an [`Ingredient`] or an
//! [`Instruction`]: well-formed entries are converted, malformed entries are
//! dropped with a warning instead of failing the whole recipe.

use exn::OptionExt;
use serde_json::{Map, Value};

use crate::error::{ErrorKind, Result};
use crate::models::{Ingredient, Instruction};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Optional free-text field: a string, a number (stringified), or absent/null
/// (empty string). Anything else is malformed.
fn text_field(object: &Map<String, Value>, field: &'static str) -> Result<String> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => exn::bail!(ErrorKind::ParseError {
            field,
            value: format!("expected string, found {}", json_kind(other)),
        }),
    }
}

/// Convert one JSON value into an [`Ingredient`].
///
/// The value must be an object with a non-blank `item`. `amount` and `unit`
/// may be strings, numbers, null or missing.
pub fn ingredient_from_json(value: &Value) -> Result<Ingredient> {
    let object = value.as_object().ok_or_raise(|| ErrorKind::ParseError {
        field: "ingredient",
        value: format!("expected object, found {}", json_kind(value)),
    })?;
    let item = text_field(object, "item")?;
    if item.trim().is_empty() {
        exn::bail!(ErrorKind::ParseError {
            field: "item",
            value: "ingredient has no item".to_string(),
        });
    }
    Ok(Ingredient {
        amount: text_field(object, "amount")?,
        unit: text_field(object, "unit")?,
        item,
    })
}

/// Convert one JSON value into an [`Instruction`].
///
/// Accepts a plain string, or an object carrying the step in a `text` field.
/// Blank steps are rejected.
pub fn instruction_from_json(value: &Value) -> Result<Instruction> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(object) => object.get("text").and_then(Value::as_str).ok_or_raise(|| ErrorKind::ParseError {
            field: "instruction",
            value: "object has no string `text` field".to_string(),
        })?,
        other => exn::bail!(ErrorKind::ParseError {
            field: "instruction",
            value: format!("expected string or object, found {}", json_kind(other)),
        }),
    };
    if text.trim().is_empty() {
        exn::bail!(ErrorKind::ParseError {
            field: "instruction",
            value: "blank step".to_string(),
        });
    }
    Ok(Instruction::new(text))
}

fn filter_list<T>(value: &Value, list: &'static str, convert: impl Fn(&Value) -> Result<T>) -> Vec<T> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Null => return Vec::new(),
        other => {
            tracing::warn!(list, found = json_kind(other), "Expected a JSON array; treating as empty");
            return Vec::new();
        },
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match convert(entry) {
            Ok(converted) => Some(converted),
            Err(error) => {
                tracing::warn!(list, index, error = ?error, "Dropping malformed entry");
                None
            },
        })
        .collect()
}

/// Parse an untrusted ingredient list, keeping only well-formed entries.
///
/// # Examples
///
/// ```rust
/// use simmer_recipe::ingredients_from_json;
/// let value = serde_json::json!([
///     {"amount": "2", "unit": "cup", "item": "flour"},
///     {"amount": 1.5, "item": "eggs"},
///     "not an ingredient",
/// ]);
/// let ingredients = ingredients_from_json(&value);
/// assert_eq!(ingredients.len(), 2);
/// assert_eq!(ingredients[1].amount, "1.5");
/// ```
pub fn ingredients_from_json(value: &Value) -> Vec<Ingredient> {
    filter_list(value, "ingredients", ingredient_from_json)
}

/// Parse an untrusted instruction list, keeping only well-formed entries.
pub fn instructions_from_json(value: &Value) -> Vec<Instruction> {
    filter_list(value, "instructions", instruction_from_json)
}
