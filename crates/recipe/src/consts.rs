use crate::models::Unit;
use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// A number, at most one whitespace character, then a unit that ends on a word
// boundary ("2 large eggs" must not read as two litres of "arge eggs").
// Capture groups: 1 = number, 2 = separator, 3 = unit as written.
regex!(QUANTITY_REGEX, format!(r"(?i)(\d+(?:\.\d+)?)(\s?)({})\b", Unit::alternation()).as_str());
