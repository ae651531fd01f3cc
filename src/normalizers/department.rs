// 🏢 Department Normalizer - synonym table first, title case fallback
//
// "Ops Dept!", "ops dept" and "OPS   DEPT" all clean to the key "ops dept"
// before the lookup, so the table only needs one spelling per variant.
// Punctuation is dropped, not turned into a space: "Ops-Dept" cleans to "opsdept".

use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cleaned lowercase spelling -> canonical display name
pub static DEPARTMENT_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ops", "Operations"),
        ("ops dept", "Operations"),
        ("operations", "Operations"),
        ("operations team", "Operations"),
        ("o p s", "Operations"),
    ])
});

/// Normalize a free-text department label.
///
/// Returns the synonym table entry when the cleaned key matches one,
/// otherwise the cleaned key in Title Case.
pub fn normalize_department(value: &Value) -> Option<String> {
    let text = value.to_text()?;
    let key = department_key(&text);

    match DEPARTMENT_SYNONYMS.get(key.as_str()) {
        Some(canonical) => Some((*canonical).to_string()),
        None => Some(title_case(&key)),
    }
}

/// Lowercase, keep only a-z and spaces, collapse spaces
fn department_key(raw: &str) -> String {
    let letters: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect();

    letters.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first letter of every word. Keys are already lowercase.
fn title_case(key: &str) -> String {
    key.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
