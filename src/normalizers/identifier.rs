// Identifier canonicalization: "  ab cd " -> "ABCD"

use crate::value::Value;

/// Remove every whitespace character (internal ones too) and uppercase.
///
/// Idempotent: the output has no whitespace and is already uppercase.
pub fn canonicalize_identifier(value: &Value) -> Option<String> {
    let text = value.to_text()?;
    let compact: String = text.chars().filter(|c| !is_separator_space(*c)).collect();
    Some(compact.to_uppercase())
}

/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F,
/// which text exports treat as blank
fn is_separator_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
