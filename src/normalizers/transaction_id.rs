// 🔎 Transaction-ID Extractor - pull a 4+ digit reference out of complaint text
//
// A prefixed reference ("TXN-00123456", "#4821", "transaction 99812") wins over
// any bare digit run, even one that appears earlier in the text.

use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static PREFIXED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:TXN[-\s]*|#|transaction\s+|txn[-\s]*)(\d{4,})")
        .expect("prefixed transaction id pattern is valid")
});

// Greedy from the leftmost digit, so the match is always a whole run
// bounded by non-digits or the ends of the text.
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4,}").expect("bare transaction id pattern is valid"));

/// Extract the first transaction id from free text
pub fn extract_transaction_id(value: &Value) -> Option<String> {
    let text = value.to_text()?;

    if let Some(caps) = PREFIXED_ID.captures(&text) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    BARE_ID.find(&text).map(|m| m.as_str().to_string())
}

// ============================================================================
// TESTS
// ============================================================================
