// Field Normalizers
// Pure single-value rules that make the transaction and complaint exports joinable
//
// Each normalizer:
// - Takes one raw &Value (dates take the whole column)
// - Returns Option<T>, None being the missing sentinel
// - Never panics or errors on malformed input

pub mod amount;
pub mod date;
pub mod department;
pub mod identifier;
pub mod transaction_id;

pub use amount::{cents_to_dollars, parse_monetary_amount, round_to_cents};
pub use date::{parse_flexible_date, DateOrder, DateParser};
pub use department::{normalize_department, DEPARTMENT_SYNONYMS};
pub use identifier::canonicalize_identifier;
pub use transaction_id::extract_transaction_id;

use crate::value::Value;

/// Apply a single-value normalizer down a column, keeping length and order
pub fn map_column<T, F>(values: &[Value], normalize: F) -> Vec<Value>
where
    T: Into<Value>,
    F: Fn(&Value) -> Option<T>,
{
    values.iter().map(|v| Value::from(normalize(v))).collect()
}
