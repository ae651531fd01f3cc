// 🧱 Value Model - one raw cell as it comes out of a CSV export
//
// Every normalizer takes a &Value and returns Option<T>. `Value::Missing` is the
// missing sentinel for raw cells; `None` is the missing sentinel for results.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Tokens a CSV reader treats as "no value"
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Display format for timestamps when they are converted to text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty cell or NA token
    Missing,

    /// Free text, kept verbatim (no trimming)
    Text(String),

    /// Whole-number column value
    Integer(i64),

    /// Decimal column value
    Float(f64),

    /// Already a calendar timestamp
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Classify a raw CSV field. Only NA detection happens here; numeric typing
    /// is decided per column by `Table` so a column keeps one type.
    pub fn from_field(field: &str) -> Self {
        if NA_TOKENS.contains(&field) {
            Value::Missing
        } else {
            Value::Text(field.to_string())
        }
    }

    /// NaN floats count as missing, the same way an empty cell does
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(x) => x.is_nan(),
            _ => false,
        }
    }

    /// The "convert to text" step shared by all normalizers.
    /// Returns None for missing values.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Missing => None,
            Value::Float(x) if x.is_nan() => None,
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Integer(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(x) => Some(Cow::Owned(format_float(*x))),
            Value::Timestamp(ts) => Some(Cow::Owned(ts.format(TIMESTAMP_FORMAT).to_string())),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(x) if !x.is_nan() => Some(*x),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Float(x) if !x.is_finite() => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Timestamp(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// Floats print the way a dataframe stringifies them: 12.0, 12.5, and
/// scientific notation outside 1e-4..1e16 (1e+16, 1.5e-05)
pub fn format_float(x: f64) -> String {
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let sci = format!("{:e}", x);
    if let Some((mantissa, exp)) = sci.split_once('e') {
        if let Ok(exp) = exp.parse::<i32>() {
            if x != 0.0 && !(-4..16).contains(&exp) {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exp.abs());
            }
        }
    }

    let s = x.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

// ============================================================================
// COLUMN TYPING
// ============================================================================

/// Promote a column of raw fields to one numeric type when every
/// non-missing field agrees, otherwise keep text
pub fn type_column(fields: Vec<Value>) -> Vec<Value> {
    let present = fields.iter().filter_map(|v| match v {
        Value::Text(s) => Some(s.as_str()),
        _ => None,
    });

    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    for s in present {
        any = true;
        if all_int && s.parse::<i64>().is_err() {
            all_int = false;
        }
        if s.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }

    if !any || !all_float {
        return fields;
    }

    fields
        .into_iter()
        .map(|v| match v {
            Value::Text(s) if all_int => s.parse::<i64>().map(Value::Integer).unwrap_or(Value::Missing),
            Value::Text(s) => s.parse::<f64>().map(Value::Float).unwrap_or(Value::Missing),
            other => other,
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
