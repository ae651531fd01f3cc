// 📅 Flexible Date Parser
//
// Accepts the mix of date spellings found in exported CSVs:
// - RFC 3339 / ISO 8601 with offset ("2023-01-05T10:00:00Z") -> converted to UTC
// - RFC 2822 ("Thu, 05 Jan 2023 10:00:00 +0000")
// - Year-first numeric ("2023-01-05", "2023/01/05"), optional "T" or space + time,
//   the time optionally followed by "Z" or an offset ("T10:00+02:00") -> converted to UTC
// - Ambiguous numeric ("01/05/2023", "5-1-23"), resolved by one DateOrder per column
// - Compact "20230105"
// - Textual months ("Jan 5, 2023", "5 January 2023", "05-Jan-2023")
//
// The day/month order is decided ONCE per column, never per row, so
// "03/04/2023" means the same thing on every line of a file.

use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

// ============================================================================
// DATE ORDER STRATEGY
// ============================================================================

/// How to read an ambiguous numeric date such as "03/04/2023"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// 03/04/2023 = March 4th
    #[default]
    MonthFirst,

    /// 03/04/2023 = 3rd of April
    DayFirst,

    /// Look at the whole column for an unambiguous date, then pick one order
    Infer,
}

impl DateOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateOrder::MonthFirst => "month-first",
            DateOrder::DayFirst => "day-first",
            DateOrder::Infer => "infer",
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month-first" | "mdy" => Ok(DateOrder::MonthFirst),
            "day-first" | "dmy" => Ok(DateOrder::DayFirst),
            "infer" | "auto" => Ok(DateOrder::Infer),
            other => Err(format!(
                "unknown date order '{}' (expected month-first, day-first or infer)",
                other
            )),
        }
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

static TIME_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(.+?)(?:\s+|T)",
        r"(\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:\s*[AaPp][Mm])?)",
        r"(?:\s*([Zz]|[+-]\d{2}:?\d{2}))?$"
    ))
    .expect("time suffix pattern is valid")
});

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,4})([-/.])(\d{1,2})([-/.])(\d{1,4})$")
        .expect("numeric date pattern is valid")
});

static COMPACT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}$").expect("compact date pattern is valid"));

/// Month-name spellings; %B also accepts the three-letter abbreviation
const TEXTUAL_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
    "%d-%B-%y",
    "%Y %B %d",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

// ============================================================================
// DATE PARSER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DateParser {
    order: DateOrder,
}

impl DateParser {
    pub fn new(order: DateOrder) -> Self {
        DateParser { order }
    }

    /// Parse a whole column. Output has the same length and order as the input;
    /// anything unparseable becomes None.
    pub fn parse_column(&self, values: &[Value]) -> Vec<Option<NaiveDateTime>> {
        let order = self.resolve_order(values);
        debug!(order = %order, rows = values.len(), "parsing date column");
        values.iter().map(|v| parse_value(v, order)).collect()
    }

    /// The concrete order used for this column (never `Infer`)
    pub fn resolve_order(&self, values: &[Value]) -> DateOrder {
        match self.order {
            DateOrder::Infer => infer_order(values),
            fixed => fixed,
        }
    }
}

/// Free-function form of `DateParser::parse_column`
pub fn parse_flexible_date(values: &[Value], order: DateOrder) -> Vec<Option<NaiveDateTime>> {
    DateParser::new(order).parse_column(values)
}

fn parse_value(value: &Value, order: DateOrder) -> Option<NaiveDateTime> {
    match value {
        Value::Missing => None,
        Value::Timestamp(ts) => Some(*ts),
        Value::Float(_) => None,
        Value::Integer(n) => parse_text(&n.to_string(), order),
        Value::Text(s) => parse_text(s, order),
    }
}

fn parse_text(raw: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    let (date_part, time, offset) = match TIME_SUFFIX.captures(s) {
        Some(caps) => {
            let offset = match caps.get(3) {
                Some(m) => Some(parse_offset(m.as_str())?),
                None => None,
            };
            (caps.get(1)?.as_str().trim(), parse_time(&caps[2])?, offset)
        }
        None => (s, NaiveTime::MIN, None),
    };

    let local = parse_date_part(date_part, order)?.and_time(time);
    match offset {
        Some(offset) => offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.naive_utc()),
        None => Some(local),
    }
}

/// "Z", "+02:00", "-0530"
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

fn parse_date_part(s: &str, order: DateOrder) -> Option<NaiveDate> {
    if let Some(caps) = NUMERIC_DATE.captures(s) {
        if caps[2] != caps[4] {
            return None;
        }
        return numeric_date(&caps[1], &caps[3], &caps[5], order);
    }

    if COMPACT_DATE.is_match(s) {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }

    TEXTUAL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn numeric_date(first: &str, second: &str, third: &str, order: DateOrder) -> Option<NaiveDate> {
    let a: u32 = first.parse().ok()?;
    let b: u32 = second.parse().ok()?;
    let c: u32 = third.parse().ok()?;

    // Year-first is never ambiguous
    if first.len() == 4 {
        if third.len() > 2 {
            return None;
        }
        return NaiveDate::from_ymd_opt(a as i32, b, c);
    }

    let year = match third.len() {
        4 => c as i32,
        2 => expand_two_digit_year(c),
        _ => return None,
    };

    let (month, day) = match order {
        DateOrder::DayFirst => (b, a),
        _ => (a, b),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 00-68 -> 2000s, 69-99 -> 1900s
fn expand_two_digit_year(yy: u32) -> i32 {
    if yy < 69 {
        2000 + yy as i32
    } else {
        1900 + yy as i32
    }
}

/// Pick one order for the column from dates that can only be read one way
fn infer_order(values: &[Value]) -> DateOrder {
    let mut day_first = 0usize;
    let mut month_first = 0usize;

    for value in values {
        let Value::Text(raw) = value else { continue };
        let s = raw.trim();
        let date_part = match TIME_SUFFIX.captures(s) {
            Some(caps) => caps.get(1).map(|m| m.as_str().trim()).unwrap_or(s),
            None => s,
        };
        let Some(caps) = NUMERIC_DATE.captures(date_part) else { continue };
        if caps[1].len() == 4 {
            continue;
        }
        let (Ok(a), Ok(b)) = (caps[1].parse::<u32>(), caps[3].parse::<u32>()) else {
            continue;
        };

        if a > 12 && b <= 12 {
            day_first += 1;
        } else if b > 12 && a <= 12 {
            month_first += 1;
        }
    }

    if day_first > 0 && month_first > 0 {
        warn!(
            day_first,
            month_first, "date column mixes day-first and month-first dates, using month-first"
        );
        return DateOrder::MonthFirst;
    }

    if day_first > 0 {
        DateOrder::DayFirst
    } else {
        DateOrder::MonthFirst
    }
}

// ============================================================================
// TESTS
// ============================================================================
