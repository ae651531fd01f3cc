// 💵 Amount Parser - "$1,234.56", "12,50", "USD 9.99" -> dollars
//
// Separator heuristics, applied in this order:
//   1. exactly one comma, no period    -> the comma is a decimal point  ("12,50")
//   2. several commas and a period, or one comma ahead of the last period
//      -> commas are thousands marks                                   ("1,234.56")
// Anything else goes to the float parser untouched, so "1,234,567" (several
// commas, no period) and "1.234,56" (period thousands, comma decimal) are
// locale-ambiguous and come back missing.

use crate::value::Value;

/// Parse a monetary amount in dollars. Rounding is left to the caller.
pub fn parse_monetary_amount(value: &Value) -> Option<f64> {
    if let Some(x) = value.as_f64() {
        return Some(x);
    }

    let text = value.to_text()?;
    let stripped = text.trim().replace('$', "").replace("USD", "");
    let mut x = stripped.trim().to_string();

    let commas = x.matches(',').count();
    let last_comma = x.rfind(',');
    let last_period = x.rfind('.');

    if commas == 1 && last_period.is_none() {
        x = x.replace(',', ".");
    } else if last_period.is_some() && (commas > 1 || (commas == 1 && last_comma < last_period)) {
        x = x.replace(',', "");
    }

    match x.parse::<f64>() {
        Ok(parsed) if !parsed.is_nan() => Some(parsed),
        _ => None,
    }
}

/// Round to two decimals, ties to even
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round_ties_even() / 100.0
}

/// Integer cents column -> dollars, rounded to two decimals
pub fn cents_to_dollars(value: &Value) -> Option<f64> {
    let cents = match value {
        Value::Text(s) => s.trim().parse::<f64>().ok().filter(|x| !x.is_nan())?,
        other => other.as_f64()?,
    };
    Some(round_to_cents(cents / 100.0))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Option<f64> {
        parse_monetary_amount(&Value::from(s))
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(amount("$1,234.56"), Some(1234.56));
        assert_eq!(amount("1,234,567.89"), Some(1234567.89));
    }

    #[test]
    fn test_european_decimal_comma() {
        assert_eq!(amount("12,50"), Some(12.50));
        assert_eq!(amount(" 7,5 USD "), Some(7.5));
    }

    #[test]
    fn test_currency_tokens_removed() {
        assert_eq!(amount("USD 9.99"), Some(9.99));
        assert_eq!(amount("$ 45"), Some(45.0));
        assert_eq!(amount("-$5.00"), Some(-5.0));
    }

    #[test]
    fn test_usd_token_is_case_sensitive() {
        assert_eq!(amount("9.99 usd"), None);
    }

    #[test]
    fn test_multi_comma_without_period_is_missing() {
        assert_eq!(amount("1,234,567"), None);
    }

    #[test]
    fn test_decimal_comma_with_period_thousands_is_missing() {
        assert_eq!(amount("1.234,56"), None);
        assert_eq!(amount("$1.234,56"), None);
        assert_eq!(amount("1,234.56"), Some(1234.56));
    }

    #[test]
    fn test_garbage_is_missing() {
        assert_eq!(amount("abc"), None);
        assert_eq!(amount(""), None);
        assert_eq!(amount("nan"), None);
    }

    #[test]
    fn test_numeric_values_pass_through() {
        assert_eq!(parse_monetary_amount(&Value::Float(12.5)), Some(12.5));
        assert_eq!(parse_monetary_amount(&Value::Integer(20)), Some(20.0));
        assert_eq!(parse_monetary_amount(&Value::Missing), None);
        assert_eq!(parse_monetary_amount(&Value::Float(f64::NAN)), None);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(12.345678), 12.35);
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(-3.999), -4.0);
    }

    #[test]
    fn test_cents_to_dollars() {
        assert_eq!(cents_to_dollars(&Value::Integer(123456)), Some(1234.56));
        assert_eq!(cents_to_dollars(&Value::Float(999.0)), Some(9.99));
        assert_eq!(cents_to_dollars(&Value::from(" 250 ")), Some(2.5));
        assert_eq!(cents_to_dollars(&Value::from("n/a cents")), None);
        assert_eq!(cents_to_dollars(&Value::Missing), None);
    }
}
