// 🧹 Cleaning Pipeline - apply the field normalizers column-wise
//
// Transactions: merchant_id_std, timestamp_parsed, amount_usd
// Complaints:   merchant_id_std, received_date_parsed, amount_usd (if `amount`),
//               department_std, transaction_id_extracted
//
// Source columns are never modified; each step returns a new Table.

use crate::error::Result;
use crate::normalizers::{
    canonicalize_identifier, cents_to_dollars, extract_transaction_id, map_column,
    normalize_department, parse_monetary_amount, round_to_cents, DateOrder, DateParser,
};
use crate::table::Table;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const TRANSACTION_COLUMNS: &[&str] = &["merchant_id", "timestamp", "amount_cents"];
pub const COMPLAINT_COLUMNS: &[&str] = &[
    "merchant_id",
    "received_date",
    "department_name",
    "complaint_text",
];

/// Columns `clean_transactions` adds
pub const TRANSACTION_DERIVED: &[&str] = &["merchant_id_std", "timestamp_parsed", "amount_usd"];

/// Columns `clean_complaints` adds (`amount_usd` only when `amount` exists)
pub const COMPLAINT_DERIVED: &[&str] = &[
    "merchant_id_std",
    "received_date_parsed",
    "amount_usd",
    "department_std",
    "transaction_id_extracted",
];

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningOptions {
    /// Day/month order for ambiguous dates, applied per column
    pub date_order: DateOrder,
}

impl CleaningOptions {
    pub fn with_date_order(date_order: DateOrder) -> Self {
        CleaningOptions { date_order }
    }
}

// ============================================================================
// TABLE CLEANERS
// ============================================================================

pub fn clean_transactions(table: &Table, options: &CleaningOptions) -> Result<Table> {
    table.require_columns(TRANSACTION_COLUMNS)?;
    let dates = DateParser::new(options.date_order);

    let merchant_std = map_column(table.try_column("merchant_id")?, canonicalize_identifier);
    let timestamps = parse_dates(&dates, table.try_column("timestamp")?);
    let amount_usd = map_column(table.try_column("amount_cents")?, cents_to_dollars);

    let cleaned = table
        .with_column("merchant_id_std", merchant_std)?
        .with_column("timestamp_parsed", timestamps)?
        .with_column("amount_usd", amount_usd)?;

    info!(table = table.name(), rows = cleaned.len(), "cleaned transactions");
    Ok(cleaned)
}

pub fn clean_complaints(table: &Table, options: &CleaningOptions) -> Result<Table> {
    table.require_columns(COMPLAINT_COLUMNS)?;
    let dates = DateParser::new(options.date_order);

    let merchant_std = map_column(table.try_column("merchant_id")?, canonicalize_identifier);
    let received = parse_dates(&dates, table.try_column("received_date")?);

    let mut cleaned = table
        .with_column("merchant_id_std", merchant_std)?
        .with_column("received_date_parsed", received)?;

    match table.column("amount") {
        Some(amounts) => {
            let amount_usd = map_column(amounts, |v| parse_monetary_amount(v).map(round_to_cents));
            cleaned = cleaned.with_column("amount_usd", amount_usd)?;
        }
        None => debug!(table = table.name(), "no amount column, skipping amount_usd"),
    }

    let departments = map_column(table.try_column("department_name")?, normalize_department);
    let txn_ids = map_column(table.try_column("complaint_text")?, extract_transaction_id);

    let cleaned = cleaned
        .with_column("department_std", departments)?
        .with_column("transaction_id_extracted", txn_ids)?;

    info!(table = table.name(), rows = cleaned.len(), "cleaned complaints");
    Ok(cleaned)
}

fn parse_dates(parser: &DateParser, values: &[Value]) -> Vec<Value> {
    parser
        .parse_column(values)
        .into_iter()
        .map(Value::from)
        .collect()
}

// ============================================================================
// CLEANING REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub total: usize,
    pub parsed: usize,
    pub missing: usize,
}

impl ColumnStats {
    pub fn parse_rate(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.parsed as f64 / self.total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub table: String,
    pub rows: usize,
    pub columns: Vec<ColumnStats>,
}

impl CleaningReport {
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("{}: {} rows", self.table, self.rows)];
        for stats in &self.columns {
            lines.push(format!(
                "  {:<26} {:>6} parsed  {:>6} missing  ({:.1}%)",
                stats.column,
                stats.parsed,
                stats.missing,
                stats.parse_rate() * 100.0
            ));
        }
        lines.join("\n")
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Count parsed vs missing cells for each derived column present in `table`
pub fn report_for(table: &Table, derived: &[&str]) -> CleaningReport {
    let columns = derived
        .iter()
        .filter_map(|name| {
            let values = table.column(name)?;
            let missing = values.iter().filter(|v| v.is_missing()).count();
            Some(ColumnStats {
                column: name.to_string(),
                total: values.len(),
                parsed: values.len() - missing,
                missing,
            })
        })
        .collect();

    CleaningReport {
        table: table.name().to_string(),
        rows: table.len(),
        columns,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TidyError;

    const TRANSACTIONS: &str = "merchant_id,timestamp,amount_cents\n\
                                m 001,2023-01-05,123456\n\
                                M002 ,01/06/2023 14:00,999\n\
                                ,garbage,\n";

    const COMPLAINTS: &str = "merchant_id,received_date,department_name,complaint_text,amount\n\
                              m001,2023-01-07,OPS DEPT,Txn-00123456 failed,\"$1,234.56\"\n\
                              m 002,01/08/2023,finance,order 98765 ok,\"12,50\"\n\
                              M003,,,ref 12,abc\n";

    fn load(name: &str, csv: &str) -> Table {
        Table::from_reader(name, csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_clean_transactions() {
        let raw = load("transactions", TRANSACTIONS);
        let cleaned = clean_transactions(&raw, &CleaningOptions::default()).unwrap();

        assert_eq!(
            cleaned.column("merchant_id_std").unwrap(),
            &[Value::from("M001"), Value::from("M002"), Value::Missing]
        );
        assert_eq!(
            cleaned.column("amount_usd").unwrap(),
            &[Value::Float(1234.56), Value::Float(9.99), Value::Missing]
        );

        let ts = cleaned.column("timestamp_parsed").unwrap();
        assert_eq!(ts[0].to_string(), "2023-01-05 00:00:00");
        assert_eq!(ts[1].to_string(), "2023-01-06 14:00:00");
        assert_eq!(ts[2], Value::Missing);
    }

    #[test]
    fn test_clean_transactions_keeps_source_columns() {
        let raw = load("transactions", TRANSACTIONS);
        let cleaned = clean_transactions(&raw, &CleaningOptions::default()).unwrap();

        assert_eq!(&cleaned.headers()[..3], raw.headers());
        assert_eq!(cleaned.column("merchant_id"), raw.column("merchant_id"));
        assert_eq!(raw.headers().len(), 3);
    }

    #[test]
    fn test_clean_complaints() {
        let raw = load("complaints", COMPLAINTS);
        let cleaned = clean_complaints(&raw, &CleaningOptions::default()).unwrap();

        assert_eq!(
            cleaned.column("department_std").unwrap(),
            &[Value::from("Operations"), Value::from("Finance"), Value::Missing]
        );
        assert_eq!(
            cleaned.column("transaction_id_extracted").unwrap(),
            &[Value::from("00123456"), Value::from("98765"), Value::Missing]
        );
        assert_eq!(
            cleaned.column("amount_usd").unwrap(),
            &[Value::Float(1234.56), Value::Float(12.5), Value::Missing]
        );
        assert_eq!(
            cleaned.column("merchant_id_std").unwrap(),
            &[Value::from("M001"), Value::from("M002"), Value::from("M003")]
        );
        assert_eq!(cleaned.column("received_date_parsed").unwrap()[2], Value::Missing);
    }

    #[test]
    fn test_complaints_without_amount_column() {
        let raw = load(
            "complaints",
            "merchant_id,received_date,department_name,complaint_text\nx,2023-01-01,ops,#4444\n",
        );
        let cleaned = clean_complaints(&raw, &CleaningOptions::default()).unwrap();
        assert!(!cleaned.has_column("amount_usd"));
        assert_eq!(
            cleaned.column("transaction_id_extracted").unwrap(),
            &[Value::from("4444")]
        );
    }

    #[test]
    fn test_missing_required_column() {
        let raw = load("transactions", "merchant_id,timestamp\nA,2023-01-01\n");
        let err = clean_transactions(&raw, &CleaningOptions::default()).unwrap_err();
        assert!(matches!(err, TidyError::MissingColumn { ref column, .. } if column == "amount_cents"));
    }

    #[test]
    fn test_day_first_option() {
        let raw = load("complaints", COMPLAINTS);
        let options = CleaningOptions::with_date_order(DateOrder::DayFirst);
        let cleaned = clean_complaints(&raw, &options).unwrap();
        assert_eq!(
            cleaned.column("received_date_parsed").unwrap()[1].to_string(),
            "2023-08-01 00:00:00"
        );
    }

    #[test]
    fn test_report_for() {
        let raw = load("complaints", COMPLAINTS);
        let cleaned = clean_complaints(&raw, &CleaningOptions::default()).unwrap();
        let report = report_for(&cleaned, COMPLAINT_DERIVED);

        assert_eq!(report.rows, 3);
        assert_eq!(report.columns.len(), 5);

        let dept = report.column("department_std").unwrap();
        assert_eq!((dept.parsed, dept.missing), (2, 1));
        assert!(report.summary().contains("transaction_id_extracted"));
        assert_eq!(report.total_missing(), 4);
    }
}
