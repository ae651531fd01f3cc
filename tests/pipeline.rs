// End-to-end: load the sample exports, clean, write, read back

use ledger_tidy::{
    clean_complaints, clean_transactions, report_for, CleaningOptions, Table, Value,
    COMPLAINT_DERIVED, TRANSACTION_DERIVED,
};
use std::path::Path;
use tempfile::tempdir;

fn sample(name: &str) -> Table {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name);
    Table::from_path(&path).unwrap()
}

fn texts(values: &[Value]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_clean_sample_transactions() {
    let raw = sample("transactions.csv");
    assert_eq!(raw.name(), "transactions");
    assert_eq!(raw.len(), 5);

    let cleaned = clean_transactions(&raw, &CleaningOptions::default()).unwrap();

    assert_eq!(
        texts(cleaned.column("merchant_id_std").unwrap()),
        vec!["M001", "M002", "M003", "M004", "M005"]
    );
    assert_eq!(
        texts(cleaned.column("timestamp_parsed").unwrap()),
        vec![
            "2023-01-05 09:15:00",
            "2023-01-06 00:00:00",
            "2023-01-07 00:00:00",
            "2023-01-08 18:45:00",
            "",
        ]
    );
    assert_eq!(
        cleaned.column("amount_usd").unwrap(),
        &[
            Value::Float(1234.56),
            Value::Float(9.99),
            Value::Float(2.5),
            Value::Missing,
            Value::Float(10000.0),
        ]
    );
    // untouched source column
    assert_eq!(cleaned.column("channel"), raw.column("channel"));
}

#[test]
fn test_clean_sample_complaints() {
    let raw = sample("complaints.csv");
    let cleaned = clean_complaints(&raw, &CleaningOptions::default()).unwrap();

    assert_eq!(
        texts(cleaned.column("department_std").unwrap()),
        vec!["Operations", "Operations", "Operations", "Finance", "Customer Support"]
    );
    assert_eq!(
        texts(cleaned.column("transaction_id_extracted").unwrap()),
        vec!["00123456", "98765", "55501", "", "77881"]
    );
    assert_eq!(
        cleaned.column("amount_usd").unwrap(),
        &[
            Value::Float(1234.56),
            Value::Float(12.5),
            Value::Float(9.99),
            Value::Missing,
            Value::Missing,
        ]
    );
    assert_eq!(
        texts(cleaned.column("received_date_parsed").unwrap()),
        vec![
            "2023-01-09 00:00:00",
            "2023-01-10 00:00:00",
            "2023-01-11 00:00:00",
            "",
            "2023-01-12 00:00:00",
        ]
    );
}

#[test]
fn test_write_and_reload_cleaned_tables() {
    let dir = tempdir().unwrap();
    let options = CleaningOptions::default();

    let txc = clean_transactions(&sample("transactions.csv"), &options).unwrap();
    let cpc = clean_complaints(&sample("complaints.csv"), &options).unwrap();

    let tx_out = dir.path().join("transactions_clean.csv");
    let cp_out = dir.path().join("complaints_clean.csv");
    txc.to_path(&tx_out).unwrap();
    cpc.to_path(&cp_out).unwrap();

    let reloaded = Table::from_path(&cp_out).unwrap();
    assert_eq!(reloaded.headers(), cpc.headers());
    assert_eq!(
        texts(reloaded.column("received_date_parsed").unwrap()),
        vec!["2023-01-09", "2023-01-10", "2023-01-11", "", "2023-01-12"]
    );
    assert_eq!(
        reloaded.column("transaction_id_extracted").unwrap()[0],
        Value::Integer(123456)
    );

    let tx_reloaded = Table::from_path(&tx_out).unwrap();
    assert_eq!(tx_reloaded.len(), 5);
    assert_eq!(
        texts(tx_reloaded.column("merchant_id_std").unwrap()),
        vec!["M001", "M002", "M003", "M004", "M005"]
    );
}

#[test]
fn test_reports_for_sample_tables() {
    let options = CleaningOptions::default();
    let txc = clean_transactions(&sample("transactions.csv"), &options).unwrap();
    let cpc = clean_complaints(&sample("complaints.csv"), &options).unwrap();

    let tx_report = report_for(&txc, TRANSACTION_DERIVED);
    let stamp = tx_report.column("timestamp_parsed").unwrap();
    assert_eq!((stamp.parsed, stamp.missing), (4, 1));

    let cp_report = report_for(&cpc, COMPLAINT_DERIVED);
    assert_eq!(cp_report.rows, 5);
    assert_eq!(cp_report.column("amount_usd").unwrap().missing, 2);
    assert_eq!(cp_report.total_missing(), 4);
}
