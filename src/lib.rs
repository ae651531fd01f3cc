// Ledger Tidy - Core Library
// Field normalizers for transaction and complaint exports, plus the table
// plumbing the CLI and tests use to run them over whole CSV files.

pub mod config;
pub mod error;
pub mod logging;
pub mod normalizers;
pub mod pipeline;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use error::{Result, TidyError};
pub use normalizers::{
    canonicalize_identifier, cents_to_dollars, extract_transaction_id, normalize_department,
    parse_flexible_date, parse_monetary_amount, round_to_cents,
    DateOrder, DateParser, DEPARTMENT_SYNONYMS,
};
pub use pipeline::{
    clean_complaints, clean_transactions, report_for,
    CleaningOptions, CleaningReport, ColumnStats,
    COMPLAINT_COLUMNS, COMPLAINT_DERIVED, TRANSACTION_COLUMNS, TRANSACTION_DERIVED,
};
pub use table::Table;
pub use value::Value;
