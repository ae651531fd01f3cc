// 📋 Table - ordered, column-oriented view of one CSV export
//
// Columns keep file order, derived columns are appended on the right.
// Cleaning never edits a table in place: `with_column` returns a new one.

use crate::error::{Result, TidyError};
use crate::value::{type_column, Value};
use chrono::{NaiveTime, Timelike};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Longest cell shown by `render_preview` before truncation
const PREVIEW_CELL_WIDTH: usize = 28;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    columns: Vec<Vec<Value>>,
}

impl Table {
    /// Empty table with no columns
    pub fn new(name: &str) -> Self {
        Table {
            name: name.to_string(),
            headers: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Build a table from (header, values) pairs. All columns must be the same length.
    pub fn from_columns(name: &str, columns: Vec<(&str, Vec<Value>)>) -> Result<Self> {
        let mut table = Table::new(name);
        for (header, values) in columns {
            table = table.with_column(header, values)?;
        }
        Ok(table)
    }

    /// Load a CSV file. The table is named after the file stem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| TidyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("table")
            .to_string();

        let table = Table::from_reader(&name, file)?;
        debug!(path = %path.display(), rows = table.len(), columns = table.headers.len(), "loaded csv");
        Ok(table)
    }

    /// Load CSV from any reader. First row is the header, fields quoted with '"'.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .quote(b'"')
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let mut raw_columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

        for result in rdr.records() {
            let record = result?;
            for (idx, field) in record.iter().enumerate() {
                raw_columns[idx].push(Value::from_field(field));
            }
        }

        Ok(Table {
            name: name.to_string(),
            headers,
            columns: raw_columns.into_iter().map(type_column).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.position(name).map(|idx| self.columns[idx].as_slice())
    }

    /// Like `column`, but a missing column is an error naming this table
    pub fn try_column(&self, name: &str) -> Result<&[Value]> {
        self.column(name).ok_or_else(|| TidyError::MissingColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.try_column(name)?;
        }
        Ok(())
    }

    /// New table with `name` set to `values`: replaced if it exists, appended otherwise
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table> {
        if !self.headers.is_empty() && values.len() != self.len() {
            return Err(TidyError::ColumnLength {
                table: self.name.clone(),
                column: name.to_string(),
                expected: self.len(),
                actual: values.len(),
            });
        }

        let mut table = self.clone();
        match table.position(name) {
            Some(idx) => table.columns[idx] = values,
            None => {
                table.headers.push(name.to_string());
                table.columns.push(values);
            }
        }
        Ok(table)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            name: self.name.clone(),
            headers: self.headers.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| col.iter().take(n).cloned().collect())
                .collect(),
        }
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    /// Write as CSV with a header row. Missing cells are empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;

        let rendered: Vec<Vec<String>> = self.columns.iter().map(|col| render_column(col)).collect();
        for idx in 0..self.len() {
            wtr.write_record(rendered.iter().map(|col| col[idx].as_str()))?;
        }

        wtr.flush().map_err(|source| TidyError::Write {
            table: self.name.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| TidyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_csv(file)?;
        debug!(path = %path.display(), rows = self.len(), "wrote csv");
        Ok(())
    }

    /// Rows as JSON objects, keys in column order
    pub fn to_json_records(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text grid of the first `n` rows
    pub fn render_preview(&self, n: usize) -> String {
        let head = self.head(n);
        let cells: Vec<Vec<String>> = head
            .columns
            .iter()
            .map(|col| {
                render_column(col)
                    .into_iter()
                    .zip(col)
                    .map(|(text, v)| if v.is_missing() { "NA".to_string() } else { truncate(&text) })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = head
            .headers
            .iter()
            .zip(&cells)
            .map(|(h, col)| {
                col.iter()
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header_line: Vec<String> = head
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w))
            .collect();
        out.push_str(header_line.join(" | ").trim_end());
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');

        for idx in 0..head.len() {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(col, w)| pad(&col[idx], *w))
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }

        if self.len() > n {
            out.push_str(&format!("... {} more rows\n", self.len() - n));
        }
        out
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for idx in 0..self.len() {
            seq.serialize_element(&RecordRef { table: self, idx })?;
        }
        seq.end()
    }
}

struct RecordRef<'a> {
    table: &'a Table,
    idx: usize,
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.headers.len()))?;
        for (header, col) in self.table.headers.iter().zip(&self.table.columns) {
            map.serialize_entry(header, &col[self.idx])?;
        }
        map.end()
    }
}

/// Cell text for one column. Timestamp columns that are all midnight print as dates.
fn render_column(col: &[Value]) -> Vec<String> {
    let date_only = col.iter().any(|v| matches!(v, Value::Timestamp(_)))
        && col.iter().all(|v| match v {
            Value::Timestamp(ts) => ts.time() == NaiveTime::MIN,
            _ => true,
        });

    col.iter()
        .map(|v| match v {
            Value::Timestamp(ts) if date_only => ts.format("%Y-%m-%d").to_string(),
            Value::Timestamp(ts) if ts.nanosecond() != 0 => {
                ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
            }
            other => other.to_string(),
        })
        .collect()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CELL_WIDTH {
        return text.to_string();
    }
    let kept: String = text.chars().take(PREVIEW_CELL_WIDTH - 3).collect();
    format!("{}...", kept)
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

// ============================================================================
// TESTS
// ============================================================================
