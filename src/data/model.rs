use std::fmt;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the results table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` bar height.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Guess the type of a raw text cell: empty → Null, then integer, float,
    /// boolean, and finally plain string.
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// ResultsTable – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered table of rows keyed by column name.
///
/// Row order is the order of the source file and is never changed; it defines
/// the category order of every chart panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ResultsTable {
    /// Build a table, padding short rows with `Null` so every row has one cell
    /// per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        ResultsTable { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.index_of(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Like [`ResultsTable::column`], but a missing column is a lookup failure.
    pub fn require_column(&self, name: &str) -> Result<Vec<&CellValue>, ReportError> {
        self.column(name).ok_or_else(|| ReportError::MissingColumn {
            column: name.to_string(),
            available: self.columns.clone(),
        })
    }

    /// Append `alias` as a verbatim copy of `source`.
    ///
    /// Returns `false` and leaves the table untouched when `source` is absent.
    /// An existing `alias` column is overwritten in place.
    pub fn alias_column(&mut self, source: &str, alias: &str) -> bool {
        let Some(src) = self.index_of(source) else {
            return false;
        };
        match self.index_of(alias) {
            Some(dst) => {
                for row in &mut self.rows {
                    row[dst] = row[src].clone();
                }
            }
            None => {
                self.columns.push(alias.to_string());
                for row in &mut self.rows {
                    let value = row[src].clone();
                    row.push(value);
                }
            }
        }
        true
    }
}
