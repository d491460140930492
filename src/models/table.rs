use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::MISSING_MARKERS;

/// An in-memory tabular dataset: an ordered header plus ordered rows.
///
/// Cells are kept as the raw text read from disk so that data passing
/// through untouched is written back byte-for-byte. An empty cell is a
/// missing value. Numeric views are parsed on demand.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    source: Option<PathBuf>,
}

impl RecordTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            source: None,
        }
    }

    pub fn with_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// File the table was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Row {} has {} fields, expected {}",
                self.rows.len(),
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like `column_index`, but a missing column is a schema error naming the source file
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ProcessingError::MissingColumn {
                column: name.to_string(),
                path: self
                    .source
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("<memory>")),
            })
    }

    /// Parse a column as floating point. Missing cells become NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                parse_number(&cells[idx]).map_err(|value| ProcessingError::NonNumeric {
                    column: name.to_string(),
                    row,
                    value,
                })
            })
            .collect()
    }

    /// Replace a column if it exists, otherwise append it on the right
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} values but the table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(())
    }

    pub fn set_numeric_column(&mut self, name: &str, values: &[f64]) -> Result<()> {
        self.set_column(name, values.iter().copied().map(format_number).collect())
    }

    /// Stack `other` below this table.
    ///
    /// The resulting header is the union of both headers in first-seen
    /// order; cells a table has no column for are left missing. Repeated
    /// names match by occurrence, so the second `a` in `other` lands in
    /// the second `a` here.
    pub fn append(&mut self, other: RecordTable) {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut mapping = Vec::with_capacity(other.headers.len());

        for header in &other.headers {
            let occurrence = seen.entry(header.as_str()).or_insert(0);
            let existing = self
                .headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == header)
                .nth(*occurrence)
                .map(|(i, _)| i);
            *occurrence += 1;

            let target = match existing {
                Some(idx) => idx,
                None => {
                    self.headers.push(header.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.headers.len() - 1
                }
            };
            mapping.push(target);
        }

        let width = self.headers.len();
        for cells in other.rows {
            let mut row = vec![String::new(); width];
            for (cell, &target) in cells.into_iter().zip(&mapping) {
                row[target] = cell;
            }
            self.rows.push(row);
        }
    }

    pub fn concat(tables: impl IntoIterator<Item = RecordTable>) -> Self {
        let mut combined = RecordTable::default();
        for table in tables {
            combined.append(table);
        }
        combined
    }
}

/// Parse a cell as a number. `Err` carries the offending text.
pub fn parse_number(cell: &str) -> std::result::Result<f64, String> {
    let trimmed = cell.trim();
    if is_missing(trimmed) {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| cell.to_string())
}

pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

/// Render a derived value. NaN is written as a missing (empty) cell.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:?}", value)
    }
}
