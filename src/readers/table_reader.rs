use crate::error::{ProcessingError, Result};
use crate::models::RecordTable;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Loads a whole CSV file into a `RecordTable`
pub struct TableReader;

impl TableReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_table(&self, path: &Path) -> Result<RecordTable> {
        let file = File::open(path).map_err(|e| ProcessingError::file_access(path, e))?;
        let table = self
            .read_from(BufReader::new(file))
            .map_err(|e| match e {
                ProcessingError::Csv(source) => ProcessingError::csv_file(path, source),
                other => other,
            })?
            .with_source(path);

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );

        Ok(table)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<RecordTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        let mut table = RecordTable::new(headers);

        for result in csv_reader.records() {
            let record = result?;
            table.push_row(record.iter().map(String::from).collect())?;
        }

        Ok(table)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}
