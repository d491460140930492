use crate::error::{ProcessingError, Result};
use crate::models::RecordTable;
use csv::StringRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes tables as CSV, optionally prefixed with a row-number column
pub struct CsvWriter {
    index_column: bool,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            index_column: false,
        }
    }

    /// Prefix every row with its row number under an empty header name.
    /// Skipped when the data already carries an unnamed column.
    pub fn with_index_column(mut self, index_column: bool) -> Self {
        self.index_column = index_column;
        self
    }

    /// Write a table with row numbers 0..n
    pub fn write_table(&self, table: &RecordTable, path: &Path) -> Result<()> {
        self.write_table_with_row_ids(table, path, 0..table.row_count())
    }

    /// Write a table, taking the index column values from `row_ids`
    pub fn write_table_with_row_ids<I>(
        &self,
        table: &RecordTable,
        path: &Path,
        row_ids: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut writer = self.create(path)?;
        let index = self.adds_index(table.headers().iter().map(String::as_str));

        if table.column_count() > 0 {
            write_header(&mut writer, table.headers().iter().map(String::as_str), index)
                .map_err(|e| ProcessingError::csv_file(path, e))?;
        }

        for (row, row_id) in table.rows().iter().zip(row_ids) {
            write_row(&mut writer, row.iter().map(String::as_str), row_id, index)
                .map_err(|e| ProcessingError::csv_file(path, e))?;
        }

        writer.flush().map_err(|e| ProcessingError::file_access(path, e))?;
        Ok(())
    }

    /// Write raw records under `headers`, numbering rows from `first_row`
    pub fn write_records(
        &self,
        headers: &StringRecord,
        records: &[StringRecord],
        first_row: usize,
        path: &Path,
    ) -> Result<()> {
        let mut writer = self.create(path)?;
        let index = self.adds_index(headers.iter());

        write_header(&mut writer, headers.iter(), index)
            .map_err(|e| ProcessingError::csv_file(path, e))?;
        for (offset, record) in records.iter().enumerate() {
            write_row(&mut writer, record.iter(), first_row + offset, index)
                .map_err(|e| ProcessingError::csv_file(path, e))?;
        }

        writer.flush().map_err(|e| ProcessingError::file_access(path, e))?;
        Ok(())
    }

    fn create(&self, path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
        let file = File::create(path).map_err(|e| ProcessingError::file_access(path, e))?;
        Ok(csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file)))
    }

    fn adds_index<'a>(&self, mut headers: impl Iterator<Item = &'a str>) -> bool {
        if !self.index_column {
            return false;
        }
        let has_index = headers.any(str::is_empty);
        if has_index {
            debug!("data already has an unnamed index column; not adding another");
        }
        !has_index
    }
}

fn write_header<'a, W: Write>(
    writer: &mut csv::Writer<W>,
    headers: impl Iterator<Item = &'a str>,
    index: bool,
) -> std::result::Result<(), csv::Error> {
    let mut fields: Vec<&str> = Vec::new();
    if index {
        fields.push("");
    }
    fields.extend(headers);
    writer.write_record(&fields)
}

fn write_row<'a, W: Write>(
    writer: &mut csv::Writer<W>,
    cells: impl Iterator<Item = &'a str>,
    row_id: usize,
    index: bool,
) -> std::result::Result<(), csv::Error> {
    if index {
        writer.write_field(row_id.to_string())?;
    }
    for cell in cells {
        writer.write_field(cell)?;
    }
    writer.write_record(None::<&[u8]>)
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sample_table() -> RecordTable {
        RecordTable::with_rows(
            vec!["date".to_string(), "wind".to_string()],
            vec![
                vec!["2012-01-01".to_string(), "4.7".to_string()],
                vec!["2012-01-02".to_string(), "".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_table_without_index() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out.csv");

        CsvWriter::new().write_table(&sample_table(), &path)?;

        assert_eq!(
            fs::read_to_string(&path)?,
            "date,wind\n2012-01-01,4.7\n2012-01-02,\n"
        );
        Ok(())
    }

    #[test]
    fn test_write_table_with_index() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out.csv");

        CsvWriter::new()
            .with_index_column(true)
            .write_table_with_row_ids(&sample_table(), &path, [5, 6])?;

        assert_eq!(
            fs::read_to_string(&path)?,
            ",date,wind\n5,2012-01-01,4.7\n6,2012-01-02,\n"
        );
        Ok(())
    }

    #[test]
    fn test_write_records_numbers_from_first_row() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("chunk.csv");
        let headers = StringRecord::from(vec!["a", "b"]);
        let records = vec![StringRecord::from(vec!["1", "x,y"])];

        CsvWriter::new()
            .with_index_column(true)
            .write_records(&headers, &records, 500, &path)?;

        assert_eq!(fs::read_to_string(&path)?, ",a,b\n500,1,\"x,y\"\n");
        Ok(())
    }

    #[test]
    fn test_existing_index_column_is_not_doubled() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("chunk.csv");
        let table = RecordTable::with_rows(
            vec!["".to_string(), "date".to_string()],
            vec![vec!["12".to_string(), "2012-01-13".to_string()]],
        )?;

        CsvWriter::new().with_index_column(true).write_table(&table, &path)?;

        assert_eq!(fs::read_to_string(&path)?, ",date\n12,2012-01-13\n");
        Ok(())
    }

    #[test]
    fn test_empty_table_writes_empty_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.csv");

        CsvWriter::new().write_table(&RecordTable::default(), &path)?;

        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn test_unwritable_path_names_file() {
        let err = CsvWriter::new()
            .write_table(&sample_table(), Path::new("/nonexistent/dir/out.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/out.csv"));
    }
}
