use crate::error::{ProcessingError, Result};
use crate::models::table::{is_missing, parse_number};
use crate::models::RecordTable;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write a table to a Parquet file.
    ///
    /// Columns whose non-missing cells all parse as numbers become nullable
    /// Float64, everything else nullable Utf8. A table without columns has
    /// no Parquet representation and is rejected.
    pub fn write_table(&self, table: &RecordTable, path: &Path) -> Result<()> {
        if table.column_count() == 0 {
            return Err(ProcessingError::InvalidFormat(
                "Cannot write a Parquet file for a table with no columns".to_string(),
            ));
        }

        let schema = self.create_schema(table);
        let file = File::create(path).map_err(|e| ProcessingError::file_access(path, e))?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        // Write in row-group sized batches to keep the Arrow copy small
        let batch_size = self.row_group_size.max(1);
        let mut start = 0;
        while start < table.row_count() {
            let end = (start + batch_size).min(table.row_count());
            let batch = self.rows_to_batch(table, start..end, schema.clone())?;
            writer.write(&batch)?;
            start = end;
        }

        writer.close()?;
        Ok(())
    }

    /// Infer the Arrow schema for a table
    fn create_schema(&self, table: &RecordTable) -> Arc<Schema> {
        let fields: Vec<Field> = table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, name)| Field::new(name, self.infer_type(table, idx), true))
            .collect();

        Arc::new(Schema::new(fields))
    }

    fn infer_type(&self, table: &RecordTable, idx: usize) -> DataType {
        let numeric = table
            .rows()
            .iter()
            .map(|row| row[idx].as_str())
            .all(|cell| parse_number(cell).is_ok());

        if numeric {
            DataType::Float64
        } else {
            DataType::Utf8
        }
    }

    fn rows_to_batch(
        &self,
        table: &RecordTable,
        range: std::ops::Range<usize>,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let rows = &table.rows()[range];

        let columns: Vec<ArrayRef> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| -> ArrayRef {
                match field.data_type() {
                    DataType::Float64 => {
                        let values: Vec<Option<f64>> = rows
                            .iter()
                            .map(|row| parse_number(&row[idx]).ok().filter(|v| !v.is_nan()))
                            .collect();
                        Arc::new(Float64Array::from(values))
                    }
                    _ => {
                        let values: Vec<Option<&str>> = rows
                            .iter()
                            .map(|row| Some(row[idx].as_str()).filter(|cell| !is_missing(cell)))
                            .collect();
                        Arc::new(StringArray::from(values))
                    }
                }
            })
            .collect();

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get information about a Parquet file
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path).map_err(|e| ProcessingError::file_access(path, e))?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let columns = file_metadata.schema_descr().num_columns();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            row_group_sizes.push(metadata.row_group(i).num_rows());
        }

        Ok(ParquetFileInfo {
            total_rows,
            columns,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub columns: usize,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.columns,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn weather_table() -> RecordTable {
        let headers = ["date", "temp_max", "wind", "weather"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec!["2012-01-01", "12.8", "4.7", "drizzle"],
            vec!["2012-01-02", "", "4.5", "rain"],
            vec!["2012-01-03", "11.7", "2.3", ""],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();
        RecordTable::with_rows(headers, rows).unwrap()
    }

    #[test]
    fn test_infer_column_types() {
        let writer = ParquetWriter::new();
        let schema = writer.create_schema(&weather_table());

        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
        assert_eq!(schema.field(3).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_write_table() -> Result<()> {
        let writer = ParquetWriter::new().with_row_group_size(2);
        let temp_file = NamedTempFile::new()?;

        writer.write_table(&weather_table(), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 3);
        assert_eq!(info.columns, 4);
        assert_eq!(info.row_group_sizes.iter().sum::<i64>(), 3);
        Ok(())
    }

    #[test]
    fn test_write_columnless_table_fails() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = ParquetWriter::new().write_table(&RecordTable::default(), temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let compressions = ["snappy", "gzip", "lz4", "zstd", "none"];

        for compression in &compressions {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_table(&weather_table(), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli-9000").is_err());
        Ok(())
    }
}
