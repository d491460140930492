use crate::config::MergerConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{MergeOrder, MergeReport, OutputFormat, RecordTable};
use crate::readers::TableReader;
use crate::utils::filename::trailing_number;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, ParquetWriter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Concatenates every file in a directory whose name contains a pattern
pub struct DataMerger {
    pattern: String,
    order: MergeOrder,
    format: OutputFormat,
    compression: String,
    index_column: bool,
}

impl DataMerger {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            order: MergeOrder::default(),
            format: OutputFormat::default(),
            compression: crate::utils::constants::COMPRESSION_SNAPPY.to_string(),
            index_column: false,
        }
    }

    pub fn from_config(config: &MergerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.pattern)
            .with_order(config.order)
            .with_format(config.format)
            .with_compression(&config.compression)
            .with_index_column(config.index_column))
    }

    pub fn with_order(mut self, order: MergeOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: &str) -> Self {
        self.compression = compression.to_string();
        self
    }

    pub fn with_index_column(mut self, index_column: bool) -> Self {
        self.index_column = index_column;
        self
    }

    /// Files in `directory` matching the pattern, in the configured order.
    /// `exclude` (normally the merge destination) is never returned.
    pub fn find_inputs(&self, directory: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
        if !directory.is_dir() {
            return Err(ProcessingError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let excluded = exclude.and_then(|p| fs::canonicalize(p).ok());
        let entries =
            fs::read_dir(directory).map_err(|e| ProcessingError::file_access(directory, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ProcessingError::file_access(directory, e))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if !name.contains(&self.pattern) || !path.is_file() {
                continue;
            }
            if excluded.is_some() && fs::canonicalize(&path).ok() == excluded {
                debug!(path = %path.display(), "skipping merge destination");
                continue;
            }

            files.push(path);
        }

        self.sort_inputs(&mut files);
        Ok(files)
    }

    fn sort_inputs(&self, files: &mut [PathBuf]) {
        let name = |p: &PathBuf| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        match self.order {
            MergeOrder::Lexical => files.sort_by_key(name),
            MergeOrder::Numeric => files.sort_by(|a, b| {
                let (a, b) = (name(a), name(b));
                // unnumbered names sort after numbered ones
                let key = |n: &str| trailing_number(n).map_or((1, 0), |v| (0, v));
                key(&a).cmp(&key(&b)).then_with(|| a.cmp(&b))
            }),
            MergeOrder::Listing => {}
        }
    }

    /// Load and concatenate `inputs`. Also returns each row's position
    /// within its own source file.
    pub fn merge_files(
        &self,
        inputs: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Result<(RecordTable, Vec<usize>, Vec<usize>)> {
        let reader = TableReader::new();
        let mut combined = RecordTable::default();
        let mut row_ids = Vec::new();
        let mut input_rows = Vec::with_capacity(inputs.len());

        for path in inputs {
            let table = reader.read_table(path)?;
            input_rows.push(table.row_count());
            row_ids.extend(0..table.row_count());
            combined.append(table);

            if let Some(progress) = progress {
                progress.increment(1);
            }
        }

        Ok((combined, row_ids, input_rows))
    }

    /// Merge every matching file in `directory` into `output`
    #[instrument(level = "info", skip_all, fields(dir = %directory.display(), pattern = %self.pattern))]
    pub fn merge_directory(
        &self,
        directory: &Path,
        output: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<MergeReport> {
        let inputs = self.find_inputs(directory, Some(output))?;
        info!(files = inputs.len(), order = ?self.order, "found files to merge");

        let mut warnings = Vec::new();
        if inputs.is_empty() {
            let message = format!(
                "no files in '{}' contain '{}'; output will be empty",
                directory.display(),
                self.pattern
            );
            warn!("{}", message);
            warnings.push(message);
        }

        let (combined, row_ids, input_rows) = self.merge_files(&inputs, progress)?;
        let output_written = self.write_output(&combined, &row_ids, output, &mut warnings)?;

        info!(
            rows = combined.row_count(),
            columns = combined.column_count(),
            output = %output.display(),
            "merge complete"
        );

        Ok(MergeReport {
            directory: directory.to_path_buf(),
            pattern: self.pattern.clone(),
            input_files: inputs,
            input_rows,
            total_rows: combined.row_count(),
            columns: combined.headers().to_vec(),
            output_path: output.to_path_buf(),
            output_format: self.format,
            output_written,
            warnings,
        })
    }

    fn write_output(
        &self,
        table: &RecordTable,
        row_ids: &[usize],
        output: &Path,
        warnings: &mut Vec<String>,
    ) -> Result<bool> {
        match self.format {
            OutputFormat::Csv => {
                CsvWriter::new()
                    .with_index_column(self.index_column)
                    .write_table_with_row_ids(table, output, row_ids.iter().copied())?;
            }
            OutputFormat::Parquet => {
                if table.column_count() == 0 {
                    let message = "nothing to merge; Parquet output not written".to_string();
                    warn!("{}", message);
                    warnings.push(message);
                    return Ok(false);
                }
                ParquetWriter::new()
                    .with_compression(&self.compression)?
                    .write_table(table, output)?;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("output_weather_10.csv"),
            "date,wind\n2012-01-10,1.0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("output_weather_2.csv"),
            "date,wind\n2012-01-02,2.0\n2012-01-03,3.0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("output_weather_1.csv"),
            "date,weather\n2012-01-01,sun\n",
        )
        .unwrap();
        fs::write(dir.path().join("weather.csv"), "date\n2012-01-01\n").unwrap();
        dir
    }

    #[test]
    fn test_find_inputs_lexical_and_numeric() -> Result<()> {
        let dir = setup();

        let lexical = DataMerger::new("output_weather_").find_inputs(dir.path(), None)?;
        assert_eq!(
            file_names(&lexical),
            vec!["output_weather_1.csv", "output_weather_10.csv", "output_weather_2.csv"]
        );

        let numeric = DataMerger::new("output_weather_")
            .with_order(MergeOrder::Numeric)
            .find_inputs(dir.path(), None)?;
        assert_eq!(
            file_names(&numeric),
            vec!["output_weather_1.csv", "output_weather_2.csv", "output_weather_10.csv"]
        );
        Ok(())
    }

    #[test]
    fn test_merge_row_count_and_union_schema() -> Result<()> {
        let dir = setup();
        let output = dir.path().join("weather_converted.csv");

        let report = DataMerger::new("output_weather_")
            .with_order(MergeOrder::Numeric)
            .merge_directory(dir.path(), &output, None)?;

        assert_eq!(report.input_rows, vec![1, 2, 1]);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.columns, vec!["date", "weather", "wind"]);

        let merged = TableReader::new().read_table(&output)?;
        assert_eq!(merged.row_count(), 4);
        assert_eq!(merged.rows()[0], vec!["2012-01-01", "sun", ""]);
        assert_eq!(merged.rows()[3], vec!["2012-01-10", "", "1.0"]);
        Ok(())
    }

    #[test]
    fn test_destination_matching_pattern_is_not_an_input() -> Result<()> {
        let dir = setup();
        let output = dir.path().join("output_weather_all.csv");
        let merger = DataMerger::new("output_weather_");

        merger.merge_directory(dir.path(), &output, None)?;
        // a second run must not fold the previous result back in
        let report = merger.merge_directory(dir.path(), &output, None)?;

        assert_eq!(report.input_files.len(), 3);
        assert_eq!(report.total_rows, 4);
        Ok(())
    }

    #[test]
    fn test_index_column_restarts_per_file() -> Result<()> {
        let dir = setup();
        let output = dir.path().join("merged.csv");

        DataMerger::new("output_weather_")
            .with_order(MergeOrder::Numeric)
            .with_index_column(true)
            .merge_directory(dir.path(), &output, None)?;

        let text = fs::read_to_string(&output)?;
        let index: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(index, vec!["0", "0", "1", "0"]);
        Ok(())
    }

    #[test]
    fn test_no_matches_writes_empty_output() -> Result<()> {
        let dir = setup();
        let output = dir.path().join("merged.csv");

        let report = DataMerger::new("no_such_prefix").merge_directory(dir.path(), &output, None)?;

        assert_eq!(report.total_rows, 0);
        assert!(report.output_written);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(fs::read_to_string(&output)?, "");
        Ok(())
    }

    #[test]
    fn test_parquet_output() -> Result<()> {
        let dir = setup();
        let output = dir.path().join("merged.parquet");

        let report = DataMerger::new("output_weather_")
            .with_format(OutputFormat::Parquet)
            .merge_directory(dir.path(), &output, None)?;
        assert!(report.output_written);

        let info = ParquetWriter::new().get_file_info(&output)?;
        assert_eq!(info.total_rows, 4);

        let empty = DataMerger::new("no_such_prefix")
            .with_format(OutputFormat::Parquet)
            .merge_directory(dir.path(), &dir.path().join("empty.parquet"), None)?;
        assert!(!empty.output_written);
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let err = DataMerger::new("x")
            .merge_directory(Path::new("/no/such/dir"), Path::new("out.csv"), None)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_malformed_input_names_file() -> Result<()> {
        let dir = setup();
        fs::write(dir.path().join("output_weather_3.csv"), "a,b\n1,2,3\n")?;

        let err = DataMerger::new("output_weather_")
            .merge_directory(dir.path(), &dir.path().join("m.csv"), None)
            .unwrap_err();
        assert!(err.to_string().contains("output_weather_3.csv"));
        Ok(())
    }
}
