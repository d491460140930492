use crate::config::ConverterConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{ConversionReport, NegativeWindPolicy, OutputFormat, RecordTable, TemperatureUnit};
use crate::readers::TableReader;
use crate::utils::constants::*;
use crate::utils::filename::converted_sibling_path;
use crate::utils::meteorology::{average_temperature, celsius_to_fahrenheit, wind_chill_fahrenheit};
use crate::writers::{CsvWriter, ParquetWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Where the converted table goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// `{stem}_converted.{ext}` next to the input
    Sibling,
    Path(PathBuf),
    /// Compute and drop the result
    Discard,
}

/// Derives `temp_avg`, `temp_f` and `wind_chill` from `temp_max`, `temp_min` and `wind`
pub struct Converter {
    input_unit: TemperatureUnit,
    negative_wind: NegativeWindPolicy,
    format: OutputFormat,
    compression: String,
    index_column: bool,
}

impl Converter {
    pub fn new() -> Self {
        Self {
            input_unit: TemperatureUnit::default(),
            negative_wind: NegativeWindPolicy::default(),
            format: OutputFormat::default(),
            compression: COMPRESSION_SNAPPY.to_string(),
            index_column: false,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new()
            .with_input_unit(config.input_unit)
            .with_negative_wind(config.negative_wind)
            .with_format(config.format)
            .with_compression(&config.compression)
            .with_index_column(config.index_column)
    }

    pub fn with_input_unit(mut self, input_unit: TemperatureUnit) -> Self {
        self.input_unit = input_unit;
        self
    }

    pub fn with_negative_wind(mut self, policy: NegativeWindPolicy) -> Self {
        self.negative_wind = policy;
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

    /// Append the derived columns to `table` in place.
    ///
    /// Existing columns and row order are untouched. Missing inputs give
    /// missing outputs.
    pub fn convert(&self, table: &mut RecordTable) -> Result<ConversionReport> {
        let temp_max = table.numeric_column(COLUMN_TEMP_MAX)?;
        let temp_min = table.numeric_column(COLUMN_TEMP_MIN)?;
        let wind = table.numeric_column(COLUMN_WIND)?;

        let temp_avg: Vec<f64> = temp_max
            .iter()
            .zip(&temp_min)
            .map(|(&max, &min)| average_temperature(max, min))
            .collect();

        let temp_f: Vec<f64> = match self.input_unit {
            TemperatureUnit::Celsius => temp_avg.iter().copied().map(celsius_to_fahrenheit).collect(),
            TemperatureUnit::Fahrenheit => temp_avg.clone(),
        };

        let mut negative_wind_rows = 0;
        let mut wind_chill = Vec::with_capacity(wind.len());
        for (row, (&t, &w)) in temp_f.iter().zip(&wind).enumerate() {
            let w = if w < 0.0 {
                negative_wind_rows += 1;
                match self.negative_wind {
                    NegativeWindPolicy::Nan => f64::NAN,
                    NegativeWindPolicy::Clamp => 0.0,
                    NegativeWindPolicy::Reject => {
                        return Err(ProcessingError::NegativeWind { row, value: w })
                    }
                }
            } else {
                w
            };
            wind_chill.push(wind_chill_fahrenheit(t, w));
        }

        if negative_wind_rows > 0 {
            warn!(
                rows = negative_wind_rows,
                policy = ?self.negative_wind,
                "negative wind speeds encountered"
            );
        }

        table.set_numeric_column(COLUMN_TEMP_AVG, &temp_avg)?;
        table.set_numeric_column(COLUMN_TEMP_F, &temp_f)?;
        table.set_numeric_column(COLUMN_WIND_CHILL, &wind_chill)?;

        let missing_wind_chill = wind_chill.iter().filter(|v| v.is_nan()).count();
        debug!(rows = table.row_count(), missing_wind_chill, "derived columns added");

        Ok(ConversionReport {
            source: table.source().map(Path::to_path_buf),
            rows: table.row_count(),
            input_unit: self.input_unit,
            missing_wind_chill,
            negative_wind_rows,
            added_columns: vec![
                COLUMN_TEMP_AVG.to_string(),
                COLUMN_TEMP_F.to_string(),
                COLUMN_WIND_CHILL.to_string(),
            ],
            output_path: None,
        })
    }

    /// Load `input`, convert it and persist the result according to `target`
    #[instrument(level = "info", skip_all, fields(input = %input.display()))]
    pub fn convert_file(
        &self,
        input: &Path,
        target: &OutputTarget,
    ) -> Result<(RecordTable, ConversionReport)> {
        let mut table = TableReader::new().read_table(input)?;
        let mut report = self.convert(&mut table)?;

        let output = match target {
            OutputTarget::Sibling => Some(converted_sibling_path(input, self.format)),
            OutputTarget::Path(path) => Some(path.clone()),
            OutputTarget::Discard => None,
        };

        match &output {
            Some(path) => {
                self.write(&table, path)?;
                info!(rows = table.row_count(), output = %path.display(), "conversion written");
            }
            None => info!(rows = table.row_count(), "conversion computed; output discarded"),
        }

        report.output_path = output;
        Ok((table, report))
    }

    fn write(&self, table: &RecordTable, path: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Csv => CsvWriter::new()
                .with_index_column(self.index_column)
                .write_table(table, path),
            OutputFormat::Parquet => ParquetWriter::new()
                .with_compression(&self.compression)?
                .write_table(table, path),
        }
    }
}

impl Default for Converter {
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

    fn table(rows: &[[&str; 4]]) -> RecordTable {
        let headers = ["date", "temp_max", "temp_min", "wind"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        RecordTable::with_rows(headers, rows).unwrap()
    }

    fn column(table: &RecordTable, name: &str) -> Vec<f64> {
        table.numeric_column(name).unwrap()
    }

    #[test]
    fn test_average_and_fahrenheit() -> Result<()> {
        let mut t = table(&[["2012-01-01", "10.0", "0.0", "0.0"]]);
        Converter::new().convert(&mut t)?;

        assert_eq!(column(&t, "temp_avg")[0], 5.0);
        assert!((column(&t, "temp_f")[0] - 41.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_wind_chill_matches_formula() -> Result<()> {
        // temp_avg 0 °C -> 32 °F
        let mut t = table(&[["2012-01-01", "0.0", "0.0", "10.0"]]);
        Converter::new().convert(&mut t)?;

        let expected = 35.74 + 0.6215 * 32.0 - 35.75 * 10f64.powf(0.16)
            + 0.4275 * 32.0 * 10f64.powf(0.16);
        assert!((column(&t, "wind_chill")[0] - expected).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_fahrenheit_input_skips_conversion() -> Result<()> {
        let mut t = table(&[["2012-01-01", "40.0", "24.0", "10.0"]]);
        let report = Converter::new()
            .with_input_unit(TemperatureUnit::Fahrenheit)
            .convert(&mut t)?;

        assert_eq!(column(&t, "temp_f")[0], 32.0);
        assert_eq!(report.input_unit, TemperatureUnit::Fahrenheit);
        Ok(())
    }

    #[test]
    fn test_columns_preserved_and_three_added() -> Result<()> {
        let mut t = table(&[
            ["2012-01-01", "12.8", "5.0", "4.7"],
            ["2012-01-02", "10.6", "2.8", "4.5"],
        ]);
        let original = t.clone();

        let report = Converter::new().convert(&mut t)?;

        assert_eq!(t.row_count(), original.row_count());
        assert_eq!(t.column_count(), original.column_count() + 3);
        assert_eq!(&t.headers()[..4], original.headers());
        assert_eq!(&t.headers()[4..], &["temp_avg", "temp_f", "wind_chill"]);
        for (converted, source) in t.rows().iter().zip(original.rows()) {
            assert_eq!(&converted[..4], &source[..]);
        }
        assert_eq!(report.added_columns.len(), 3);
        Ok(())
    }

    #[test]
    fn test_existing_derived_columns_are_overwritten() -> Result<()> {
        let mut t = table(&[["2012-01-01", "10.0", "0.0", "0.0"]]);
        t.set_column("temp_f", vec!["stale".to_string()])?;

        Converter::new().convert(&mut t)?;

        assert_eq!(t.column_count(), 7);
        assert_eq!(&t.headers()[4..], &["temp_f", "temp_avg", "wind_chill"]);
        assert_eq!(t.rows()[0][4], "41.0");
        Ok(())
    }

    #[test]
    fn test_missing_values_propagate() -> Result<()> {
        let mut t = table(&[["2012-01-01", "", "5.0", "4.7"]]);
        let report = Converter::new().convert(&mut t)?;

        assert_eq!(t.rows()[0][4], "");
        assert_eq!(t.rows()[0][6], "");
        assert_eq!(report.missing_wind_chill, 1);
        Ok(())
    }

    #[test]
    fn test_negative_wind_policies() -> Result<()> {
        let rows = [["2012-01-01", "0.0", "0.0", "-2.0"]];

        let mut t = table(&rows);
        let report = Converter::new().convert(&mut t)?;
        assert!(column(&t, "wind_chill")[0].is_nan());
        assert_eq!(report.negative_wind_rows, 1);

        let mut t = table(&rows);
        Converter::new()
            .with_negative_wind(NegativeWindPolicy::Clamp)
            .convert(&mut t)?;
        assert!((column(&t, "wind_chill")[0] - (35.74 + 0.6215 * 32.0)).abs() < 1e-9);

        let mut t = table(&rows);
        let err = Converter::new()
            .with_negative_wind(NegativeWindPolicy::Reject)
            .convert(&mut t)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::NegativeWind { row: 0, .. }));
        // rejected conversions leave the table untouched
        assert_eq!(t.column_count(), 4);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let mut t = RecordTable::with_rows(
            vec!["temp_min".to_string(), "wind".to_string()],
            vec![vec!["1".to_string(), "2".to_string()]],
        )
        .unwrap();

        let err = Converter::new().convert(&mut t).unwrap_err();
        match err {
            ProcessingError::MissingColumn { column, .. } => assert_eq!(column, "temp_max"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_convert_file_targets() -> Result<()> {
        let dir = TempDir::new()?;
        let input = dir.path().join("weather_0.csv");
        fs::write(&input, "date,temp_max,temp_min,wind\n2012-01-01,10.0,0.0,0.0\n")?;

        let (_, report) = Converter::new().convert_file(&input, &OutputTarget::Sibling)?;
        let sibling = dir.path().join("weather_0_converted.csv");
        assert_eq!(report.output_path, Some(sibling.clone()));
        assert_eq!(
            fs::read_to_string(&sibling)?,
            "date,temp_max,temp_min,wind,temp_avg,temp_f,wind_chill\n\
             2012-01-01,10.0,0.0,0.0,5.0,41.0,61.221500000000006\n"
        );

        let explicit = dir.path().join("out.csv");
        Converter::new().convert_file(&input, &OutputTarget::Path(explicit.clone()))?;
        assert!(explicit.exists());

        fs::remove_file(&sibling)?;
        let (table, report) = Converter::new().convert_file(&input, &OutputTarget::Discard)?;
        assert_eq!(report.output_path, None);
        assert_eq!(table.column_count(), 7);
        assert!(!sibling.exists());
        Ok(())
    }
}
