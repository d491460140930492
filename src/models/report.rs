use std::path::PathBuf;

use serde::Serialize;

use crate::models::{ChunkManifest, OutputFormat, TemperatureUnit};

#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub total_rows: usize,
    pub chunk_files: Vec<PathBuf>,
    pub manifest_path: PathBuf,
    pub manifest: ChunkManifest,
    /// Extension-matching files found in the output directory that this run did not write
    pub stale_files: Vec<String>,
}

impl SplitReport {
    pub fn chunk_count(&self) -> usize {
        self.chunk_files.len()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Split Summary:\n\
            - Source: {}\n\
            - Rows: {}\n\
            - Chunk size: {}\n\
            - Chunks written: {}\n\
            - Manifest: {}",
            self.source.display(),
            self.total_rows,
            self.chunk_size,
            self.chunk_count(),
            self.manifest_path.display()
        );

        if !self.stale_files.is_empty() {
            summary.push_str(&format!(
                "\n- Ignored {} stale file(s): {}",
                self.stale_files.len(),
                self.stale_files.join(", ")
            ));
        }

        summary
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub directory: PathBuf,
    pub pattern: String,
    pub input_files: Vec<PathBuf>,
    pub input_rows: Vec<usize>,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub output_written: bool,
    pub warnings: Vec<String>,
}

impl MergeReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Merge Summary:\n\
            - Directory: {}\n\
            - Pattern: '{}'\n\
            - Files merged: {}\n\
            - Rows: {}\n\
            - Columns: {}\n\
            - Output: {} ({:?})",
            self.directory.display(),
            self.pattern,
            self.input_files.len(),
            self.total_rows,
            self.columns.len(),
            self.output_path.display(),
            self.output_format
        );

        for warning in &self.warnings {
            summary.push_str(&format!("\n- Warning: {}", warning));
        }

        summary
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source: Option<PathBuf>,
    pub rows: usize,
    pub input_unit: TemperatureUnit,
    /// Rows whose wind chill could not be computed (missing inputs or negative wind under the NaN policy)
    pub missing_wind_chill: usize,
    pub negative_wind_rows: usize,
    pub added_columns: Vec<String>,
    pub output_path: Option<PathBuf>,
}

impl ConversionReport {
    pub fn summary(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        let output = self
            .output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not written (--no-output)".to_string());

        format!(
            "Conversion Summary:\n\
            - Source: {}\n\
            - Rows: {}\n\
            - Input unit: {:?}\n\
            - Columns added: {}\n\
            - Rows without wind chill: {}\n\
            - Negative wind speeds: {}\n\
            - Output: {}",
            source,
            self.rows,
            self.input_unit,
            self.added_columns.join(", "),
            self.missing_wind_chill,
            self.negative_wind_rows,
            output
        )
    }
}
