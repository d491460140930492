use crate::config::SplitterConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{ChunkManifest, SplitReport};
use crate::readers::ChunkReader;
use crate::utils::constants::{DATA_EXTENSION, MANIFEST_FILE};
use crate::utils::filename::{chunk_file_name, has_extension, parse_chunk_index};
use crate::utils::progress::ProgressReporter;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Writes a source table out as `{prefix}_{n}.csv` chunks plus a manifest
pub struct Splitter {
    chunk_size: usize,
    prefix: String,
    index_column: bool,
    create_output_dir: bool,
}

impl Splitter {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ProcessingError::Config(
                "chunk_size must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            chunk_size,
            prefix: crate::utils::constants::DEFAULT_CHUNK_PREFIX.to_string(),
            index_column: false,
            create_output_dir: false,
        })
    }

    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.chunk_size)?
            .with_prefix(&config.prefix)
            .with_index_column(config.index_column)
            .with_create_output_dir(config.create_output_dir))
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_index_column(mut self, index_column: bool) -> Self {
        self.index_column = index_column;
        self
    }

    pub fn with_create_output_dir(mut self, create_output_dir: bool) -> Self {
        self.create_output_dir = create_output_dir;
        self
    }

    /// Split `input` into chunk files inside `output_dir` and write the manifest
    #[instrument(level = "info", skip_all, fields(input = %input.display(), output_dir = %output_dir.display()))]
    pub fn split(
        &self,
        input: &Path,
        output_dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<SplitReport> {
        self.prepare_output_dir(output_dir)?;
        self.check_source_not_overwritten(input, output_dir)?;

        let mut reader = ChunkReader::open(input, self.chunk_size)?;
        let headers = reader.headers().clone();
        let writer = crate::writers::CsvWriter::new().with_index_column(self.index_column);

        let mut chunk_files = Vec::new();
        let mut generated = HashSet::new();

        for chunk in &mut reader {
            let chunk = chunk?;
            let file_name = chunk_file_name(&self.prefix, chunk.index);
            let path = output_dir.join(&file_name);

            writer.write_records(&headers, &chunk.records, chunk.first_row, &path)?;
            debug!(chunk = chunk.index, rows = chunk.len(), path = %path.display(), "wrote chunk");

            if let Some(progress) = progress {
                progress.set_message(&format!("Wrote {}", file_name));
                progress.increment(1);
            }

            generated.insert(file_name);
            chunk_files.push(path);
        }

        let total_rows = reader.rows_read();
        let (manifest, stale_files) = self.build_manifest(output_dir, &generated)?;
        for name in &stale_files {
            warn!(file = %name, "ignoring data file not written by this run");
        }

        let manifest_path = output_dir.join(MANIFEST_FILE);
        manifest.write_to(&manifest_path)?;

        info!(
            rows = total_rows,
            chunks = chunk_files.len(),
            manifest = %manifest_path.display(),
            "split complete"
        );

        Ok(SplitReport {
            source: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            chunk_size: self.chunk_size,
            total_rows,
            chunk_files,
            manifest_path,
            manifest,
            stale_files,
        })
    }

    fn prepare_output_dir(&self, output_dir: &Path) -> Result<()> {
        if output_dir.is_dir() {
            return Ok(());
        }

        if self.create_output_dir && !output_dir.exists() {
            fs::create_dir_all(output_dir)
                .map_err(|e| ProcessingError::file_access(output_dir, e))?;
            info!(dir = %output_dir.display(), "created output directory");
            return Ok(());
        }

        Err(ProcessingError::DirectoryNotFound {
            path: output_dir.to_path_buf(),
        })
    }

    /// Chunks are written while the source is still being read, so a source
    /// that is itself a chunk target would be truncated mid-read
    fn check_source_not_overwritten(&self, input: &Path, output_dir: &Path) -> Result<()> {
        let source = fs::canonicalize(input).map_err(|e| ProcessingError::file_access(input, e))?;
        let dir =
            fs::canonicalize(output_dir).map_err(|e| ProcessingError::file_access(output_dir, e))?;

        let is_chunk_name = source
            .file_name()
            .map(|name| parse_chunk_index(&name.to_string_lossy(), &self.prefix).is_some())
            .unwrap_or(false);

        if is_chunk_name && source.parent() == Some(dir.as_path()) {
            return Err(ProcessingError::Config(format!(
                "Source '{}' would be overwritten by its own chunk files; \
                 use a different prefix or output directory",
                input.display()
            )));
        }

        Ok(())
    }

    /// List data files in `output_dir`, keeping only names this run generated.
    ///
    /// Returns the manifest ordered by chunk index and the names of any
    /// other data files found alongside.
    fn build_manifest(
        &self,
        output_dir: &Path,
        generated: &HashSet<String>,
    ) -> Result<(ChunkManifest, Vec<String>)> {
        let entries =
            fs::read_dir(output_dir).map_err(|e| ProcessingError::file_access(output_dir, e))?;

        let mut listed: Vec<(usize, String)> = Vec::new();
        let mut stale = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| ProcessingError::file_access(output_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if !has_extension(&name, DATA_EXTENSION) {
                continue;
            }

            match parse_chunk_index(&name, &self.prefix) {
                Some(index) if generated.contains(&name) => listed.push((index, name)),
                _ => stale.push(name),
            }
        }

        listed.sort();
        stale.sort();

        let manifest = ChunkManifest::from_names(listed.into_iter().map(|(_, name)| name).collect());
        Ok((manifest, stale))
    }
}

/// Resolve every manifest entry against the directory it was written to
pub fn manifest_paths(manifest: &ChunkManifest, output_dir: &Path) -> Vec<PathBuf> {
    manifest
        .names()
        .iter()
        .map(|name| output_dir.join(name))
        .collect()
}
