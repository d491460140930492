use crate::error::Result;
use crate::models::{MergeOrder, NegativeWindPolicy, OutputFormat, TemperatureUnit};
use crate::utils::constants::*;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Settings for all three tools.
///
/// Layered lowest to highest: built-in defaults, a TOML file, then
/// `WRANGLER_<SECTION>__<KEY>` environment variables. CLI flags are
/// applied on top by the command layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WranglerConfig {
    #[validate(nested)]
    pub splitter: SplitterConfig,

    #[validate(nested)]
    pub merger: MergerConfig,

    #[validate(nested)]
    pub converter: ConverterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SplitterConfig {
    /// Rows per output file
    #[validate(range(min = 1))]
    pub chunk_size: usize,

    pub input_path: PathBuf,

    pub output_dir: PathBuf,

    #[validate(length(min = 1))]
    pub prefix: String,

    pub index_column: bool,

    pub create_output_dir: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            input_path: PathBuf::from(DEFAULT_SPLIT_INPUT),
            output_dir: PathBuf::from(DEFAULT_SPLIT_OUTPUT_DIR),
            prefix: DEFAULT_CHUNK_PREFIX.to_string(),
            index_column: false,
            create_output_dir: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MergerConfig {
    pub directory: PathBuf,

    /// Substring a file name must contain to be merged
    #[validate(length(min = 1))]
    pub pattern: String,

    pub output_path: PathBuf,

    pub order: MergeOrder,

    pub format: OutputFormat,

    pub compression: String,

    pub index_column: bool,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_MERGE_DIR),
            pattern: DEFAULT_MERGE_PATTERN.to_string(),
            output_path: PathBuf::from(DEFAULT_MERGE_OUTPUT_FILE),
            order: MergeOrder::default(),
            format: OutputFormat::default(),
            compression: COMPRESSION_SNAPPY.to_string(),
            index_column: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ConverterConfig {
    pub input_unit: TemperatureUnit,

    pub negative_wind: NegativeWindPolicy,

    /// When false the converted table is computed and dropped
    pub write_output: bool,

    pub format: OutputFormat,

    pub compression: String,

    pub index_column: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input_unit: TemperatureUnit::default(),
            negative_wind: NegativeWindPolicy::default(),
            write_output: true,
            format: OutputFormat::default(),
            compression: COMPRESSION_SNAPPY.to_string(),
            index_column: false,
        }
    }
}

impl WranglerConfig {
    /// Load from `path` (required when given) or from `weather-wrangler.toml`
    /// in the working directory when present, plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Self::environment())
    }

    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;

        let config: WranglerConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// `WRANGLER_SPLITTER__CHUNK_SIZE=1000` sets `splitter.chunk_size`
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
