/// Column names read by the converter
pub const COLUMN_TEMP_MAX: &str = "temp_max";
pub const COLUMN_TEMP_MIN: &str = "temp_min";
pub const COLUMN_WIND: &str = "wind";

/// Column names added by the converter
pub const COLUMN_TEMP_AVG: &str = "temp_avg";
pub const COLUMN_TEMP_F: &str = "temp_f";
pub const COLUMN_WIND_CHILL: &str = "wind_chill";

/// File names
pub const MANIFEST_FILE: &str = "file_list.txt";
pub const DEFAULT_MERGE_OUTPUT_FILE: &str = "weather_converted.csv";
pub const DEFAULT_CONFIG_FILE: &str = "weather-wrangler.toml";
pub const DATA_EXTENSION: &str = "csv";

/// Splitter defaults
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_PREFIX: &str = "weather";
pub const DEFAULT_SPLIT_INPUT: &str = "../weather.csv";
pub const DEFAULT_SPLIT_OUTPUT_DIR: &str = "../split_data";

/// Merger defaults
pub const DEFAULT_MERGE_DIR: &str = ".";
pub const DEFAULT_MERGE_PATTERN: &str = "output_weather_";

/// Converter defaults
pub const CONVERTED_SUFFIX: &str = "_converted";

/// Cell values treated as missing when parsing numbers
pub const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "WRANGLER";

/// Parquet output
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
