use std::path::{Path, PathBuf};

use crate::models::OutputFormat;
use crate::utils::constants::{CONVERTED_SUFFIX, DATA_EXTENSION};

/// Chunk file name with format: {prefix}_{index}.csv
pub fn chunk_file_name(prefix: &str, index: usize) -> String {
    format!("{}_{}.{}", prefix, index, DATA_EXTENSION)
}

/// Inverse of `chunk_file_name`; `None` for names that don't follow the pattern
pub fn parse_chunk_index(file_name: &str, prefix: &str) -> Option<usize> {
    file_name
        .strip_prefix(prefix)?
        .strip_prefix('_')?
        .strip_suffix(DATA_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

/// Case-insensitive extension check on a bare file name
pub fn has_extension(file_name: &str, extension: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Trailing run of digits in the file stem (output_weather_12.csv -> 12).
///
/// Runs too long for `u64` (more than 19-20 digits) give `None`, so such
/// names sort with the unnumbered ones.
pub fn trailing_number(file_name: &str) -> Option<u64> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}

/// Default converter output: {stem}_converted.{ext} beside the input
pub fn converted_sibling_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "weather".to_string());
    let file_name = format!("{}{}.{}", stem, CONVERTED_SUFFIX, format.extension());

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_file_name_roundtrip() {
        assert_eq!(chunk_file_name("weather", 0), "weather_0.csv");
        assert_eq!(parse_chunk_index("weather_0.csv", "weather"), Some(0));
        assert_eq!(parse_chunk_index("weather_17.csv", "weather"), Some(17));
    }

    #[test]
    fn test_parse_chunk_index_rejects_other_names() {
        assert_eq!(parse_chunk_index("weather.csv", "weather"), None);
        assert_eq!(parse_chunk_index("weather_x.csv", "weather"), None);
        assert_eq!(parse_chunk_index("weather_3.txt", "weather"), None);
        assert_eq!(parse_chunk_index("other_3.csv", "weather"), None);
        assert_eq!(parse_chunk_index("weather_3csv", "weather"), None);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("weather_0.csv", "csv"));
        assert!(has_extension("WEATHER_0.CSV", "csv"));
        assert!(!has_extension(".DS_Store", "csv"));
        assert!(!has_extension("file_list.txt", "csv"));
        assert!(!has_extension("csv", "csv"));
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("output_weather_12.csv"), Some(12));
        assert_eq!(trailing_number("output_weather_2"), Some(2));
        assert_eq!(trailing_number("output_weather.csv"), None);
        assert_eq!(trailing_number("output_weather_123456789012345678901234.csv"), None);
    }

    #[test]
    fn test_converted_sibling_path() {
        let path = converted_sibling_path(Path::new("data/weather_3.csv"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("data/weather_3_converted.csv"));

        let path = converted_sibling_path(Path::new("weather.csv"), OutputFormat::Parquet);
        assert_eq!(path, PathBuf::from("weather_converted.parquet"));
    }
}
