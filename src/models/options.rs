use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Declared unit of the `temp_max`/`temp_min` columns fed to the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// What to do with a negative wind speed, which has no real `wind^0.16`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NegativeWindPolicy {
    /// Leave the row's wind chill missing
    #[default]
    Nan,
    /// Treat the speed as calm (0)
    Clamp,
    /// Abort the conversion
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Order in which matched files are concatenated by the merger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MergeOrder {
    /// Sort file names lexically
    #[default]
    Lexical,
    /// Sort by the trailing integer in the file stem (weather_2 before weather_10)
    Numeric,
    /// Raw directory-listing order; not reproducible across systems
    Listing,
}
