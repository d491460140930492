pub mod constants;
pub mod filename;
pub mod meteorology;
pub mod progress;

pub use constants::*;
pub use filename::{chunk_file_name, converted_sibling_path, parse_chunk_index};
pub use meteorology::{average_temperature, celsius_to_fahrenheit, wind_chill_fahrenheit};
pub use progress::ProgressReporter;
