pub mod manifest;
pub mod options;
pub mod report;
pub mod table;

pub use manifest::ChunkManifest;
pub use options::{MergeOrder, NegativeWindPolicy, OutputFormat, TemperatureUnit};
pub use report::{ConversionReport, MergeReport, SplitReport};
pub use table::RecordTable;
