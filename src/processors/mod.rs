pub mod converter;
pub mod merger;
pub mod splitter;

pub use converter::{Converter, OutputTarget};
pub use merger::DataMerger;
pub use splitter::{manifest_paths, Splitter};
