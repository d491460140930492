pub mod chunk_reader;
pub mod table_reader;

pub use chunk_reader::{ChunkReader, RecordChunk};
pub use table_reader::TableReader;
