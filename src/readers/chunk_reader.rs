use crate::error::{ProcessingError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// A contiguous run of source rows
#[derive(Debug, Clone)]
pub struct RecordChunk {
    /// Zero-based position of this chunk in read order
    pub index: usize,
    /// Zero-based source row number of the first record
    pub first_row: usize,
    pub records: Vec<StringRecord>,
}

impl RecordChunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Streams a CSV source in fixed-size chunks; only one chunk is held in memory
pub struct ChunkReader<R: Read> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    chunk_size: usize,
    next_index: usize,
    rows_read: usize,
    path: Option<PathBuf>,
    done: bool,
}

impl ChunkReader<BufReader<File>> {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| ProcessingError::file_access(path, e))?;
        let mut chunk_reader = Self::from_reader(BufReader::new(file), chunk_size)
            .map_err(|e| match e {
                ProcessingError::Csv(source) => ProcessingError::csv_file(path, source),
                other => other,
            })?;
        chunk_reader.path = Some(path.to_path_buf());
        Ok(chunk_reader)
    }
}

impl<R: Read> ChunkReader<R> {
    pub fn from_reader(reader: R, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ProcessingError::Config(
                "chunk_size must be a positive integer".to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            chunk_size,
            next_index: 0,
            rows_read: 0,
            path: None,
            done: false,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn read_chunk(&mut self) -> Result<Option<RecordChunk>> {
        let first_row = self.rows_read;
        let mut records = Vec::with_capacity(self.chunk_size);
        let mut record = StringRecord::new();

        while records.len() < self.chunk_size {
            let more = self.reader.read_record(&mut record).map_err(|e| match &self.path {
                Some(path) => ProcessingError::csv_file(path, e),
                None => ProcessingError::Csv(e),
            })?;
            if !more {
                self.done = true;
                break;
            }
            records.push(record.clone());
        }

        if records.is_empty() {
            return Ok(None);
        }

        self.rows_read += records.len();
        let chunk = RecordChunk {
            index: self.next_index,
            first_row,
            records,
        };
        self.next_index += 1;

        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<RecordChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
