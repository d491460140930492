use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{ProcessingError, Result};

/// Ordered list of generated chunk file names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkManifest {
    names: Vec<String>,
}

impl ChunkManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Newline-joined names, no trailing newline
    pub fn to_text(&self) -> String {
        self.names.join("\n")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_text()).map_err(|e| ProcessingError::file_access(path, e))
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ProcessingError::file_access(path, e))?;
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Ok(Self { names })
    }
}
