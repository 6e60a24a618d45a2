//! Sinks that persist synthesized units
//!
//! Persistence is owned by the packaging pipeline; this module only defines
//! the boundary plus two stock implementations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Persists one synthesized unit under its name
pub trait Sink {
    fn write(&mut self, unit_name: &str, bytes: &[u8]) -> Result<()>;
}

/// Collects units in memory; the test and dry-run sink
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[(String, Vec<u8>)] {
        &self.units
    }

    pub fn find(&self, unit_name: &str) -> Option<&[u8]> {
        self.units
            .iter()
            .find(|(name, _)| name == unit_name)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl Sink for MemorySink {
    fn write(&mut self, unit_name: &str, bytes: &[u8]) -> Result<()> {
        tracing::debug!("sink received unit {} ({} bytes)", unit_name, bytes.len());
        self.units.push((unit_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Writes each unit as `<name>.json` under a root directory
#[derive(Debug)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sink for DirSink {
    fn write(&mut self, unit_name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(format!("{unit_name}.json"));
        fs::write(&path, bytes)?;
        tracing::debug!("wrote unit {} to {}", unit_name, path.display());
        Ok(())
    }
}
