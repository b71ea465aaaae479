//! Report destinations.
//!
//! A realization never writes through ambient process state. Every report
//! goes to an [`OutputDestination`] handed to it by the caller.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Named text sink a realization writes its reports to.
pub trait OutputDestination {
    /// Human-readable label used in logs and errors.
    fn label(&self) -> String;

    /// Writes (or replaces) a report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be stored.
    fn write_text(&mut self, name: &str, contents: &str) -> Result<()>;

    /// Reads a previously written report, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the report exists but cannot be read.
    fn read_text(&self, name: &str) -> Result<Option<String>>;
}

/// Writes reports as files in a directory, created on first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryDestination {
    root: PathBuf,
}

impl DirectoryDestination {
    /// Creates a destination rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory reports are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputDestination for DirectoryDestination {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn write_text(&mut self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(name), contents)?;
        Ok(())
    }

    fn read_text(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.root.join(name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps reports in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDestination {
    label: String,
    files: BTreeMap<String, String>,
}

impl MemoryDestination {
    /// Creates an empty destination.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            files: BTreeMap::new(),
        }
    }

    /// Returns a stored report.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// All stored reports, by name.
    pub const fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

impl OutputDestination for MemoryDestination {
    fn label(&self) -> String {
        if self.label.is_empty() {
            "memory".to_string()
        } else {
            self.label.clone()
        }
    }

    fn write_text(&mut self, name: &str, contents: &str) -> Result<()> {
        self.files.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn read_text(&self, name: &str) -> Result<Option<String>> {
        Ok(self.files.get(name).cloned())
    }
}
