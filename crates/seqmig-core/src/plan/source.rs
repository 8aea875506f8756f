//! Migration sources
//!
//! A source is a read-only, flat collection of named migration files.

use crate::errors::{MigrationError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only view over a set of migration files
pub trait MigrationSource {
    /// Names of every non-directory entry, in no particular order
    fn list_entries(&self) -> Result<Vec<String>>;

    /// Full content of the named entry as text
    fn read_entry(&self, name: &str) -> Result<String>;
}

impl<T: MigrationSource + ?Sized> MigrationSource for &T {
    fn list_entries(&self) -> Result<Vec<String>> {
        (**self).list_entries()
    }

    fn read_entry(&self, name: &str) -> Result<String> {
        (**self).read_entry(name)
    }
}

/// Migrations stored as files in a directory on disk
///
/// Subdirectories are ignored; only the directory's own files are listed.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn list_failed(&self, err: std::io::Error) -> MigrationError {
        MigrationError::ListFailed {
            location: self.root.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl MigrationSource for DirSource {
    fn list_entries(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| self.list_failed(e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.list_failed(e))?;
            let name = entry.file_name().into_string().map_err(|raw| {
                MigrationError::InvalidEntryName {
                    name: raw.to_string_lossy().into_owned(),
                    reason: "file name is not valid UTF-8".to_string(),
                }
            })?;

            // Follows symlinks so a link to a directory is skipped too
            let metadata = fs::metadata(entry.path()).map_err(|e| MigrationError::ReadFailed {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            if metadata.is_dir() {
                continue;
            }

            names.push(name);
        }

        Ok(names)
    }

    fn read_entry(&self, name: &str) -> Result<String> {
        if name.contains('/') || name.contains('\\') {
            return Err(MigrationError::InvalidEntryName {
                name: name.to_string(),
                reason: "entry names cannot contain path separators".to_string(),
            }
            .into());
        }

        let content =
            fs::read_to_string(self.root.join(name)).map_err(|e| MigrationError::ReadFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(content)
    }
}

/// Migrations held in memory, typically embedded with `include_str!`
///
/// ```
/// use seqmig_core::plan::EmbeddedSource;
///
/// let source = EmbeddedSource::new()
///     .with_entry("001.sql", "CREATE TABLE users (name TEXT NOT NULL);")
///     .with_entry("002.sql", "CREATE TABLE records (field TEXT);");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    entries: Vec<(String, String)>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous entry with the same name
    pub fn with_entry(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((name, content)),
        }
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for EmbeddedSource {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        let mut source = EmbeddedSource::new();
        for (name, content) in iter {
            source.insert(name, content);
        }
        source
    }
}

impl MigrationSource for EmbeddedSource {
    fn list_entries(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_entry(&self, name: &str) -> Result<String> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| {
                MigrationError::EntryNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }
}
