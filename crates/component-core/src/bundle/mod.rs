//! Component bundles: materialized, read-only views of a component library
//!
//! This module provides:
//! - The `Bundle` handle and its entries (path, directory flag, lazy contents)
//! - Collection and component discovery over bundle entries
//! - Entry readers for zip archives, local directories and in-memory fixtures
//! - Bundle sources (remote archive or local directory) and the fetcher

pub mod reader;
pub mod source;

use std::collections::HashSet;
use std::fmt;

pub use reader::{ArchiveReader, DirectoryReader, EntryReader, MemoryReader};
pub use source::{BundleFetcher, BundleSource, RemoteRef, SourceError};

/// A single entry of a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Path relative to the bundle root, `/`-separated, no trailing slash
    pub path: String,
    pub is_dir: bool,
    /// Opaque slot handed back to the bundle's reader
    slot: usize,
}

impl BundleEntry {
    pub fn file(path: impl Into<String>, slot: usize) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            slot,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            slot: usize::MAX,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// First path segment, if the entry lives inside a top-level directory
    fn top_level_dir(&self) -> Option<&str> {
        match self.path.split_once('/') {
            Some((first, _)) => Some(first),
            None if self.is_dir => Some(self.path.as_str()),
            None => None,
        }
    }
}

/// Read-only set of entries backed by an `EntryReader`
pub struct Bundle {
    entries: Vec<BundleEntry>,
    reader: Box<dyn EntryReader>,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Bundle {
    pub fn new(entries: Vec<BundleEntry>, reader: Box<dyn EntryReader>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut entry| {
                entry.path = normalize_entry_path(&entry.path);
                entry
            })
            .filter(|entry| !entry.path.is_empty())
            .collect();
        Self { entries, reader }
    }

    /// Build a bundle from in-memory files; directories are implied by paths
    /// ending in `/`
    pub fn from_memory<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, Vec<u8>)>,
        P: Into<String>,
    {
        let mut entries = Vec::new();
        let mut contents = Vec::new();
        for (path, bytes) in files {
            let path = path.into();
            if path.ends_with('/') {
                entries.push(BundleEntry::dir(path));
            } else {
                entries.push(BundleEntry::file(path, contents.len()));
                contents.push(bytes);
            }
        }
        Self::new(entries, Box::new(MemoryReader::new(contents)))
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the bytes of a file entry
    pub fn read(&self, entry: &BundleEntry) -> Result<Vec<u8>, SourceError> {
        self.reader.read(entry)
    }

    /// Distinct top-level directory names, in first-seen order
    pub fn collections(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut collections = Vec::new();
        for entry in &self.entries {
            if let Some(name) = entry.top_level_dir() {
                if !name.is_empty() && seen.insert(name) {
                    collections.push(name.to_string());
                }
            }
        }
        collections
    }

    /// Distinct directory names directly under `collection`, in first-seen order
    pub fn components(&self, collection: &str) -> Vec<String> {
        let prefix = format!("{}/", collection);
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for entry in &self.entries {
            let Some(rest) = entry.path.strip_prefix(&prefix) else {
                continue;
            };
            let name = match rest.split_once('/') {
                Some((name, _)) => name,
                None if entry.is_dir => rest,
                None => continue,
            };
            if !name.is_empty() && seen.insert(name) {
                components.push(name.to_string());
            }
        }
        components
    }

    /// Drop a single top-level directory shared by every entry
    ///
    /// Branch archives wrap the repository in `<repo>-<branch>/`; stripping it
    /// makes the repository's own top-level directories the collections.
    pub fn strip_wrapper_dir(mut self) -> Self {
        let Some(wrapper) = self.single_wrapper_dir() else {
            return self;
        };
        let prefix = format!("{}/", wrapper);
        self.entries = self
            .entries
            .into_iter()
            .filter_map(|mut entry| {
                let rest = entry.path.strip_prefix(&prefix)?.to_string();
                entry.path = rest;
                Some(entry)
            })
            .filter(|entry| !entry.path.is_empty())
            .collect();
        self
    }

    fn single_wrapper_dir(&self) -> Option<String> {
        let mut wrapper: Option<&str> = None;
        for entry in &self.entries {
            let first = match entry.path.split_once('/') {
                Some((first, _)) => first,
                None if entry.is_dir => entry.path.as_str(),
                // A top-level file means there is no wrapper
                None => return None,
            };
            match wrapper {
                Some(existing) if existing != first => return None,
                Some(_) => {}
                None => wrapper = Some(first),
            }
        }
        // Only unwrap when something actually lives inside the wrapper
        let wrapper = wrapper?;
        let prefix = format!("{}/", wrapper);
        self.entries
            .iter()
            .any(|e| e.path.starts_with(&prefix))
            .then(|| wrapper.to_string())
    }
}

/// Normalize archive-style paths: `\` becomes `/`, trailing slashes and a
/// leading `./` are removed. Traversal segments are kept so plans can reject
/// them.
fn normalize_entry_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.strip_prefix("./").unwrap_or(&path);
    path.trim_end_matches('/').to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Build a zip archive in memory with explicit directory entries
    pub(crate) fn build_zip(dirs: &[&str], files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            for dir in dirs {
                zip.add_directory(*dir, options).unwrap();
            }
            for (name, content) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
            zip.finish().unwrap();
        }
        zip_buffer
    }
}
