//! Entry readers: the capability of opening a bundle's backing storage,
//! enumerating its entries and reading entry bytes on demand

use super::{BundleEntry, SourceError};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Reads the contents of a bundle entry
pub trait EntryReader: Send + Sync {
    fn read(&self, entry: &BundleEntry) -> Result<Vec<u8>, SourceError>;
}

/// Zip archive decoded from an in-memory byte buffer
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
}

impl ArchiveReader {
    /// Open the archive and enumerate its entries
    pub fn open(bytes: Vec<u8>) -> Result<(Self, Vec<BundleEntry>), SourceError> {
        let data: Arc<[u8]> = Arc::from(bytes);
        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(SourceError::Decode)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index(i).map_err(SourceError::Decode)?;
            if file.is_dir() {
                entries.push(BundleEntry::dir(file.name()));
            } else {
                entries.push(BundleEntry::file(file.name(), i));
            }
        }

        Ok((Self { archive }, entries))
    }
}

impl EntryReader for ArchiveReader {
    fn read(&self, entry: &BundleEntry) -> Result<Vec<u8>, SourceError> {
        // The archive shares its central directory; cloning only copies the cursor
        let mut archive = self.archive.clone();
        let mut file = archive
            .by_index(entry.slot())
            .map_err(SourceError::Decode)?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| SourceError::Read {
                path: PathBuf::from(&entry.path),
                source,
            })?;
        Ok(contents)
    }
}

/// Local directory tree; files are read lazily from disk
pub struct DirectoryReader {
    files: Vec<PathBuf>,
}

impl DirectoryReader {
    /// Walk `root` recursively. Symlinks are not followed.
    pub fn open(root: &Path) -> Result<(Self, Vec<BundleEntry>), SourceError> {
        if !root.is_dir() {
            return Err(SourceError::NotFound(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut entries = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| SourceError::Read {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                source: e.into(),
            })?;

            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let file_type = entry.file_type();
            if file_type.is_dir() {
                entries.push(BundleEntry::dir(relative));
            } else if file_type.is_file() {
                entries.push(BundleEntry::file(relative, files.len()));
                files.push(entry.into_path());
            }
        }

        Ok((Self { files }, entries))
    }
}

impl EntryReader for DirectoryReader {
    fn read(&self, entry: &BundleEntry) -> Result<Vec<u8>, SourceError> {
        let path = self
            .files
            .get(entry.slot())
            .ok_or_else(|| SourceError::NotFound(PathBuf::from(&entry.path)))?;
        std::fs::read(path).map_err(|source| SourceError::Read {
            path: path.clone(),
            source,
        })
    }
}

/// Files held in memory, indexed by slot
pub struct MemoryReader {
    contents: Vec<Vec<u8>>,
}

impl MemoryReader {
    pub fn new(contents: Vec<Vec<u8>>) -> Self {
        Self { contents }
    }
}

impl EntryReader for MemoryReader {
    fn read(&self, entry: &BundleEntry) -> Result<Vec<u8>, SourceError> {
        self.contents
            .get(entry.slot())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(PathBuf::from(&entry.path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::test_support::build_zip;
    use crate::bundle::Bundle;

    #[test]
    fn test_archive_reader_enumerates_and_reads() {
        let bytes = build_zip(
            &["ui/", "ui/button/"],
            &[("ui/button/index.ts", b"export const Button = 1;")],
        );
        let (reader, entries) = ArchiveReader::open(bytes).unwrap();
        let bundle = Bundle::new(entries, Box::new(reader));

        assert_eq!(bundle.collections(), vec!["ui"]);
        assert_eq!(bundle.components("ui"), vec!["button"]);

        let file = bundle.entries().iter().find(|e| !e.is_dir).unwrap();
        assert_eq!(bundle.read(file).unwrap(), b"export const Button = 1;");
    }

    #[test]
    fn test_archive_reader_rejects_garbage() {
        let result = ArchiveReader::open(b"definitely not a zip".to_vec());
        assert!(matches!(result, Err(SourceError::Decode(_))));
    }

    #[test]
    fn test_directory_reader_walks_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ui/button")).unwrap();
        std::fs::write(dir.path().join("ui/button/index.ts"), b"button").unwrap();
        std::fs::create_dir_all(dir.path().join("hooks/use-x")).unwrap();

        let (reader, entries) = DirectoryReader::open(dir.path()).unwrap();
        let bundle = Bundle::new(entries, Box::new(reader));

        assert_eq!(bundle.collections(), vec!["hooks", "ui"]);
        assert_eq!(bundle.components("ui"), vec!["button"]);

        let file = bundle
            .entries()
            .iter()
            .find(|e| e.path == "ui/button/index.ts")
            .unwrap();
        assert_eq!(bundle.read(file).unwrap(), b"button");
    }

    #[test]
    fn test_directory_reader_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = DirectoryReader::open(&missing);
        assert!(matches!(result, Err(SourceError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_directory_reader_root_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            DirectoryReader::open(&file),
            Err(SourceError::NotFound(_))
        ));
    }
}
