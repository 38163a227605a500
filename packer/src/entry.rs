//! Entry helpers. Contains [Entry] trait, describing single discovered file or
//! directory, and its fs ([FsEntry]) / memory ([MemoryEntry])
//! implementations.

use crate::{
    common::{META_FILE_SUFFIX, entry_path::EntryPath},
    entry_path,
};
use anyhow::{Context, Error};
use serde::de::DeserializeOwned;
use std::{
    fs,
    io::{self, Cursor, Read},
    path::{Path, PathBuf},
};

/// Read-only view of one file or directory contributing to a pack.
///
/// Entries are created by the discovery side (eg. [crate::directory::search])
/// before processing starts and never change afterwards. Content is read
/// lazily with [Entry::open]. Every call opens a fresh stream, which is closed
/// when the returned reader is dropped.
pub trait Entry: Send + Sync {
    /// Path relative to the pack root, providing namespace, type and key.
    fn path(&self) -> &EntryPath;

    /// Whether this entry is a directory. Directories are never processed
    /// nor copied.
    fn is_directory(&self) -> bool;

    /// Opens entry content for reading.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// Whether the entry is a meta file (eg. animated texture description), a
/// file with `.mcmeta` suffix.
pub fn is_meta_file(entry: &dyn Entry) -> bool {
    !entry.is_directory() && entry.path().file_name().ends_with(META_FILE_SUFFIX)
}

/// Reads whole entry content. The stream is closed before returning.
pub fn read_bytes(entry: &dyn Entry) -> Result<Vec<u8>, Error> {
    let mut content = Vec::new();
    entry
        .open()
        .and_then(|mut reader| reader.read_to_end(&mut content))
        .with_context(|| format!("read entry {}", entry.path()))?;
    Ok(content)
}

/// Reads and parses entry content as json.
///
/// # Examples
///
/// ```
/// # use anyhow::Error;
/// # use resource_pack_packer::entry::{read_json, MemoryEntry};
/// #
/// # fn main() -> Result<(), Error> {
/// #
/// let entry = MemoryEntry::build_from_content(
///     "assets/modx/textures/foo.png.mcmeta",
///     Box::new(*br#"{"animation":{"frametime":2}}"#),
/// )?;
/// let value: serde_json::Value = read_json(&entry)?;
/// assert_eq!(value["animation"]["frametime"], 2);
/// #
/// # Ok(())
/// # }
/// ```
pub fn read_json<T: DeserializeOwned>(entry: &dyn Entry) -> Result<T, Error> {
    let reader = entry
        .open()
        .with_context(|| format!("open entry {}", entry.path()))?;
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("parse entry {} as json", entry.path()))?;
    Ok(value)
}

/// [Entry] backed by a file (or directory) on the filesystem.
#[derive(Debug, Clone)]
pub struct FsEntry {
    path: EntryPath,
    source: PathBuf,
}
impl FsEntry {
    /// Creates [self] for fs item at `path`, with [EntryPath] relative to
    /// `base_directory_path`.
    ///
    /// Only path is inspected, content is not read until [Entry::open].
    pub fn build_from_path(
        path: &Path,
        base_directory_path: &Path,
    ) -> Result<Self, Error> {
        // strip prefix, so entry path is relative to search root
        let file_base_relative_path = path
            .strip_prefix(base_directory_path)
            .context("resolve file_base_relative_path")?;

        let entry_path = entry_path::from_file_base_relative_path(file_base_relative_path)?;

        Ok(Self {
            path: entry_path,
            source: path.to_path_buf(),
        })
    }

    /// Location of the entry on the filesystem.
    pub fn source(&self) -> &Path {
        &self.source
    }
}
impl Entry for FsEntry {
    fn path(&self) -> &EntryPath {
        &self.path
    }

    fn is_directory(&self) -> bool {
        self.source.is_dir()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        let file = fs::File::open(&self.source)?;
        Ok(Box::new(io::BufReader::new(file)))
    }
}

/// [Entry] with content held in memory. Useful for generated content and
/// tests.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    path: EntryPath,
    content: Option<Box<[u8]>>,
}
impl MemoryEntry {
    /// Creates file entry at `path` with given `content`.
    pub fn build_from_content(
        path: &str,
        content: Box<[u8]>,
    ) -> Result<Self, Error> {
        let path = EntryPath::from_string(path.to_owned())?;
        Ok(Self {
            path,
            content: Some(content),
        })
    }

    /// Creates directory entry at `path`.
    pub fn build_directory(path: &str) -> Result<Self, Error> {
        let path = EntryPath::from_string(path.to_owned())?;
        Ok(Self {
            path,
            content: None,
        })
    }
}
impl Entry for MemoryEntry {
    fn path(&self) -> &EntryPath {
        &self.path
    }

    fn is_directory(&self) -> bool {
        self.content.is_none()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.content {
            Some(content) => Ok(Box::new(Cursor::new(&**content))),
            None => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{} is a directory", self.path),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Entry, FsEntry, MemoryEntry, is_meta_file, read_bytes, read_json};
    use std::fs;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("assets/modx/textures/foo.png.mcmeta", true; "texture meta")]
    #[test_case("assets/modx/textures/foo.png", false; "texture")]
    #[test_case("assets/modx/textures/mcmeta", false; "suffix without dot")]
    fn is_meta_file_returns_expected(
        path: &str,
        expected: bool,
    ) {
        let entry = MemoryEntry::build_from_content(path, Box::new(*b"{}")).unwrap();
        assert_eq!(is_meta_file(&entry), expected);
    }

    #[test]
    fn directory_is_never_meta_file() {
        let entry = MemoryEntry::build_directory("assets/modx/dir.mcmeta").unwrap();
        assert!(!is_meta_file(&entry));
    }

    #[test]
    fn memory_directory_cannot_be_opened() {
        let entry = MemoryEntry::build_directory("assets/modx/textures").unwrap();
        assert!(entry.is_directory());
        assert!(entry.open().is_err());
        assert!(read_bytes(&entry).is_err());
    }

    #[test]
    fn read_json_reports_invalid_content() {
        let entry =
            MemoryEntry::build_from_content("assets/modx/models/a.json", Box::new(*b"{nope"))
                .unwrap();
        let error = read_json::<serde_json::Value>(&entry).unwrap_err();
        assert!(format!("{error:#}").contains("assets/modx/models/a.json"));
    }

    #[test]
    fn fs_entry_reads_file_and_detects_directory() {
        let root = TempDir::new().unwrap();
        let textures = root.path().join("assets").join("modx").join("textures");
        fs::create_dir_all(&textures).unwrap();
        fs::write(textures.join("foo.png"), b"png bytes").unwrap();

        let file = FsEntry::build_from_path(&textures.join("foo.png"), root.path()).unwrap();
        assert_eq!(file.path().full_path(), "assets/modx/textures/foo.png");
        assert_eq!(file.path().key(), "foo");
        assert!(!file.is_directory());
        assert_eq!(read_bytes(&file).unwrap(), b"png bytes");
        // every open yields a fresh stream
        assert_eq!(read_bytes(&file).unwrap(), b"png bytes");

        let directory = FsEntry::build_from_path(&textures, root.path()).unwrap();
        assert!(directory.is_directory());
    }

    #[test]
    fn fs_entry_outside_base_is_rejected() {
        let root = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        assert!(
            FsEntry::build_from_path(&other.path().join("assets/a/b.png"), root.path()).is_err()
        );
    }
}
