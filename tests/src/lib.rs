#![doc(hidden)]

use anyhow::{Context, Error};
use log::LevelFilter;
use resource_pack_packer::entry::MemoryEntry;
use simple_logger::SimpleLogger;
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
    sync::Once,
};
use tempfile::TempDir;

// installs logger once per test binary, so pipeline logs are visible with
// `--nocapture`
pub fn logger_init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // another logger may already be set, ignore
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    });
}

// temporary pack root with `assets/` tree and a separate output directory
pub struct ResourceTree {
    root: TempDir,
    output: TempDir,
}
impl ResourceTree {
    pub fn new() -> Result<Self, Error> {
        let root = TempDir::new().context("create root directory")?;
        let output = TempDir::new().context("create output directory")?;
        Ok(Self { root, output })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn file_add(
        &self,
        path: &str,
        content: &[u8],
    ) -> Result<&Self, Error> {
        let path = self.root.path().join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create parent directories")?;
        }
        fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
        Ok(self)
    }

    pub fn directory_add(
        &self,
        path: &str,
    ) -> Result<&Self, Error> {
        fs::create_dir_all(self.root.path().join(path)).context("create directory")?;
        Ok(self)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.path().join("pack.zip")
    }
}

pub fn memory_file(
    path: &str,
    content: &[u8],
) -> MemoryEntry {
    MemoryEntry::build_from_content(path, content.to_vec().into_boxed_slice()).unwrap()
}

// reads all archive entries, in write order
pub fn archive_read(path: &Path) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file).context("read archive")?;

    (0..archive.len())
        .map(|index| -> Result<(String, Vec<u8>), Error> {
            let mut file = archive.by_index(index)?;
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            Ok((file.name().to_owned(), content))
        })
        .collect()
}

pub fn archive_names(path: &Path) -> Result<Vec<String>, Error> {
    Ok(archive_read(path)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

pub fn archive_content(
    path: &Path,
    name: &str,
) -> Result<Option<Vec<u8>>, Error> {
    Ok(archive_read(path)?
        .into_iter()
        .find(|(entry_name, _)| entry_name == name)
        .map(|(_, content)| content))
}
