//! Archive sink. Contains [Sink], the append-only zip output shared by the
//! pipeline and all processors.

use crate::entry::{self, Entry};
use anyhow::{Context, Error, anyhow, bail, ensure};
use serde::Serialize;
use std::{
    collections::HashSet,
    fs,
    io::{self, BufWriter, Read, Seek, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Options of the output archive.
///
/// If not sure what to set here, use [Default].
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Compression method used for every entry.
    pub compression_method: CompressionMethod,
    /// Compression level, [None] uses method default.
    pub compression_level: Option<i64>,
}
impl Default for Options {
    fn default() -> Self {
        Self {
            compression_method: CompressionMethod::Deflated,
            compression_level: None,
        }
    }
}

struct State {
    writer: ZipWriter<BufWriter<fs::File>>,
    names: Vec<String>,
    names_set: HashSet<String>,
}

/// Append-only zip archive.
///
/// Every write and [Sink::close] hold an exclusive lock for their whole
/// duration, so the sink can be shared between threads (eg. processors running
/// concurrently with the pipeline copy step) without interleaving entries.
///
/// Each logical path can be written once. Writing an already existing path
/// fails and keeps the first entry.
///
/// If not closed explicitly, the archive is finalized when [Sink] is dropped.
pub struct Sink {
    path: PathBuf,
    file_options: SimpleFileOptions,
    state: Mutex<Option<State>>,
}
impl Sink {
    /// Creates a fresh, empty archive at `path`, removing existing file first.
    ///
    /// Parent directory must exist.
    pub fn create(
        path: &Path,
        options: &Options,
    ) -> Result<Self, Error> {
        match fs::remove_file(path) {
            Ok(()) => log::debug!("removed existing archive {}", path.display()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("remove existing archive {}", path.display()));
            }
        }

        let file = fs::File::create_new(path)
            .with_context(|| format!("create archive {}", path.display()))?;
        let writer = ZipWriter::new(BufWriter::new(file));

        let file_options = SimpleFileOptions::default()
            .compression_method(options.compression_method)
            .compression_level(options.compression_level);

        Ok(Self {
            path: path.to_path_buf(),
            file_options,
            state: Mutex::new(Some(State {
                writer,
                names: Vec::new(),
                names_set: HashSet::new(),
            })),
        })
    }

    /// Location of the archive on the filesystem.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `bytes` as a new entry named `path`.
    pub fn write_bytes(
        &self,
        bytes: &[u8],
        path: &str,
    ) -> Result<(), Error> {
        validate_path(path)?;

        let mut state = self.lock()?;
        let state = state
            .as_mut()
            .ok_or_else(|| anyhow!("cannot write {path}, archive is already closed"))?;

        if state.names_set.contains(path) {
            bail!("cannot write {path}, duplicate path in archive");
        }

        entry_write(&mut state.writer, path, self.file_options, bytes)?;

        state.names.push(path.to_owned());
        state.names_set.insert(path.to_owned());

        Ok(())
    }

    /// Writes utf-8 `text` as a new entry named `path`. For other encodings
    /// encode the text and use [Self::write_bytes].
    pub fn write_text(
        &self,
        text: &str,
        path: &str,
    ) -> Result<(), Error> {
        self.write_bytes(text.as_bytes(), path)
    }

    /// Serializes `value` as compact json and writes it as a new entry named
    /// `path`.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        value: &T,
        path: &str,
    ) -> Result<(), Error> {
        let content =
            serde_json::to_vec(value).with_context(|| format!("serialize json for {path}"))?;
        self.write_bytes(&content, path)
    }

    /// Reads `reader` to the end and writes content as a new entry named
    /// `path`. The reader is consumed before the archive is locked.
    pub fn write_reader(
        &self,
        mut reader: impl Read,
        path: &str,
    ) -> Result<(), Error> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .with_context(|| format!("read content for {path}"))?;
        self.write_bytes(&content, path)
    }

    /// Copies content of `entry` into the archive, under `path` or entry own
    /// path if [None].
    ///
    /// Entry stream is closed before the content is written.
    pub fn copy_entry(
        &self,
        entry: &dyn Entry,
        path: Option<&str>,
    ) -> Result<(), Error> {
        let content = entry::read_bytes(entry)?;
        let path = path.unwrap_or_else(|| entry.path().full_path());
        self.write_bytes(&content, path)
    }

    /// Flushes buffered archive data to the file.
    pub fn flush(&self) -> Result<(), Error> {
        let mut state = self.lock()?;
        if let Some(state) = state.as_mut() {
            state.writer.flush().context("flush archive")?;
        }
        Ok(())
    }

    /// Finalizes the archive (writes central directory) and closes the file.
    /// No more writes are allowed afterwards.
    ///
    /// Closing already closed sink does nothing.
    pub fn close(&self) -> Result<(), Error> {
        // lock is held until the archive is finalized
        let mut state = self.lock()?;
        match state.take() {
            Some(state) => finish(state, &self.path),
            None => Ok(()),
        }
    }

    /// Whether [Self::close] was already called.
    pub fn is_closed(&self) -> bool {
        match self.state.lock() {
            Ok(state) => state.is_none(),
            // a writer panicked while holding the lock, nothing can be written
            Err(_) => true,
        }
    }

    /// Names of written entries, in write order.
    pub fn names(&self) -> Result<Vec<String>, Error> {
        let state = self.lock()?;
        let state = state
            .as_ref()
            .ok_or_else(|| anyhow!("archive is already closed"))?;
        Ok(state.names.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<State>>, Error> {
        self.state
            .lock()
            .map_err(|_| anyhow!("archive {} lock is poisoned", self.path.display()))
    }
}
impl Drop for Sink {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(state) = state
            && let Err(error) = finish(state, &self.path)
        {
            log::error!("failed to finalize archive on drop: {error:?}");
        }
    }
}
impl std::fmt::Debug for Sink {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn finish(
    state: State,
    path: &Path,
) -> Result<(), Error> {
    let writer = state
        .writer
        .finish()
        .with_context(|| format!("finalize archive {}", path.display()))?;
    let file = writer
        .into_inner()
        .map_err(|error| error.into_error())
        .with_context(|| format!("flush archive {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync archive {}", path.display()))?;
    drop(file);

    log::debug!(
        "closed archive {} with {} entries",
        path.display(),
        state.names.len()
    );

    Ok(())
}

/// Writes a single archive entry. On failure the partially written entry is
/// removed, so the archive holds only complete entries.
fn entry_write<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    path: &str,
    file_options: SimpleFileOptions,
    bytes: &[u8],
) -> Result<(), Error> {
    writer
        .start_file(path, file_options)
        .with_context(|| format!("start archive entry {path}"))?;

    if let Err(error) = writer.write_all(bytes) {
        if let Err(abort_error) = writer.abort_file() {
            log::error!("failed to abort archive entry {path}: {abort_error:?}");
        }
        return Err(error).with_context(|| format!("write archive entry {path}"));
    }

    Ok(())
}

/// Archive entry names must be relative and must not escape the archive root.
fn validate_path(path: &str) -> Result<(), Error> {
    ensure!(!path.is_empty(), "archive path must not be empty");
    ensure!(
        !path.starts_with('/') && !path.contains('\\'),
        "archive path {path} must be relative and use '/' separators"
    );
    ensure!(
        path.split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != ".."),
        "archive path {path} contains empty, `.` or `..` segment"
    );
    Ok(())
}
