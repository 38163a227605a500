//! Directory helpers. Contains [search] function, used to gather pack entries
//! from directory recursively, and [files] for explicitly listed files.

use crate::{common::ASSETS_DIR, entry::FsEntry};
use anyhow::{Context, Error};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Settings for [search] function.
///
/// If not sure what to set here, use [Default].
#[derive(Debug)]
pub struct SearchOptions {
    /// Whether to follow links while traversing directories.
    pub follow_links: bool,
}
impl Default for SearchOptions {
    fn default() -> Self {
        Self { follow_links: true }
    }
}

/// Searches fs recursively and builds [FsEntry] for each resource file.
///
/// Traverses directory specified in `path` (the pack root) using
/// [SearchOptions]. Entry paths are created by stripping `path` from full file
/// path. Only files below `assets/` are returned, other files (eg. readme or
/// an existing `pack.mcmeta`) are skipped. Files below `assets/` not forming a
/// valid entry path (eg. `assets/foo.txt`) are skipped with a warning.
///
/// # Examples
///
/// ```
/// # use anyhow::Error;
/// # use resource_pack_packer::{
/// #     directory::{search, SearchOptions},
/// #     entry::Entry,
/// # };
/// # use std::fs;
/// #
/// # fn main() -> Result<(), Error> {
/// # let root = tempfile::TempDir::new()?;
/// # fs::create_dir_all(root.path().join("assets/modx/textures"))?;
/// # fs::write(root.path().join("assets/modx/textures/a.png"), b"a")?;
/// # fs::write(root.path().join("pack.mcmeta"), b"{}")?;
/// #
/// let entries = search(root.path(), &SearchOptions::default())?;
///
/// // root files are not resources
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].path().full_path(), "assets/modx/textures/a.png");
/// #
/// # Ok(())
/// # }
/// ```
pub fn search(
    path: &Path,
    options: &SearchOptions,
) -> Result<Box<[FsEntry]>, Error> {
    let entries = WalkDir::new(path)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .map(|dir_entry| {
            // detect search errors
            let dir_entry = dir_entry.with_context(|| format!("search {}", path.display()))?;

            // we are interested in files only
            // if follow_links is true, this will be resolved as link target
            if !dir_entry.file_type().is_file() {
                return Ok(None);
            }

            let relative_path = dir_entry
                .path()
                .strip_prefix(path)
                .context("resolve file_base_relative_path")?;
            if !is_resource_path(relative_path) {
                log::debug!("skipping non resource file {}", dir_entry.path().display());
                return Ok(None);
            }

            match FsEntry::build_from_path(dir_entry.path(), path) {
                Ok(entry) => Ok(Some(entry)),
                Err(error) => {
                    log::warn!(
                        "skipping invalid resource file {}: {error:#}",
                        dir_entry.path().display()
                    );
                    Ok(None)
                }
            }
        })
        .filter_map(|entry_result| entry_result.transpose()) // strips Ok(None)
        .collect::<Result<Box<[_]>, Error>>()?;

    Ok(entries)
}

/// Builds [FsEntry] for each of `file_paths`, resolving entry paths against
/// `base_directory_path` (the pack root).
///
/// Like [search], files outside `assets/` are skipped. Unlike [search], any
/// other invalid file (outside the base directory, not forming a valid entry
/// path) fails the whole call, as it was listed explicitly.
///
/// # Examples
///
/// ```
/// # use anyhow::Error;
/// # use resource_pack_packer::{directory::files, entry::Entry};
/// # use std::fs;
/// #
/// # fn main() -> Result<(), Error> {
/// # let root = tempfile::TempDir::new()?;
/// # fs::create_dir_all(root.path().join("assets/modx/textures"))?;
/// # fs::write(root.path().join("assets/modx/textures/a.png"), b"a")?;
/// # fs::write(root.path().join("README.md"), b"readme")?;
/// #
/// let entries = files(
///     root.path(),
///     [
///         root.path().join("assets/modx/textures/a.png"),
///         root.path().join("README.md"),
///     ],
/// )?;
///
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].path().full_path(), "assets/modx/textures/a.png");
/// #
/// # Ok(())
/// # }
/// ```
pub fn files(
    base_directory_path: &Path,
    file_paths: impl IntoIterator<Item = PathBuf>,
) -> Result<Box<[FsEntry]>, Error> {
    let entries = file_paths
        .into_iter()
        .map(|file_path| {
            let relative_path = file_path
                .strip_prefix(base_directory_path)
                .with_context(|| {
                    format!(
                        "file {} is outside of base directory {}",
                        file_path.display(),
                        base_directory_path.display()
                    )
                })?;
            if !is_resource_path(relative_path) {
                log::debug!("skipping non resource file {}", file_path.display());
                return Ok(None);
            }

            let entry = FsEntry::build_from_path(&file_path, base_directory_path)
                .with_context(|| file_path.to_string_lossy().into_owned())?;

            Ok(Some(entry))
        })
        .filter_map(|entry_result| entry_result.transpose()) // strips Ok(None)
        .collect::<Result<Box<[_]>, Error>>()?;

    Ok(entries)
}

/// Whether pack root relative path lives under `assets/`.
fn is_resource_path(relative_path: &Path) -> bool {
    relative_path
        .components()
        .next()
        .is_some_and(|component| component.as_os_str() == ASSETS_DIR)
}
