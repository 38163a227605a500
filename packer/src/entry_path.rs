//! Entry path helpers. Contains [from_file_base_relative_path] that creates
//! entry paths from fs paths.

use crate::common::entry_path::EntryPath;
use anyhow::{Context, Error, anyhow, ensure};
use std::path::{Component, Path};

/// Creates entry path (eg. "assets/dir1/dir2/file.png") from relative fs path
/// (eg. "assets\\dir1\\dir2\\file.png").
///
/// # Examples
///
/// ```
/// # use anyhow::Error;
/// # use std::path::PathBuf;
/// # use resource_pack_packer::entry_path::from_file_base_relative_path;
/// #
/// # fn main() -> Result<(), Error> {
/// #
/// let entry_path = from_file_base_relative_path(&PathBuf::from("assets/modx/textures/foo.png"))?;
/// assert_eq!(entry_path.full_path(), "assets/modx/textures/foo.png");
/// assert_eq!(entry_path.type_name(), "textures");
/// #
/// # Ok(())
/// # }
/// ```
pub fn from_file_base_relative_path(file_base_relative_path: &Path) -> Result<EntryPath, Error> {
    ensure!(
        file_base_relative_path.is_relative(),
        "path must be relative, got {:?}",
        file_base_relative_path
    );

    // list of path components, eg. ["assets", "modx", "file.bin"]
    let file_base_relative_path_components = file_base_relative_path
        .components()
        .map(|component| {
            // we cannot handle things like '/' or '.' or '..' here
            ensure!(
                matches!(component, Component::Normal(_)),
                "relative path must contain only standard path items, got {:?}",
                component
            );

            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| anyhow!("cannot convert path component to string"))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    // archive entries always use '/' regardless of the platform
    let entry_path_string = itertools::join(file_base_relative_path_components, "/");

    let entry_path = EntryPath::from_string(entry_path_string).context("build entry path")?;

    Ok(entry_path)
}
