//! Archive naming helpers. Contains [ArchiveName], the conventional
//! `<base>-<version>-<classifier>.zip` file name of a built pack.

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Parts of archive file name.
///
/// # Examples
///
/// ```
/// # use resource_pack_packer::archive_name::ArchiveName;
/// # use std::path::Path;
/// let name = ArchiveName::new("my-pack", "1.2.0");
/// assert_eq!(name.file_name(), "my-pack-1.2.0-resource-pack.zip");
/// assert_eq!(
///     name.path_in(Path::new("build/resourcepacks")),
///     Path::new("build/resourcepacks/my-pack-1.2.0-resource-pack.zip")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    /// Base name, usually project name.
    pub base_name: String,
    /// Version of the pack.
    pub version: String,
    /// Distinguishes variants of the archive.
    pub classifier: String,
}
impl ArchiveName {
    /// Classifier used by [Self::new].
    pub const CLASSIFIER_DEFAULT: &'static str = "resource-pack";

    /// Creates [self] with default classifier.
    pub fn new(
        base_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            version: version.into(),
            classifier: Self::CLASSIFIER_DEFAULT.to_owned(),
        }
    }

    /// Replaces classifier.
    pub fn with_classifier(
        mut self,
        classifier: impl Into<String>,
    ) -> Self {
        self.classifier = classifier.into();
        self
    }

    /// Archive file name, `<base>-<version>-<classifier>.zip`.
    pub fn file_name(&self) -> String {
        format!("{}-{}-{}.zip", self.base_name, self.version, self.classifier)
    }

    /// Archive path inside `destination_directory`.
    pub fn path_in(
        &self,
        destination_directory: &Path,
    ) -> PathBuf {
        destination_directory.join(self.file_name())
    }
}
impl fmt::Display for ArchiveName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
