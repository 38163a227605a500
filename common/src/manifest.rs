//! Manifest (`pack.mcmeta`) describing the pack.

use serde::{Deserialize, Serialize};

/// Pack manifest, written once as the last entry of every archive.
///
/// Serialized form is `{"pack":{"description":"...","pack_format":N}}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Manifest {
    /// Human readable pack description.
    pub description: String,
    /// Pack format version, tied to the target game version.
    pub pack_format: u32,
}
impl Manifest {
    /// Creates a new manifest.
    pub fn new(
        description: impl Into<String>,
        pack_format: u32,
    ) -> Self {
        Self {
            description: description.into(),
            pack_format,
        }
    }

    /// Serializes manifest into its compact json file representation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resource_pack_common::manifest::Manifest;
    /// #
    /// # fn main() -> Result<(), serde_json::Error> {
    /// let manifest = Manifest::new("My pack", 46);
    /// assert_eq!(
    ///     manifest.to_json_string()?,
    ///     r#"{"pack":{"description":"My pack","pack_format":46}}"#
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.as_file())
    }

    /// Parses manifest from its file representation.
    pub fn from_json_slice(content: &[u8]) -> Result<Self, serde_json::Error> {
        let file: ManifestFile<'static> = serde_json::from_slice(content)?;
        Ok(file.pack.into_owned())
    }

    fn as_file(&self) -> ManifestFile<'_> {
        ManifestFile {
            pack: std::borrow::Cow::Borrowed(self),
        }
    }
}

/// Wrapper giving the manifest its `{"pack": ...}` envelope.
#[derive(Serialize, Deserialize)]
struct ManifestFile<'a> {
    pack: std::borrow::Cow<'a, Manifest>,
}
