//! Entry path contains custom type for representing path of an entry inside a
//! pack.

use std::{borrow::Borrow, fmt, ops::Deref};

/// Minimal number of segments, `assets/<namespace>/<file>`.
const SEGMENTS_MIN: usize = 3;

const NAMESPACE_INDEX: usize = 1;
const TYPE_INDEX: usize = 2;

/// [EntryPath] represents a path of an entry relative to the pack root, eg.
/// `assets/minecraft/textures/block/stone.png`. It directly corresponds to
/// the entry name inside the output archive.
///
/// Custom type is used to enforce some rules: segments are separated with
/// `/`, no segment is empty, `.` or `..` and there are at least three of them
/// (root directory, namespace and file name).
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct EntryPath {
    inner: String,
}
impl EntryPath {
    /// Construct path from string representation. Refer to [self] for rules.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resource_pack_common::entry_path::EntryPath;
    /// let path = EntryPath::from_string("assets/modx/models/item/foo.json".to_owned()).unwrap();
    /// assert_eq!(path.namespace(), "modx");
    /// assert_eq!(path.type_name(), "models");
    /// assert_eq!(path.key(), "item/foo");
    /// assert!(!path.is_inside_namespace());
    ///
    /// assert!(EntryPath::from_string("assets/foo.txt".to_owned()).is_err());
    /// ```
    pub fn from_string(inner: String) -> Result<Self, InvalidEntryPath> {
        let segments = inner.split('/').collect::<Vec<_>>();

        if segments.len() < SEGMENTS_MIN {
            return Err(InvalidEntryPath::TooShort(inner));
        }
        if segments
            .iter()
            .any(|segment| segment.is_empty() || *segment == "." || *segment == "..")
        {
            return Err(InvalidEntryPath::InvalidSegment(inner));
        }

        Ok(Self { inner })
    }

    /// Full path relative to the pack root.
    pub fn full_path(&self) -> &str {
        &self.inner
    }

    /// Iterator over `/` separated path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/')
    }

    /// Top level directory the path lives in, usually `assets`.
    pub fn root(&self) -> &str {
        self.segment(0)
    }

    /// Last segment of the path.
    pub fn file_name(&self) -> &str {
        match self.inner.rsplit_once('/') {
            Some((_, file_name)) => file_name,
            None => &self.inner,
        }
    }

    /// Namespace of the entry, eg. `minecraft`.
    pub fn namespace(&self) -> &str {
        self.segment(NAMESPACE_INDEX)
    }

    /// Category directory of the entry, eg. `textures`.
    ///
    /// For files in the namespace root (see [Self::is_inside_namespace]) there
    /// is no category directory and this returns the file name.
    pub fn type_name(&self) -> &str {
        self.segment(TYPE_INDEX)
    }

    /// Whether the entry lives directly in the namespace root, eg.
    /// `assets/minecraft/sounds.json`, having no category associated.
    pub fn is_inside_namespace(&self) -> bool {
        self.segments().count() == SEGMENTS_MIN
    }

    /// Key of the entry, the path relative to its category directory without
    /// the file extension.
    ///
    /// `assets/example/models/item/foo.json` becomes `item/foo`. For namespace
    /// root files it's the file name without extension.
    pub fn key(&self) -> &str {
        let key_start = if self.is_inside_namespace() {
            TYPE_INDEX
        } else {
            TYPE_INDEX + 1
        };

        // byte offset of the key start, after `key_start` separators
        let offset = self
            .inner
            .match_indices('/')
            .nth(key_start - 1)
            .map(|(index, _)| index + 1)
            .unwrap_or(0);
        let key = &self.inner[offset..];

        // strip extension from the last segment only
        let file_name_start = key.rfind('/').map(|index| index + 1).unwrap_or(0);
        match key[file_name_start..].rfind('.') {
            Some(dot) if dot > 0 => &key[..file_name_start + dot],
            _ => key,
        }
    }

    fn segment(
        &self,
        index: usize,
    ) -> &str {
        // constructor guarantees at least SEGMENTS_MIN segments
        self.segments().nth(index).unwrap_or_default()
    }
}

impl Deref for EntryPath {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl Borrow<str> for EntryPath {
    fn borrow(&self) -> &str {
        self.inner.as_str()
    }
}
impl fmt::Display for EntryPath {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

/// Reason a string was rejected by [EntryPath::from_string].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidEntryPath {
    /// Less than `root/namespace/file` segments.
    TooShort(String),
    /// Path contains empty, `.` or `..` segment.
    InvalidSegment(String),
}
impl fmt::Display for InvalidEntryPath {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            InvalidEntryPath::TooShort(path) => write!(
                f,
                "entry path `{path}` is too short, expected at least `root/namespace/file`"
            ),
            InvalidEntryPath::InvalidSegment(path) => {
                write!(f, "entry path `{path}` contains empty, `.` or `..` segment")
            }
        }
    }
}
impl std::error::Error for InvalidEntryPath {}
