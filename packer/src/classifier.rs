//! Category classifier. Contains [Classifier], mapping category directory
//! names to [Category], and [categorize], the classification step of the
//! pipeline.

use crate::{common::category::Category, entry::Entry};
use anyhow::{Error, bail, ensure};
use std::collections::{HashMap, HashSet};

/// Maps top-level category directory names (eg. `textures`) to [Category].
///
/// A directory name can be mapped to at most one category and the wildcard
/// [Category::All] cannot be mapped at all. Names not present in the table
/// classify as [Category::Custom].
#[derive(Debug, Clone)]
pub struct Classifier {
    categories_by_directory: HashMap<String, Category>,
}
impl Classifier {
    /// Creates empty [self], to be filled with custom definitions.
    pub fn empty() -> Self {
        let categories_by_directory = HashMap::<String, Category>::new();

        Self {
            categories_by_directory,
        }
    }

    /// Creates [self] filled with standard (vanilla) directory names, as
    /// returned by [Category::standard_directory].
    pub fn standard() -> Self {
        let categories_by_directory = Category::VALUES
            .into_iter()
            .filter_map(|category| {
                category
                    .standard_directory()
                    .map(|directory| (directory.to_owned(), category))
            })
            .collect::<HashMap<_, _>>();

        Self {
            categories_by_directory,
        }
    }

    /// Maps all `directories` to `category`.
    ///
    /// Fails if `category` is the wildcard or any of `directories` is already
    /// mapped (or repeated). On failure the table is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use anyhow::Error;
    /// # use resource_pack_packer::{classifier::Classifier, common::category::Category};
    /// #
    /// # fn main() -> Result<(), Error> {
    /// #
    /// let mut classifier = Classifier::empty();
    /// classifier.register(Category::Textures, ["textures", "tex"])?;
    ///
    /// assert_eq!(classifier.classify("tex"), Category::Textures);
    /// assert_eq!(classifier.classify("models"), Category::Custom);
    ///
    /// // already registered
    /// assert!(classifier.register(Category::Models, ["tex"]).is_err());
    /// // wildcard cannot be a classification result
    /// assert!(classifier.register(Category::All, ["everything"]).is_err());
    /// #
    /// # Ok(())
    /// # }
    /// ```
    pub fn register<I, S>(
        &mut self,
        category: Category,
        directories: I,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ensure!(
            !category.is_wildcard(),
            "cannot register directories for wildcard category `{}`",
            category
        );

        let directories = directories.into_iter().map(Into::into).collect::<Vec<_>>();

        // validate everything first, so failure leaves the table unchanged
        let mut directories_seen = HashSet::<&str>::new();
        for directory in &directories {
            if let Some(existing) = self.categories_by_directory.get(directory) {
                bail!("directory `{directory}` is already registered for category `{existing}`");
            }
            if !directories_seen.insert(directory.as_str()) {
                bail!("directory `{directory}` is repeated");
            }
        }

        self.categories_by_directory
            .extend(directories.into_iter().map(|directory| (directory, category)));

        Ok(())
    }

    /// Returns category for exact `directory` match, [Category::Custom]
    /// otherwise.
    pub fn classify(
        &self,
        directory: &str,
    ) -> Category {
        self.categories_by_directory
            .get(directory)
            .copied()
            .unwrap_or(Category::Custom)
    }

    /// Number of mapped directories.
    pub fn len(&self) -> usize {
        self.categories_by_directory.len()
    }

    /// Whether no directory is mapped.
    pub fn is_empty(&self) -> bool {
        self.categories_by_directory.is_empty()
    }
}
impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves category of `entry`, as used to select its processors.
///
/// Returns [None] for directories, which are never classified. Namespace root
/// files (eg. `assets/modx/sounds.json`) are always [Category::Custom],
/// regardless of the table.
pub fn categorize(
    classifier: &Classifier,
    entry: &dyn Entry,
) -> Option<Category> {
    if entry.is_directory() {
        return None;
    }

    let path = entry.path();
    if path.is_inside_namespace() {
        return Some(Category::Custom);
    }

    Some(classifier.classify(path.type_name()))
}
