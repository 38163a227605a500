//! Built-in processors. Contains [ExcludeExtensions] and [MinifyJson].

use crate::{
    entry::{self, Entry},
    processor::Processor,
    sink::Sink,
};
use anyhow::{Context, Error};

/// Drops entries by file extension, eg. editor leftovers or sources of
/// generated textures.
///
/// # Examples
///
/// ```
/// # use resource_pack_packer::{
/// #     builtin::ExcludeExtensions,
/// #     common::category::Category,
/// #     pipeline::Builder,
/// # };
/// let mut builder = Builder::new();
/// builder.processor_add(Category::All, ExcludeExtensions::new(["psd", "tmp"]));
/// ```
#[derive(Debug, Clone)]
pub struct ExcludeExtensions {
    suffixes: Box<[String]>,
}
impl ExcludeExtensions {
    /// Creates [self] dropping files with any of `extensions` (without
    /// leading dot).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|extension| format!(".{}", extension.as_ref().trim_start_matches('.')))
            .collect::<Box<[_]>>();

        Self { suffixes }
    }

    /// Whether `file_name` has one of excluded extensions.
    pub fn is_excluded(
        &self,
        file_name: &str,
    ) -> bool {
        self.suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }

    /// Removes excluded entries from `entries`, before they reach any
    /// processor.
    ///
    /// Prefer this over registering [self] as a processor when processors
    /// writing content (like [MinifyJson]) are used, as their output is kept
    /// even if the entry is dropped by vote.
    ///
    /// # Examples
    ///
    /// ```
    /// # use anyhow::Error;
    /// # use resource_pack_packer::{
    /// #     builtin::{ExcludeExtensions, MinifyJson},
    /// #     common::category::Category,
    /// #     entry::MemoryEntry,
    /// #     pipeline::Builder,
    /// # };
    /// #
    /// # fn main() -> Result<(), Error> {
    /// let entries = [
    ///     MemoryEntry::build_from_content("assets/modx/lang/en_us.json", Box::new(*b"{}"))?,
    ///     MemoryEntry::build_from_content("assets/modx/lang/draft.json.bak", Box::new(*b"{}"))?,
    /// ];
    ///
    /// let mut builder = Builder::new();
    /// builder
    ///     .processor_add(Category::All, MinifyJson)
    ///     .entries_add(ExcludeExtensions::new(["bak"]).filter(entries));
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter<E: Entry>(
        &self,
        entries: impl IntoIterator<Item = E>,
    ) -> impl Iterator<Item = E> {
        entries.into_iter().filter(|entry| {
            let excluded = self.is_excluded(entry.path().file_name());
            if excluded {
                log::debug!("excluding {} by extension", entry.path());
            }
            !excluded
        })
    }
}
impl Processor for ExcludeExtensions {
    fn process(
        &self,
        entry: &dyn Entry,
        _sink: &Sink,
    ) -> Result<bool, Error> {
        let excluded = self.is_excluded(entry.path().file_name());
        if excluded {
            log::debug!("excluding {} by extension", entry.path());
        }
        Ok(!excluded)
    }

    fn name(&self) -> &str {
        "exclude-extensions"
    }
}

/// Replaces json files (`.json` and `.mcmeta`) with their compact form.
///
/// The minified content is written under the entry own path and the raw file
/// is dropped. Files failing to parse are reported and copied unchanged.
///
/// Minified content is written before the votes of other processors are
/// known, so it cannot be dropped by them. Exclude entries up front with
/// [ExcludeExtensions::filter].
#[derive(Debug, Default, Clone, Copy)]
pub struct MinifyJson;
impl MinifyJson {
    const SUFFIXES: [&'static str; 2] = [".json", ".mcmeta"];
}
impl Processor for MinifyJson {
    fn process(
        &self,
        entry: &dyn Entry,
        sink: &Sink,
    ) -> Result<bool, Error> {
        let file_name = entry.path().file_name();
        if !Self::SUFFIXES
            .iter()
            .any(|suffix| file_name.ends_with(suffix))
        {
            return Ok(true);
        }

        let value: serde_json::Value = entry::read_json(entry)?;
        sink.write_json(&value, entry.path().full_path())
            .context("write minified json")?;

        Ok(false)
    }

    fn name(&self) -> &str {
        "minify-json"
    }
}
