//! Processor contract. Contains [Processor] trait and [Registry], the frozen
//! category to processors dispatch table built with [Builder].

use crate::{common::category::Category, entry::Entry, sink::Sink};
use anyhow::Error;
use std::{collections::HashMap, sync::Arc};

/// Pluggable keep / drop decision for an entry.
///
/// A processor is called with the entry and the shared [Sink]. It returns
/// whether the entry should still be copied verbatim into the archive
/// (`Ok(true)`) or not (`Ok(false)`). It may also write derived or auxiliary
/// content into the sink, eg. a transformed version of the entry.
///
/// Invocation order between processors is unspecified. Votes must be
/// commutative: a single `false` drops the entry, whoever casts it. Returning
/// an [Err] discards the vote of this processor; the error is reported and
/// processing continues. A panic is caught and reported the same way, though
/// a panic while writing to the sink leaves it unusable for the rest of the
/// run.
///
/// Content written into the sink stays there whatever the final vote is. A
/// processor writing content must not rely on other processors to drop the
/// entry; filter such entries before they reach the pipeline instead (eg.
/// [crate::builtin::ExcludeExtensions::filter]).
///
/// Any `Fn(&dyn Entry, &Sink) -> Result<bool, Error>` closure is a processor.
pub trait Processor: Send + Sync {
    /// Processes `entry`, returns whether it should be copied.
    fn process(
        &self,
        entry: &dyn Entry,
        sink: &Sink,
    ) -> Result<bool, Error>;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
impl<F> Processor for F
where
    F: Fn(&dyn Entry, &Sink) -> Result<bool, Error> + Send + Sync,
{
    fn process(
        &self,
        entry: &dyn Entry,
        sink: &Sink,
    ) -> Result<bool, Error> {
        self(entry, sink)
    }
}

/// [Processor] made of a closure, with a name for diagnostics. Created with
/// [from_fn].
pub struct FnProcessor<F> {
    name: String,
    f: F,
}
impl<F> Processor for FnProcessor<F>
where
    F: Fn(&dyn Entry, &Sink) -> Result<bool, Error> + Send + Sync,
{
    fn process(
        &self,
        entry: &dyn Entry,
        sink: &Sink,
    ) -> Result<bool, Error> {
        (self.f)(entry, sink)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Creates named [Processor] from a closure.
///
/// # Examples
///
/// ```
/// # use resource_pack_packer::processor::{from_fn, Processor};
/// let drop_tmp = from_fn("drop-tmp", |entry, _sink| {
///     Ok(!entry.path().file_name().ends_with(".tmp"))
/// });
/// assert_eq!(drop_tmp.name(), "drop-tmp");
/// ```
pub fn from_fn<F>(
    name: impl Into<String>,
    f: F,
) -> FnProcessor<F>
where
    F: Fn(&dyn Entry, &Sink) -> Result<bool, Error> + Send + Sync,
{
    FnProcessor {
        name: name.into(),
        f,
    }
}

/// Processor set of a single category. Holds distinct instances.
type Processors = Vec<Arc<dyn Processor>>;

/// Builder for [Registry], collects processors per [Category].
///
/// Processors registered for [Category::All] run for every file, in addition
/// to processors of its own category.
pub struct Builder {
    processors_by_category: HashMap<Category, Processors>,
}
impl Builder {
    /// Creates empty [self].
    pub fn new() -> Self {
        let processors_by_category = HashMap::<Category, Processors>::new();

        Self {
            processors_by_category,
        }
    }

    /// Adds `processor` for `category`.
    pub fn processor_add(
        &mut self,
        category: Category,
        processor: impl Processor + 'static,
    ) {
        self.processor_shared_add(category, Arc::new(processor));
    }

    /// Adds shared `processor` for `category`. Adding the same instance to
    /// the same category twice has no effect.
    pub fn processor_shared_add(
        &mut self,
        category: Category,
        processor: Arc<dyn Processor>,
    ) {
        let processors = self.processors_by_category.entry(category).or_default();
        if processors
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &processor))
        {
            return;
        }
        processors.push(processor);
    }

    /// Adds collection of shared processors for `category`.
    pub fn processors_shared_add(
        &mut self,
        category: Category,
        processors: impl IntoIterator<Item = Arc<dyn Processor>>,
    ) {
        processors
            .into_iter()
            .for_each(|processor| self.processor_shared_add(category, processor));
    }

    /// Finalizes the builder, returning read-only [Registry].
    pub fn finalize(self) -> Registry {
        Registry {
            processors_by_category: self.processors_by_category,
        }
    }
}
impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only dispatch table, category to processors.
pub struct Registry {
    processors_by_category: HashMap<Category, Processors>,
}
impl Registry {
    /// Processors registered directly for `category`.
    pub fn processors(
        &self,
        category: Category,
    ) -> &[Arc<dyn Processor>] {
        self.processors_by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Processors applicable to an entry of `category`: its own set and the
    /// wildcard set.
    pub fn candidates(
        &self,
        category: Category,
    ) -> impl Iterator<Item = &Arc<dyn Processor>> {
        let wildcard: &[Arc<dyn Processor>] = if category.is_wildcard() {
            // wildcard set is already covered
            &[]
        } else {
            self.processors(Category::All)
        };

        self.processors(category).iter().chain(wildcard)
    }

    /// Total number of registered processors, counting shared instances once
    /// per category.
    pub fn len(&self) -> usize {
        self.processors_by_category.values().map(Vec::len).sum()
    }

    /// Whether no processor is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl std::fmt::Debug for Registry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_map()
            .entries(self.processors_by_category.iter().map(|(category, processors)| {
                (
                    category,
                    processors
                        .iter()
                        .map(|processor| processor.name())
                        .collect::<Vec<_>>(),
                )
            }))
            .finish()
    }
}
