//! Pipeline helpers. Contains [Builder], builder for [Pipeline], the
//! orchestrator running processors over entries and writing the archive.

use crate::{
    classifier::{self, Classifier},
    common::{MANIFEST_PATH, category::Category, manifest::Manifest},
    entry::Entry,
    processor::{self, Processor, Registry},
    sink::{self, Sink},
};
use anyhow::{Context, Error, anyhow, ensure};
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    sync::Arc,
};

/// Builder for [Pipeline]. Collects manifest, output path, classifier,
/// processors and entries.
///
/// Output path and manifest are mandatory. If no classifier is set,
/// [Classifier::standard] is used.
pub struct Builder {
    manifest: Option<Manifest>,
    output_path: Option<PathBuf>,
    sink_options: sink::Options,
    classifier: Classifier,
    processors: processor::Builder,
    entries: Vec<Box<dyn Entry>>,
}
impl Builder {
    /// Creates empty [self].
    pub fn new() -> Self {
        Self {
            manifest: None,
            output_path: None,
            sink_options: sink::Options::default(),
            classifier: Classifier::standard(),
            processors: processor::Builder::new(),
            entries: Vec::new(),
        }
    }

    /// Sets the manifest written into the archive.
    pub fn manifest_set(
        &mut self,
        manifest: Manifest,
    ) -> &mut Self {
        self.manifest = Some(manifest);
        self
    }

    /// Sets the archive file path.
    pub fn output_path_set(
        &mut self,
        output_path: PathBuf,
    ) -> &mut Self {
        self.output_path = Some(output_path);
        self
    }

    /// Sets archive options.
    pub fn sink_options_set(
        &mut self,
        sink_options: sink::Options,
    ) -> &mut Self {
        self.sink_options = sink_options;
        self
    }

    /// Replaces the classifier, eg. with a custom one started from
    /// [Classifier::empty].
    pub fn classifier_set(
        &mut self,
        classifier: Classifier,
    ) -> &mut Self {
        self.classifier = classifier;
        self
    }

    /// Adds `processor` for `category`. Use [Category::All] to run it for
    /// every file.
    pub fn processor_add(
        &mut self,
        category: Category,
        processor: impl Processor + 'static,
    ) -> &mut Self {
        self.processors.processor_add(category, processor);
        self
    }

    /// Adds shared `processor` for `category`.
    pub fn processor_shared_add(
        &mut self,
        category: Category,
        processor: Arc<dyn Processor>,
    ) -> &mut Self {
        self.processors.processor_shared_add(category, processor);
        self
    }

    /// Adds entry to be processed.
    pub fn entry_add(
        &mut self,
        entry: impl Entry + 'static,
    ) -> &mut Self {
        self.entries.push(Box::new(entry));
        self
    }

    /// Adds collection of entries to be processed.
    pub fn entries_add<E: Entry + 'static>(
        &mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> &mut Self {
        self.entries.extend(
            entries
                .into_iter()
                .map(|entry| Box::new(entry) as Box<dyn Entry>),
        );
        self
    }

    /// Validates configuration, creates the output archive and returns
    /// [Pipeline] ready to [Pipeline::process].
    ///
    /// Fails if output path or manifest are missing or the archive cannot be
    /// created.
    pub fn build(self) -> Result<Pipeline, Error> {
        let output_path = self
            .output_path
            .ok_or_else(|| anyhow!("output path must be set"))?;
        let manifest = self
            .manifest
            .ok_or_else(|| anyhow!("pack manifest must be set"))?;

        let sink = Sink::create(&output_path, &self.sink_options)?;

        Ok(Pipeline {
            manifest,
            classifier: self.classifier,
            registry: self.processors.finalize(),
            entries: self.entries,
            sink,
        })
    }
}
impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Step of entry handling a [Failure] happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Processor returned an error, its vote was discarded.
    Process {
        /// [Processor::name] of the failing processor.
        processor: String,
    },
    /// Entry could not be read or written to the archive, it was skipped.
    Copy,
}
impl fmt::Display for Stage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Stage::Process { processor } => write!(f, "processor {processor}"),
            Stage::Copy => f.write_str("copy"),
        }
    }
}

/// Non-fatal, per-entry error reported by [Pipeline::process].
#[derive(Debug)]
pub struct Failure {
    /// Path of the entry.
    pub path: String,
    /// Step the error happened in.
    pub stage: Stage,
    /// The error.
    pub error: Error,
}
impl fmt::Display for Failure {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({}): {:#}", self.path, self.stage, self.error)
    }
}

/// Outcome of a [Pipeline::process] run.
#[derive(Debug, Default)]
pub struct Report {
    /// Entries copied verbatim into the archive.
    pub entries_copied: usize,
    /// Entries dropped by a processor vote.
    pub entries_dropped: usize,
    /// Directory entries, skipped without processing.
    pub directories_skipped: usize,
    /// Errors that did not stop the run.
    pub failures: Vec<Failure>,
}
impl Report {
    /// Whether the run finished without per-entry failures.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn failure_push(
        &mut self,
        path: &str,
        stage: Stage,
        error: Error,
    ) {
        log::error!("failed to handle entry {path} ({stage}): {error:?}");
        self.failures.push(Failure {
            path: path.to_owned(),
            stage,
            error,
        });
    }
}

/// Orchestrator of a single packing run, built with [Builder].
///
/// Configuration (classifier, processors, entries) is read-only once built.
/// The output archive is open from [Builder::build] until [Pipeline::process]
/// finishes, [Pipeline::close] is called or [Pipeline] is dropped, whichever
/// comes first.
pub struct Pipeline {
    manifest: Manifest,
    classifier: Classifier,
    registry: Registry,
    entries: Vec<Box<dyn Entry>>,
    sink: Sink,
}
impl Pipeline {
    /// Runs all entries through processors, copies kept ones, writes the
    /// manifest as the last entry and closes the archive.
    ///
    /// Per-entry errors are logged and collected in the returned [Report],
    /// they never stop the run. Manifest and close errors are returned, the
    /// archive is released in any case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use anyhow::Error;
    /// # use resource_pack_packer::{
    /// #     common::{category::Category, manifest::Manifest},
    /// #     entry::MemoryEntry,
    /// #     pipeline::Builder,
    /// #     processor::from_fn,
    /// # };
    /// #
    /// # fn main() -> Result<(), Error> {
    /// # let directory = tempfile::TempDir::new()?;
    /// # let output_path = directory.path().join("pack.zip");
    /// let mut builder = Builder::new();
    /// builder
    ///     .manifest_set(Manifest::new("Example pack", 46))
    ///     .output_path_set(output_path)
    ///     .processor_add(
    ///         Category::Textures,
    ///         from_fn("drop-tmp", |entry, _sink| {
    ///             Ok(!entry.path().file_name().ends_with(".tmp"))
    ///         }),
    ///     )
    ///     .entry_add(MemoryEntry::build_from_content(
    ///         "assets/example/textures/a.png",
    ///         Box::new(*b"png"),
    ///     )?)
    ///     .entry_add(MemoryEntry::build_from_content(
    ///         "assets/example/textures/b.tmp",
    ///         Box::new(*b"tmp"),
    ///     )?);
    ///
    /// let report = builder.build()?.process()?;
    /// assert_eq!(report.entries_copied, 1);
    /// assert_eq!(report.entries_dropped, 1);
    /// assert!(report.is_clean());
    /// #
    /// # Ok(())
    /// # }
    /// ```
    pub fn process(&self) -> Result<Report, Error> {
        ensure!(
            !self.sink.is_closed(),
            "pipeline for {} was already processed or closed",
            self.sink.path().display()
        );

        log::info!(
            "packing {} entries into {}",
            self.entries.len(),
            self.sink.path().display()
        );

        let mut report = Report::default();
        for entry in &self.entries {
            self.entry_process(&**entry, &mut report);
        }

        // manifest is always the last entry
        if let Err(error) = self
            .manifest
            .to_json_string()
            .context("serialize pack manifest")
            .and_then(|manifest| self.sink.write_text(&manifest, MANIFEST_PATH))
            .context("write pack manifest")
        {
            if let Err(close_error) = self.sink.close() {
                log::error!("failed to close archive after manifest error: {close_error:?}");
            }
            return Err(error);
        }
        self.sink.close()?;

        log::info!(
            "packed {}: {} copied, {} dropped, {} directories skipped, {} failures",
            self.sink.path().display(),
            report.entries_copied,
            report.entries_dropped,
            report.directories_skipped,
            report.failures.len()
        );

        Ok(report)
    }

    /// Closes the archive. Safe to call at any point, including after failed
    /// [Self::process] or more than once.
    pub fn close(&self) -> Result<(), Error> {
        self.sink.close()
    }

    /// The archive being written.
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// The classifier used to resolve entry categories.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Dispatch table of processors.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn entry_process(
        &self,
        entry: &dyn Entry,
        report: &mut Report,
    ) {
        let path = entry.path().full_path();

        let Some(category) = classifier::categorize(&self.classifier, entry) else {
            log::debug!("skipping directory {path}");
            report.directories_skipped += 1;
            return;
        };
        log::debug!("processing entry {path} as {category}");

        let mut copy = true;
        for processor in self.registry.candidates(category) {
            log::trace!("calling processor {} for entry {path}", processor.name());
            match processor_call(&**processor, entry, &self.sink) {
                Ok(true) => {}
                Ok(false) => copy = false,
                Err(error) => report.failure_push(
                    path,
                    Stage::Process {
                        processor: processor.name().to_owned(),
                    },
                    error,
                ),
            }
        }

        if !copy {
            report.entries_dropped += 1;
            return;
        }

        match self.sink.copy_entry(entry, None) {
            Ok(()) => report.entries_copied += 1,
            Err(error) => report.failure_push(path, Stage::Copy, error),
        }
    }
}
impl fmt::Debug for Pipeline {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("manifest", &self.manifest)
            .field("classifier", &self.classifier)
            .field("registry", &self.registry)
            .field("entries", &self.entries.len())
            .field("sink", &self.sink)
            .finish()
    }
}

/// Calls `processor`, turning its panic into an error.
fn processor_call(
    processor: &dyn Processor,
    entry: &dyn Entry,
    sink: &Sink,
) -> Result<bool, Error> {
    panic::catch_unwind(AssertUnwindSafe(|| processor.process(entry, sink))).unwrap_or_else(
        |payload| Err(anyhow!("processor panicked: {}", panic_message(&*payload))),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
