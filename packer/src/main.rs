//! Main packer executable, to be used as cli tool. For help run this command
//! with `-h`.

#![warn(missing_docs)]

use anyhow::{Context, Error, anyhow};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use resource_pack_packer::{
    archive_name::ArchiveName,
    builtin::{ExcludeExtensions, MinifyJson},
    classifier::Classifier,
    common::{category::Category, manifest::Manifest},
    directory,
    pipeline::{self, Report},
    sink,
};
use simple_logger::SimpleLogger;
use std::{
    fs,
    path::{Path, PathBuf},
};
use zip::CompressionMethod;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Arguments {
    /// Log level.
    #[arg(long, global = true, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
struct PackGlobalOptions {
    /// Description written into `pack.mcmeta`.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Pack format written into `pack.mcmeta`.
    #[arg(long)]
    pub pack_format: u32,

    /// Start with empty category definition instead of the standard one. Use
    /// `--define` to fill it.
    #[arg(long)]
    pub custom_definition: bool,

    /// Maps category directory to a category, as `<category>=<directory>`,
    /// eg. `textures=tex`. Can be repeated.
    #[arg(long = "define", value_parser = definition_parse)]
    pub definitions: Vec<(Category, String)>,

    /// Drops files with given extension (without leading dot). Can be
    /// repeated.
    #[arg(long = "exclude-extension")]
    pub exclude_extensions: Vec<String>,

    /// Replaces `.json` and `.mcmeta` files with their compact form.
    #[arg(long)]
    pub minify_json: bool,

    /// Stores files without compression.
    #[arg(long)]
    pub store: bool,
}
impl PackGlobalOptions {
    /// Extension filter, applied to entries before they reach the pipeline.
    pub fn exclude_extensions(&self) -> ExcludeExtensions {
        ExcludeExtensions::new(&self.exclude_extensions)
    }

    pub fn into_pipeline_builder(
        self,
        output_file_path: PathBuf,
    ) -> Result<pipeline::Builder, Error> {
        let mut classifier = if self.custom_definition {
            Classifier::empty()
        } else {
            Classifier::standard()
        };
        for (category, directory) in self.definitions {
            classifier
                .register(category, [directory])
                .context("apply category definition")?;
        }

        let mut sink_options = sink::Options::default();
        if self.store {
            sink_options.compression_method = CompressionMethod::Stored;
        }

        let mut builder = pipeline::Builder::new();
        builder
            .manifest_set(Manifest::new(self.description, self.pack_format))
            .output_path_set(output_file_path)
            .sink_options_set(sink_options)
            .classifier_set(classifier);

        if self.minify_json {
            builder.processor_add(Category::All, MinifyJson);
        }

        Ok(builder)
    }
}

#[derive(Args, Debug)]
struct ArchiveNameOptions {
    /// Names the archive `<base>-<version>-<classifier>.zip`. When set, the
    /// output path is the destination directory of the archive.
    #[arg(long)]
    pub archive_base_name: Option<String>,

    /// Version part of the archive name.
    #[arg(long, default_value = "unspecified")]
    pub archive_version: String,

    /// Classifier part of the archive name.
    #[arg(long, default_value = ArchiveName::CLASSIFIER_DEFAULT)]
    pub archive_classifier: String,
}
impl ArchiveNameOptions {
    /// Resolves archive file path from the output path argument.
    pub fn output_file_path_resolve(
        self,
        output_path: PathBuf,
    ) -> PathBuf {
        match self.archive_base_name {
            Some(archive_base_name) => ArchiveName::new(archive_base_name, self.archive_version)
                .with_classifier(self.archive_classifier)
                .path_in(&output_path),
            None => output_path,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates a pack from recursively searching through directories. Each
    /// directory is a pack root, containing `assets/`.
    ///
    /// Please note that all found files under `assets/` are added, including
    /// hidden files (starting with `.` on unix and with certain flags on
    /// windows).
    Directories {
        #[command(flatten)]
        pack_global_options: PackGlobalOptions,

        #[command(flatten)]
        archive_name_options: ArchiveNameOptions,

        /// Whether to follow links while traversing directories. If not set,
        /// uses sane defaults.
        #[arg(long)]
        follow_links: Option<bool>,

        /// Output archive path, or destination directory if
        /// `--archive-base-name` is set.
        output_path: PathBuf,

        /// The directories to be added to the pack.
        #[arg(required = true)]
        input_directory_paths: Vec<PathBuf>,
    },
    /// Creates a pack from list of files supplied through command line.
    ///
    /// Files outside `assets/` of the base directory are skipped.
    FilesCmd {
        #[command(flatten)]
        pack_global_options: PackGlobalOptions,

        #[command(flatten)]
        archive_name_options: ArchiveNameOptions,

        /// Output archive path, or destination directory if
        /// `--archive-base-name` is set.
        output_path: PathBuf,

        /// Base directory path (the pack root), used to resolve entry path of
        /// each file. All added files must be inside this directory.
        input_base_directory_path: PathBuf,

        /// List of files to be added to the pack.
        input_file_paths: Vec<PathBuf>,
    },
}

fn definition_parse(definition: &str) -> Result<(Category, String), Error> {
    let (category, directory) = definition
        .split_once('=')
        .ok_or_else(|| anyhow!("expected `<category>=<directory>`, got `{definition}`"))?;
    let category = category.parse::<Category>()?;
    Ok((category, directory.to_owned()))
}

fn output_directory_prepare(output_file_path: &Path) -> Result<(), Error> {
    if let Some(parent) = output_file_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    Ok(())
}

fn report_print(report: &Report) {
    println!(
        "copied: {}, dropped: {}, directories skipped: {}, failures: {}",
        report.entries_copied,
        report.entries_dropped,
        report.directories_skipped,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("failed: {failure}");
    }
}

fn run(command: Command) -> Result<Report, Error> {
    let report = match command {
        Command::Directories {
            pack_global_options,
            archive_name_options,
            follow_links,
            output_path,
            input_directory_paths,
        } => {
            let mut directory_search_options = directory::SearchOptions::default();
            if let Some(follow_links) = follow_links {
                directory_search_options.follow_links = follow_links;
            }

            let output_file_path = archive_name_options.output_file_path_resolve(output_path);
            output_directory_prepare(&output_file_path)?;
            let exclude_extensions = pack_global_options.exclude_extensions();
            let mut builder = pack_global_options.into_pipeline_builder(output_file_path)?;
            for input_directory_path in input_directory_paths {
                let entries = directory::search(&input_directory_path, &directory_search_options)?;
                builder.entries_add(exclude_extensions.filter(entries));
            }

            builder.build()?.process()?
        }
        Command::FilesCmd {
            pack_global_options,
            archive_name_options,
            output_path,
            input_base_directory_path,
            input_file_paths,
        } => {
            let output_file_path = archive_name_options.output_file_path_resolve(output_path);
            output_directory_prepare(&output_file_path)?;
            let exclude_extensions = pack_global_options.exclude_extensions();
            let mut builder = pack_global_options.into_pipeline_builder(output_file_path)?;
            let entries = directory::files(&input_base_directory_path, input_file_paths)?;
            builder.entries_add(exclude_extensions.filter(entries));

            builder.build()?.process()?
        }
    };

    Ok(report)
}

fn main() -> Result<(), Error> {
    let arguments = Arguments::parse();

    SimpleLogger::new()
        .with_level(arguments.log_level)
        .init()
        .context("initialize logger")?;

    let report = run(arguments.command)?;
    report_print(&report);

    Ok(())
}
