//! resource-pack-packer builds a distributable resource pack archive (a zip
//! file with `pack.mcmeta` manifest) out of categorized resource directories.
//!
//! Every file found under `assets/<namespace>/<category directory>/` is
//! classified into a [common::category::Category], passed to processors
//! registered for this category (and to wildcard processors, registered for
//! [common::category::Category::All]), which vote whether the file should be
//! copied verbatim into the archive. Processors may also write derived content
//! (eg. minified json, generated atlases) into the archive themselves. The
//! manifest is always written last.
//!
//! This crate can be used in two ways:
//! - As a standalone application, installed with `cargo install`, this is the
//!   preferred way if you are using build scripts, CI pipeline etc.
//! - As a library, imported to your project, this is a way to go if you want
//!   to register your own processors.
//!
//! # Using as a standalone application
//!
//! ## Install (or update to matching version)
//! - Either install it with `$ cargo install resource-pack-packer` and use
//!   shell command `$ resource-pack-packer [PARAMS]...`
//! - Or clone repo, go into `packer` directory, `$ cargo run --release --
//!   [PARAMS]...`. (please note `--` which marks end of arguments for cargo run
//!   and beginning of arguments for the application).
//!
//! ## Create a pack
//! `resource-pack-packer` provides up to date documentation with `$
//! resource-pack-packer --help`. Application is built around subcommands:
//! - `directories [OPTIONS] <OUTPUT_PATH> <INPUT_DIRECTORY_PATHS>...`
//!   searches every input directory (the pack root, containing `assets/`) and
//!   packs all resource files found.
//! - `files-cmd [OPTIONS] <OUTPUT_PATH> <INPUT_BASE_DIRECTORY_PATH>
//!   [INPUT_FILE_PATHS]...` lets you specify all files from command line in
//!   `xargs` style. base directory path is used as a root for building entry
//!   paths inside the archive. Files outside its `assets/` are skipped.
//!
//! `OUTPUT_PATH` is the archive path. With `--archive-base-name` it is the
//! destination directory instead, and the archive is named
//! `<base>-<version>-<classifier>.zip` (see `--archive-version` and
//! `--archive-classifier`).
//!
//! ### Examples
//! Let's say you have a `my-pack` directory looking like:
//! ```text
//! my-pack
//! |   README.md
//! \---assets
//!     \---modx
//!         |   sounds.json
//!         +---lang
//!         |       en_us.json
//!         \---textures
//!             \---item
//!                     ruby.png
//!                     ruby.psd
//! ```
//! By running:
//! ```text
//! $ resource-pack-packer \
//!     directories \
//!     --description "My pack" \
//!     --pack-format 46 \
//!     --exclude-extension psd \
//!     --minify-json \
//!     ./build/my-pack.zip \
//!     ./my-pack
//! ```
//! a new file `build/my-pack.zip` will be created, containing
//! `assets/modx/sounds.json`, `assets/modx/lang/en_us.json` (both minified),
//! `assets/modx/textures/item/ruby.png` and `pack.mcmeta`.
//!
//! # Using as a library
//! When using as a library, you will build a [pipeline::Pipeline] with
//! [pipeline::Builder].
//!
//! You will need to add [entry::Entry] objects to the builder, which you can
//! obtain by:
//! - Automatic search through fs with [directory::search].
//! - Reading single file with [entry::FsEntry::build_from_path].
//! - Memory content with [entry::MemoryEntry::build_from_content].
//!
//! Processors implement [processor::Processor], or are created from closures
//! with [processor::from_fn]. Some common ones live in [builtin].
//!
//! ### Examples
//! ```no_run
//! # use anyhow::Error;
//! # use std::path::PathBuf;
//! # use resource_pack_packer::{
//! #     builtin::{ExcludeExtensions, MinifyJson},
//! #     common::{category::Category, manifest::Manifest},
//! #     directory::{search, SearchOptions},
//! #     pipeline::Builder,
//! # };
//!
//! # fn main() -> Result<(), Error> {
//! // start with empty pipeline builder
//! let mut builder = Builder::new();
//! builder
//!     .manifest_set(Manifest::new("My pack", 46))
//!     .output_path_set(PathBuf::from("build/my-pack.zip"))
//!     .processor_add(Category::All, ExcludeExtensions::new(["psd"]))
//!     .processor_add(Category::All, MinifyJson);
//!
//! // add files with directory search and default options
//! builder.entries_add(search(&PathBuf::from("my-pack"), &SearchOptions::default())?);
//!
//! // create the archive and run processors over all entries
//! let report = builder.build()?.process()?;
//! println!("{} entries copied", report.entries_copied);
//! # Ok(())
//! # }
//! ```
//!
//! For more examples browse through modules of this crate.

#![allow(clippy::new_without_default)]
#![warn(missing_docs)]

pub use resource_pack_common as common;

pub mod archive_name;
pub mod builtin;
pub mod classifier;
pub mod directory;
pub mod entry;
pub mod entry_path;
pub mod pipeline;
pub mod processor;
pub mod sink;
