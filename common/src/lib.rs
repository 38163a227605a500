//! Common crate, containing types shared by
//! [resource-pack-packer](https://crates.io/crates/resource-pack-packer) and
//! tooling built around it.
//!
//! A resource pack is a zip archive with a fixed layout:
//! ```text
//! pack.mcmeta
//! assets/
//!     <namespace>/
//!         sounds.json                  <- namespace root file
//!         <category directory>/
//!             <key path>.<extension>
//! ```
//!
//! This crate provides:
//! - [category::Category], the closed set of semantic buckets a top-level
//!   category directory maps to.
//! - [entry_path::EntryPath], a validated path relative to the pack root,
//!   with namespace / type / key accessors.
//! - [manifest::Manifest], the `pack.mcmeta` record written into every pack.

#![warn(missing_docs)]

pub mod category;
pub mod entry_path;
pub mod manifest;

/// Name of the top-level directory all pack entries must live under.
pub const ASSETS_DIR: &str = "assets";
/// Path of the manifest entry inside the archive.
pub const MANIFEST_PATH: &str = "pack.mcmeta";
/// File name suffix of meta files (animated textures, texture properties,
/// etc).
pub const META_FILE_SUFFIX: &str = ".mcmeta";
