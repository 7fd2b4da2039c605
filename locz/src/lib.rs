#![forbid(unsafe_code)]
//! Build-time localization code generator.
//!
//! Scans a source tree for projects (`*.csproj`) and the translation tables
//! (`*.loc.csv`) inside them. Every table becomes a C# `enum` of its keys and
//! one `.resx` document per language column; every project gets a small
//! `LoczExtensions.cs` accessor class.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locz::{Locz, LoczConfig};
//!
//! let report = Locz::with_config(LoczConfig::default()).run(".")?;
//! if report.has_failures() {
//!     eprintln!("{} tables failed", report.failed_count());
//! }
//! # Ok::<(), locz::Error>(())
//! ```
//!
//! # Table format
//!
//! ```text
//! Key,en-US,fr-FR
//! Hello,Hello,Bonjour
//! Goodbye,Goodbye,Au revoir
//! ```
//!
//! The first column of the header is ignored; the others name the languages.
//! Rows with an empty key are skipped. A row with fewer fields than the header
//! fails its table.
//!
//! # Incremental runs
//!
//! A table is regenerated only when its enumeration file is missing or older
//! than the table. The accessor class is written only when absent and is
//! never refreshed afterwards: delete it to get a new copy.

pub mod artifacts;
pub mod config;
pub mod discovery;
pub mod error;
pub mod escape;
pub mod freshness;
pub mod fs;
pub mod generator;
pub mod pipeline;
pub mod reader;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    artifacts::{AccessorModule, EnumDocument, ResourceDocument},
    config::LoczConfig,
    discovery::{discover, find_projects, find_tables},
    error::{Error, Result},
    escape::escape,
    freshness::needs_regeneration,
    fs::{FileSystem, MemoryFileSystem, RealFileSystem},
    generator::{Generator, TableArtifacts},
    pipeline::Locz,
    reader::{TableReader, TableRow},
    traits::Artifact,
    types::{
        Outcome, Project, ProjectReport, ProjectTables, ResourceEntry, RunReport, TableReport,
        TranslationTable,
    },
};
