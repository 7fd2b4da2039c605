//! Turns one translation table into its enumeration and resource documents,
//! and writes the per-project accessor module.

use std::{collections::HashSet, path::Path};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    artifacts::{AccessorModule, EnumDocument, ResourceDocument},
    config::LoczConfig,
    error::{Error, Result},
    fs::FileSystem,
    reader::{TableReader, TableRow},
    traits::Artifact,
    types::{Outcome, TranslationTable},
};

lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^@?[\p{L}_][\p{L}\p{Nd}_]*$").unwrap();
}

/// Documents built from one table, written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableArtifacts {
    pub enumeration: EnumDocument,
    pub resources: Vec<ResourceDocument>,
}

impl TableArtifacts {
    /// Writes the resource documents, then the enumeration.
    ///
    /// The enumeration's timestamp is what the freshness check compares, so it
    /// goes last: an interrupted write leaves the table stale.
    pub fn write_to<F: FileSystem + ?Sized>(&self, fs: &F, output_dir: &Path) -> Result<()> {
        for resource in &self.resources {
            let path = resource.write_to(fs, output_dir)?;
            info!("Resource file created: {}", path.display());
        }
        let path = self.enumeration.write_to(fs, output_dir)?;
        info!("Enum file created: {}", path.display());
        Ok(())
    }
}

/// Language tags of a header row.
///
/// Every tag becomes part of a file name, so an empty tag, a tag holding a
/// path separator, or a tag repeated in any letter case fails the table.
fn header_languages(path: &Path, header: &TableRow) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut languages = Vec::new();
    for (column, tag) in header.fields.iter().enumerate().skip(1) {
        let reason = if tag.is_empty() {
            format!("column {} has no language tag", column + 1)
        } else if tag.contains(['/', '\\']) {
            format!("language tag `{tag}` contains a path separator")
        } else if !seen.insert(tag.to_lowercase()) {
            format!("language `{tag}` appears more than once")
        } else {
            languages.push(tag.clone());
            continue;
        };
        return Err(Error::InvalidHeader {
            path: path.to_path_buf(),
            reason,
        });
    }
    Ok(languages)
}

pub struct Generator<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    config: &'a LoczConfig,
}

impl<'a, F: FileSystem + ?Sized> Generator<'a, F> {
    pub fn new(fs: &'a F, config: &'a LoczConfig) -> Self {
        Self { fs, config }
    }

    /// Reads `table` and builds its documents without writing anything.
    pub fn build(&self, table: &TranslationTable, namespace: &str) -> Result<TableArtifacts> {
        let config = self.config;
        let base_name = table.resource_name(config);
        let mut reader = TableReader::open(self.fs, &table.path, config)?;

        let header = reader
            .next_row()?
            .ok_or_else(|| Error::EmptySource(table.path.clone()))?;
        let languages = header_languages(&table.path, &header)?;

        let extension = &config.resource_extension;
        let mut enumeration = EnumDocument::new(namespace, &base_name, &config.enum_extension);
        let mut resources: Vec<ResourceDocument> = languages
            .iter()
            .map(|lang| ResourceDocument::new(&base_name, lang, extension))
            .collect();
        if resources.is_empty() {
            warn!("{} declares no language columns", table.path.display());
        }

        if !IDENTIFIER_REGEX.is_match(&base_name) {
            warn!(
                "{}: `{}` is not a valid C# type name",
                table.path.display(),
                base_name
            );
        }

        let mut seen = HashSet::new();
        while let Some(row) = reader.next_row()? {
            let key = row.key();
            if key.is_empty() {
                debug!(
                    "{} line {}: empty key, row skipped",
                    table.path.display(),
                    row.line
                );
                continue;
            }
            if row.len() < header.len() {
                return Err(Error::MalformedRow {
                    path: table.path.clone(),
                    line: row.line,
                    expected: header.len(),
                    found: row.len(),
                });
            }
            if row.len() > header.len() {
                debug!(
                    "{} line {}: {} extra fields ignored",
                    table.path.display(),
                    row.line,
                    row.len() - header.len()
                );
            }
            if !IDENTIFIER_REGEX.is_match(key) {
                warn!(
                    "{} line {}: key `{}` is not a valid C# identifier",
                    table.path.display(),
                    row.line,
                    key
                );
            }
            if !seen.insert(key.to_string()) {
                warn!(
                    "{} line {}: duplicate key `{}`",
                    table.path.display(),
                    row.line,
                    key
                );
            }

            enumeration.push_key(key);
            for (resource, value) in resources.iter_mut().zip(row.fields.iter().skip(1)) {
                resource.push_entry(key, value.as_str());
            }
        }

        Ok(TableArtifacts {
            enumeration,
            resources,
        })
    }

    /// Regenerates every document derived from `table` into `output_dir`.
    pub fn generate(
        &self,
        table: &TranslationTable,
        namespace: &str,
        output_dir: &Path,
    ) -> Result<Outcome> {
        info!("Generating resource files for {}...", table.path.display());
        let artifacts = self.build(table, namespace)?;
        artifacts.write_to(self.fs, output_dir)?;
        Ok(Outcome::Generated {
            languages: artifacts.resources.len(),
            keys: artifacts.enumeration.keys.len(),
        })
    }

    /// Writes the accessor module unless a file with its name already exists.
    ///
    /// Returns true if the file was written. An existing file is never read or
    /// compared, so local edits are kept and an outdated copy is kept too.
    pub fn ensure_accessor_module(&self, namespace: &str, output_dir: &Path) -> Result<bool> {
        let module = AccessorModule::new(namespace, &self.config.accessor_file_name);
        let path = output_dir.join(module.file_name());
        if self.fs.exists(&path) {
            info!("Extensions file already exists: {}", path.display());
            return Ok(false);
        }

        info!("Generating extensions file...");
        module.write_to(self.fs, output_dir)?;
        info!("Extensions file created: {}", path.display());
        Ok(true)
    }
}
