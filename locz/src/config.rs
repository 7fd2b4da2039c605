//! Generation settings.
//!
//! Every literal the pipeline depends on (file patterns, delimiter, output
//! extensions) lives in [`LoczConfig`] and is passed explicitly to discovery,
//! the table reader and the generator. Two configurations can run side by side
//! in one process without interfering.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_OUTPUT_SUBPATH: &str = "Locz";
pub const DEFAULT_TABLE_SUFFIX: &str = ".loc.csv";
pub const DEFAULT_PROJECT_SUFFIX: &str = ".csproj";
pub const DEFAULT_ACCESSOR_FILE_NAME: &str = "LoczExtensions.cs";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoczConfig {
    /// Output directory, relative to each project's directory.
    pub output_subpath: String,
    /// File-name suffix of translation tables, matched case-insensitively.
    pub table_suffix: String,
    /// File-name suffix of project markers, matched case-insensitively.
    pub project_suffix: String,
    /// Field delimiter of translation tables. Must be a single ASCII character.
    pub delimiter: char,
    /// Extension of the generated key enumeration.
    pub enum_extension: String,
    /// Extension of the generated per-language resource documents.
    pub resource_extension: String,
    /// File name of the per-project accessor module.
    pub accessor_file_name: String,
}

impl Default for LoczConfig {
    fn default() -> Self {
        Self {
            output_subpath: DEFAULT_OUTPUT_SUBPATH.to_string(),
            table_suffix: DEFAULT_TABLE_SUFFIX.to_string(),
            project_suffix: DEFAULT_PROJECT_SUFFIX.to_string(),
            delimiter: ',',
            enum_extension: "cs".to_string(),
            resource_extension: "resx".to_string(),
            accessor_file_name: DEFAULT_ACCESSOR_FILE_NAME.to_string(),
        }
    }
}

impl LoczConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output subpath.
    pub fn with_output_subpath(mut self, output_subpath: impl Into<String>) -> Self {
        self.output_subpath = output_subpath.into();
        self
    }

    /// Sets the translation-table suffix.
    pub fn with_table_suffix(mut self, table_suffix: impl Into<String>) -> Self {
        self.table_suffix = table_suffix.into();
        self
    }

    /// Sets the project-marker suffix.
    pub fn with_project_suffix(mut self, project_suffix: impl Into<String>) -> Self {
        self.project_suffix = project_suffix.into();
        self
    }

    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Checks the settings before any file is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(Error::invalid_config(format!(
                "delimiter {:?} must be a single ASCII character other than a quote or newline",
                self.delimiter
            )));
        }
        for (name, suffix) in [
            ("table_suffix", &self.table_suffix),
            ("project_suffix", &self.project_suffix),
        ] {
            if suffix.is_empty() || suffix.contains(['/', '\\']) {
                return Err(Error::invalid_config(format!(
                    "{name} `{suffix}` must be a non-empty file-name suffix"
                )));
            }
        }
        for (name, ext) in [
            ("enum_extension", &self.enum_extension),
            ("resource_extension", &self.resource_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
                return Err(Error::invalid_config(format!(
                    "{name} `{ext}` must be a bare extension such as `cs`"
                )));
            }
        }
        if self.accessor_file_name.is_empty() || self.accessor_file_name.contains(['/', '\\']) {
            return Err(Error::invalid_config(format!(
                "accessor_file_name `{}` must be a plain file name",
                self.accessor_file_name
            )));
        }
        Ok(())
    }

    /// The delimiter as the byte the CSV reader expects.
    pub(crate) fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }

    /// Namespace qualifier for the output subpath: separators become dots.
    pub(crate) fn namespace_suffix(&self) -> String {
        self.output_subpath
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join(".")
    }
}
