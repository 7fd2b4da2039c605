//! All error types for the locz crate.
//!
//! Table-level variants (`UnreadableSource`, `EmptySource`, `InvalidHeader`,
//! `MalformedRow`, `WriteFailure`) abort one table only; the pipeline records
//! them and moves on.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    CsvParse(#[from] csv::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("cannot read `{}`: {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` has no rows", .0.display())]
    EmptySource(PathBuf),

    #[error(
        "`{}` line {line}: row has {found} fields but the header declares {expected}",
        path.display()
    )]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("invalid header in `{}`: {reason}", path.display())]
    InvalidHeader { path: PathBuf, reason: String },

    #[error("cannot write `{}`: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create directory `{}`: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl Error {
    /// Creates an `UnreadableSource` error for `path`.
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::UnreadableSource {
            path: path.into(),
            source,
        }
    }

    /// Creates a `WriteFailure` error for `path`.
    pub fn write_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::WriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Creates an `InvalidConfig` error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}
