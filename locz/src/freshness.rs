//! Timestamp-based staleness check.

use std::path::Path;

use tracing::debug;

use crate::{
    config::LoczConfig,
    error::{Error, Result},
    fs::FileSystem,
    types::TranslationTable,
};

/// Returns true if `table` must be regenerated into `output_dir`.
///
/// Only the enumeration document is compared: it is missing, or the table was
/// modified strictly after it. Resource documents are regenerated together
/// with the enumeration and are not checked on their own.
pub fn needs_regeneration<F: FileSystem + ?Sized>(
    fs: &F,
    table: &TranslationTable,
    output_dir: &Path,
    config: &LoczConfig,
) -> Result<bool> {
    let enum_path = table.enum_path(output_dir, config);
    if !fs.exists(&enum_path) {
        debug!("{} has not been generated yet", enum_path.display());
        return Ok(true);
    }

    let table_time = fs
        .modified(&table.path)
        .map_err(|e| Error::unreadable(&table.path, e))?;
    let output_time = fs.modified(&enum_path)?;
    Ok(table_time > output_time)
}
