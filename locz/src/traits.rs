//! Shared behaviour of generated files.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    fs::FileSystem,
};

/// A generated file: knows its name and how to serialise itself.
///
/// # Example
///
/// ```rust
/// use locz::{artifacts::EnumDocument, traits::Artifact};
///
/// let mut doc = EnumDocument::new("App.Locz", "Strings", "cs");
/// doc.push_key("Hello");
/// let text = String::from_utf8(doc.to_bytes()?).unwrap();
/// assert!(text.contains("    Hello,"));
/// assert_eq!(doc.file_name(), "Strings.cs");
/// # Ok::<(), locz::Error>(())
/// ```
pub trait Artifact {
    /// File name inside the output directory.
    fn file_name(&self) -> String;

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<()>;

    /// Serialise into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;
        Ok(buf)
    }

    /// Write into `dir` through `fs`, replacing any existing file.
    fn write_to<F: FileSystem + ?Sized>(&self, fs: &F, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        let bytes = self.to_bytes()?;
        fs.write(&path, &bytes)
            .map_err(|e| Error::write_failure(&path, e))?;
        Ok(path)
    }
}
