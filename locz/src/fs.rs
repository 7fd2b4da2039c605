//! File-system capability used by every stage of the pipeline.
//!
//! [`RealFileSystem`] talks to the disk; [`MemoryFileSystem`] keeps files in a
//! map with a logical clock so tests can control modification times.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, BTreeSet},
    fs::{self, File},
    io::{self, BufReader, Cursor, Read},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use ignore::WalkBuilder;
use tracing::warn;

/// File access needed by discovery, the freshness check and the generator.
pub trait FileSystem {
    /// Every regular file under `root`, at any depth, in a deterministic order.
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Opens `path` for reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Creates or fully replaces the file at `path`.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Last modification time of `path`.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Creates `path` and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).walk_files(root)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).modified(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("`{}` is not a directory", root.display()),
            ));
        }

        // Generated trees are often gitignored; tables must still be found.
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for dent in walker {
            let dent = match dent {
                Ok(d) => d,
                Err(e) => {
                    warn!("skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if dent.file_type().is_some_and(|t| t.is_file()) {
                files.push(dent.into_path());
            }
        }
        Ok(files)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    contents: Vec<u8>,
    modified: SystemTime,
}

/// In-memory file system.
///
/// Every write advances a logical clock by one second, so a file written after
/// another is always strictly newer. Directories are tracked only so that
/// `create_dir_all` calls can be observed.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, MemoryFile>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    clock: Cell<u64>,
    read_only: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file, stamping it with the next clock tick.
    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let modified = self.tick();
        self.files.borrow_mut().insert(
            path.into(),
            MemoryFile {
                contents: contents.into(),
                modified,
            },
        );
    }

    /// Moves the modification time of `path` to the next clock tick.
    pub fn touch(&self, path: &Path) -> io::Result<()> {
        let modified = self.tick();
        let mut files = self.files.borrow_mut();
        let file = files.get_mut(path).ok_or_else(|| not_found(path))?;
        file.modified = modified;
        Ok(())
    }

    /// Sets the modification time of `path` explicitly.
    pub fn set_modified(&self, path: &Path, modified: SystemTime) -> io::Result<()> {
        let mut files = self.files.borrow_mut();
        let file = files.get_mut(path).ok_or_else(|| not_found(path))?;
        file.modified = modified;
        Ok(())
    }

    /// Makes every later write to `path` fail with `PermissionDenied`.
    pub fn deny_writes(&self, path: impl Into<PathBuf>) {
        self.read_only.borrow_mut().insert(path.into());
    }

    /// Contents of `path` as UTF-8, if present.
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|f| String::from_utf8_lossy(&f.contents).into_owned())
    }

    /// Returns true if `create_dir_all` was called for `path` or a descendant.
    pub fn dir_exists(&self, path: &Path) -> bool {
        self.dirs.borrow().iter().any(|d| d.starts_with(path))
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    fn tick(&self) -> SystemTime {
        let now = self.clock.get() + 1;
        self.clock.set(now);
        SystemTime::UNIX_EPOCH + Duration::from_secs(now)
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("`{}` does not exist", path.display()),
    )
}

impl FileSystem for MemoryFileSystem {
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let files = self.files.borrow();
        let file = files.get(path).ok_or_else(|| not_found(path))?;
        Ok(Box::new(Cursor::new(file.contents.clone())))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.read_only.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("`{}` is read-only", path.display()),
            ));
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.files
            .borrow()
            .get(path)
            .map(|f| f.modified)
            .ok_or_else(|| not_found(path))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.read_only.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("`{}` is read-only", path.display()),
            ));
        }
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }
}
