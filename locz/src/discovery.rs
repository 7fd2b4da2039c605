//! Finding projects and the translation tables they own.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, info, warn};

use crate::{
    config::LoczConfig,
    error::Result,
    fs::FileSystem,
    types::{Project, ProjectTables, TranslationTable},
};

/// Builds a case-insensitive matcher for file names ending in `suffix`.
///
/// The suffix is literal: glob characters in it only match themselves.
fn suffix_matcher(suffix: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(&format!("*{}", globset::escape(suffix)))
        .case_insensitive(true)
        .literal_separator(true)
        .build()?;
    Ok(glob.compile_matcher())
}

fn name_matches(matcher: &GlobMatcher, path: &Path) -> bool {
    path.file_name().is_some_and(|name| matcher.is_match(name))
}

fn find_matching<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    matcher: &GlobMatcher,
) -> Result<Vec<PathBuf>> {
    let mut files = fs.walk_files(root)?;
    files.retain(|path| name_matches(matcher, path));
    Ok(files)
}

/// Every project marker under `root`, at any depth, in walk order.
pub fn find_projects<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    config: &LoczConfig,
) -> Result<Vec<PathBuf>> {
    find_matching(fs, root, &suffix_matcher(&config.project_suffix)?)
}

/// Every translation table under `project_dir`, at any depth, in walk order.
pub fn find_tables<F: FileSystem + ?Sized>(
    fs: &F,
    project_dir: &Path,
    config: &LoczConfig,
) -> Result<Vec<PathBuf>> {
    find_matching(fs, project_dir, &suffix_matcher(&config.table_suffix)?)
}

/// Pairs every project under `root` with the tables it owns.
///
/// The tree is walked once. A table belongs to the project whose directory is
/// its nearest ancestor; when several markers share that directory, the first
/// one in walk order wins. Projects that end up with no tables are left out.
pub fn discover<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    config: &LoczConfig,
) -> Result<Vec<ProjectTables>> {
    let project_matcher = suffix_matcher(&config.project_suffix)?;
    let table_matcher = suffix_matcher(&config.table_suffix)?;

    let mut markers = Vec::new();
    let mut table_paths = Vec::new();
    for path in fs.walk_files(root)? {
        let is_table = name_matches(&table_matcher, &path);
        if name_matches(&project_matcher, &path) {
            markers.push(path.clone());
        }
        if is_table {
            table_paths.push(path);
        }
    }

    if markers.is_empty() {
        info!(
            "No {} files found in the directory: {}",
            config.project_suffix,
            root.display()
        );
        return Ok(Vec::new());
    }

    let projects: Vec<Project> = markers.into_iter().map(Project::new).collect();
    let mut owned: Vec<Vec<TranslationTable>> = vec![Vec::new(); projects.len()];

    for table in table_paths {
        match owner_of(&table, &projects) {
            Some(index) => owned[index].push(TranslationTable::new(table)),
            None => debug!("{} is not inside any project", table.display()),
        }
    }

    let mut result = Vec::new();
    for (project, tables) in projects.into_iter().zip(owned) {
        let file_name = project
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if tables.is_empty() {
            info!("No translation tables found in project: {}", file_name);
            continue;
        }
        let shared_dir = result
            .iter()
            .any(|p: &ProjectTables| p.project.dir() == project.dir());
        if shared_dir {
            warn!(
                "{} shares its directory with another project marker",
                project.path.display()
            );
        }
        info!(
            "Found {} translation tables in project: {}",
            tables.len(),
            file_name
        );
        result.push(ProjectTables { project, tables });
    }
    Ok(result)
}

/// Index of the project owning `table`: deepest ancestor directory, first on ties.
fn owner_of(table: &Path, projects: &[Project]) -> Option<usize> {
    let table_dir = table.parent()?;
    let mut best: Option<(usize, usize)> = None;
    for (index, project) in projects.iter().enumerate() {
        let dir = project.dir();
        if !table_dir.starts_with(dir) {
            continue;
        }
        let depth = dir.components().count();
        if best.is_none_or(|(_, best_depth)| depth > best_depth) {
            best = Some((index, depth));
        }
    }
    best.map(|(index, _)| index)
}
