//! Core types shared by discovery, generation and reporting.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::LoczConfig;

/// A project rooted at a marker file such as `App/App.csproj`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Path of the marker file.
    pub path: PathBuf,
}

impl Project {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Marker file stem: `App` for `App/App.csproj`.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory holding the marker file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Where generated files for this project go.
    pub fn output_dir(&self, config: &LoczConfig) -> PathBuf {
        self.dir().join(&config.output_subpath)
    }

    /// Namespace of generated code: project name qualified by the output subpath.
    pub fn namespace(&self, config: &LoczConfig) -> String {
        let suffix = config.namespace_suffix();
        if suffix.is_empty() {
            self.name()
        } else {
            format!("{}.{}", self.name(), suffix)
        }
    }
}

/// A `*.loc.csv` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationTable {
    pub path: PathBuf,
}

impl TranslationTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name with the table suffix removed, ignoring case:
    /// `Strings.Loc.Csv` becomes `Strings`.
    pub fn resource_name(&self, config: &LoczConfig) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        strip_suffix_ignore_case(&file_name, &config.table_suffix)
            .unwrap_or(&file_name)
            .to_string()
    }

    /// Path of the generated key enumeration in `output_dir`.
    pub fn enum_path(&self, output_dir: &Path, config: &LoczConfig) -> PathBuf {
        output_dir.join(format!(
            "{}.{}",
            self.resource_name(config),
            config.enum_extension
        ))
    }
}

/// Returns `name` without `suffix` if it ends with it, compared ASCII case-insensitively.
pub(crate) fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// One key/value pair of a resource document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub key: String,
    pub value: String,
}

/// A project and the tables it owns, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectTables {
    pub project: Project,
    pub tables: Vec<TranslationTable>,
}

/// What happened to one table during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Enumeration and resource documents were rewritten.
    Generated { languages: usize, keys: usize },
    /// The enumeration is newer than the table; nothing was written.
    UpToDate,
    /// Generation was aborted for this table.
    Failed { reason: String },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    pub project: PathBuf,
    pub namespace: String,
    pub output_dir: PathBuf,
    pub tables: Vec<TableReport>,
    /// True if the accessor module was written during this run.
    pub accessor_created: bool,
    /// Set when the project could not be processed (output directory or accessor module).
    pub error: Option<String>,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub projects: Vec<ProjectReport>,
}

impl RunReport {
    /// True if any table or project failed.
    pub fn has_failures(&self) -> bool {
        self.projects
            .iter()
            .any(|p| p.error.is_some() || p.tables.iter().any(|t| t.outcome.is_failed()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableReport> {
        self.projects.iter().flat_map(|p| p.tables.iter())
    }

    pub fn generated_count(&self) -> usize {
        self.tables()
            .filter(|t| matches!(t.outcome, Outcome::Generated { .. }))
            .count()
    }

    pub fn up_to_date_count(&self) -> usize {
        self.tables()
            .filter(|t| t.outcome == Outcome::UpToDate)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.tables().filter(|t| t.outcome.is_failed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_derivations() {
        let config = LoczConfig::default();
        let project = Project::new("/src/App/App.csproj");
        assert_eq!(project.name(), "App");
        assert_eq!(project.dir(), Path::new("/src/App"));
        assert_eq!(project.output_dir(&config), PathBuf::from("/src/App/Locz"));
        assert_eq!(project.namespace(&config), "App.Locz");
    }

    #[test]
    fn test_project_namespace_with_nested_subpath() {
        let config = LoczConfig::new().with_output_subpath("Resources/Generated");
        let project = Project::new("/src/My.App/My.App.csproj");
        assert_eq!(project.namespace(&config), "My.App.Resources.Generated");
        assert_eq!(
            project.output_dir(&config),
            PathBuf::from("/src/My.App/Resources/Generated")
        );
    }

    #[test]
    fn test_project_namespace_without_subpath() {
        let config = LoczConfig::new().with_output_subpath("");
        assert_eq!(Project::new("/App/App.csproj").namespace(&config), "App");
    }

    #[test]
    fn test_resource_name_strips_suffix_any_case() {
        let config = LoczConfig::default();
        for name in [
            "Strings.loc.csv",
            "Strings.Loc.Csv",
            "Strings.LOC.CSV",
            "Strings.loc.Csv",
        ] {
            let table = TranslationTable::new(format!("/App/{name}"));
            assert_eq!(table.resource_name(&config), "Strings", "{name}");
        }
    }

    #[test]
    fn test_resource_name_keeps_inner_dots() {
        let config = LoczConfig::default();
        let table = TranslationTable::new("/App/Errors.Validation.loc.csv");
        assert_eq!(table.resource_name(&config), "Errors.Validation");
    }

    #[test]
    fn test_enum_path() {
        let config = LoczConfig::default();
        let table = TranslationTable::new("/App/Sub/Strings.loc.csv");
        assert_eq!(
            table.enum_path(Path::new("/App/Locz"), &config),
            PathBuf::from("/App/Locz/Strings.cs")
        );
    }

    #[test]
    fn test_strip_suffix_ignore_case() {
        let strip = strip_suffix_ignore_case;
        assert_eq!(strip("a.LOC.csv", ".loc.csv"), Some("a"));
        assert_eq!(strip("a.csv", ".loc.csv"), None);
        assert_eq!(strip("é.loc.csv", ".loc.csv"), Some("é"));
        assert_eq!(strip("éa", "a"), Some("é"));
        assert_eq!(strip("éa", "xa"), None);
    }

    #[test]
    fn test_run_report_counts() {
        let report = RunReport {
            root: PathBuf::from("/"),
            projects: vec![ProjectReport {
                project: PathBuf::from("/App/App.csproj"),
                tables: vec![
                    TableReport {
                        table: PathBuf::from("/App/a.loc.csv"),
                        outcome: Outcome::Generated {
                            languages: 2,
                            keys: 3,
                        },
                    },
                    TableReport {
                        table: PathBuf::from("/App/b.loc.csv"),
                        outcome: Outcome::UpToDate,
                    },
                    TableReport {
                        table: PathBuf::from("/App/c.loc.csv"),
                        outcome: Outcome::Failed {
                            reason: "boom".to_string(),
                        },
                    },
                ],
                ..ProjectReport::default()
            }],
        };
        assert_eq!(report.generated_count(), 1);
        assert_eq!(report.up_to_date_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let report = TableReport {
            table: PathBuf::from("a.loc.csv"),
            outcome: Outcome::Generated {
                languages: 2,
                keys: 5,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "generated");
        assert_eq!(json["keys"], 5);
        assert_eq!(json["table"], "a.loc.csv");
    }
}
