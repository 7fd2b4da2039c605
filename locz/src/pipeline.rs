//! Runs discovery, the freshness check and generation over a whole tree.

use std::path::Path;

use tracing::{error, info, warn};

use crate::{
    config::LoczConfig,
    discovery::discover,
    error::{Error, Result},
    freshness::needs_regeneration,
    fs::{FileSystem, RealFileSystem},
    generator::Generator,
    types::{Outcome, ProjectReport, ProjectTables, RunReport, TableReport},
};

/// The generation pipeline bound to a file system and a configuration.
///
/// # Example
///
/// ```rust,no_run
/// use locz::{Locz, LoczConfig};
///
/// let report = Locz::with_config(LoczConfig::new().with_output_subpath("Resources"))
///     .run("src")?;
/// println!("{} tables regenerated", report.generated_count());
/// # Ok::<(), locz::Error>(())
/// ```
pub struct Locz<F: FileSystem> {
    fs: F,
    config: LoczConfig,
}

impl Locz<RealFileSystem> {
    /// Pipeline over the local disk.
    pub fn with_config(config: LoczConfig) -> Self {
        Self::new(RealFileSystem, config)
    }
}

impl<F: FileSystem> Locz<F> {
    pub fn new(fs: F, config: LoczConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &LoczConfig {
        &self.config
    }

    /// Processes every project under `root`.
    ///
    /// Table failures are recorded in the report and never stop other tables;
    /// a project whose output directory or accessor module cannot be written
    /// is recorded as failed and the next project is processed. Only an
    /// invalid configuration or an unwalkable root fails the run itself.
    pub fn run<P: AsRef<Path>>(&self, root: P) -> Result<RunReport> {
        let root = root.as_ref();
        self.config.validate()?;
        info!("Scanning for projects under {}", root.display());

        let projects = discover(&self.fs, root, &self.config)?;
        let mut report = RunReport {
            root: root.to_path_buf(),
            projects: Vec::with_capacity(projects.len()),
        };
        for project_tables in &projects {
            report.projects.push(self.process_project(project_tables));
        }
        Ok(report)
    }

    fn process_project(&self, project_tables: &ProjectTables) -> ProjectReport {
        let ProjectTables { project, tables } = project_tables;
        let output_dir = project.output_dir(&self.config);
        let namespace = project.namespace(&self.config);
        let mut report = ProjectReport {
            project: project.path.clone(),
            namespace: namespace.clone(),
            output_dir: output_dir.clone(),
            ..ProjectReport::default()
        };

        if let Err(e) = self.fs.create_dir_all(&output_dir) {
            let e = Error::DirectoryCreation {
                path: output_dir.clone(),
                source: e,
            };
            error!("{}", e);
            report.error = Some(e.to_string());
            return report;
        }

        let generator = Generator::new(&self.fs, &self.config);
        for table in tables {
            let outcome = match needs_regeneration(&self.fs, table, &output_dir, &self.config) {
                Ok(true) => generator.generate(table, &namespace, &output_dir),
                Ok(false) => {
                    info!("Skipping {} - up to date", table.path.display());
                    Ok(Outcome::UpToDate)
                }
                Err(e) => Err(e),
            };
            let outcome = outcome.unwrap_or_else(|e| {
                warn!("Failed to generate {}: {}", table.path.display(), e);
                Outcome::Failed {
                    reason: e.to_string(),
                }
            });
            report.tables.push(TableReport {
                table: table.path.clone(),
                outcome,
            });
        }

        match generator.ensure_accessor_module(&namespace, &output_dir) {
            Ok(created) => report.accessor_created = created,
            Err(e) => {
                error!("{}", e);
                report.error = Some(e.to_string());
            }
        }
        report
    }
}
