use anyhow::Context;
use chrono::{DateTime, Local};
use slog_scope::{debug, info};
use std::path::{Path, PathBuf};

use crate::StdResult;
use crate::utils::file_utils;

/// Sortable date-time used to name the directory of each run.
///
/// Two runs started within the same second share their archive directory.
pub const RUN_DIRECTORY_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Files moved by an archive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Timestamped directory that received the byproducts
    pub directory: PathBuf,

    /// Archived files, at their new location
    pub archived_files: Vec<PathBuf>,
}

/// Relocate checker byproducts out of the working directory after a run.
pub struct ArtifactArchiver {
    output_root: PathBuf,
    extension: String,
}

impl ArtifactArchiver {
    /// [ArtifactArchiver] factory, `extension` is given without its leading dot (ie: `cnf`).
    pub fn new<T: Into<String>>(output_root: &Path, extension: T) -> Self {
        Self {
            output_root: output_root.to_path_buf(),
            extension: extension.into(),
        }
    }

    /// Path of the directory receiving the byproducts of a run started at the given time.
    pub fn run_directory(&self, run_time: DateTime<Local>) -> PathBuf {
        self.output_root
            .join(run_time.format(RUN_DIRECTORY_FORMAT).to_string())
    }

    fn list_byproducts(&self, work_dir: &Path) -> StdResult<Vec<PathBuf>> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&work_dir.to_string_lossy()),
            glob::Pattern::escape(&self.extension)
        );
        let mut byproducts = vec![];
        for entry in glob::glob(&pattern)
            .with_context(|| format!("Invalid byproduct pattern `{pattern}`"))?
        {
            let path = entry.with_context(|| "Failed to list byproduct files")?;
            if path.is_file() {
                byproducts.push(path);
            }
        }

        Ok(byproducts)
    }

    /// Move every byproduct of the working directory into a new timestamped directory.
    pub async fn archive(
        &self,
        work_dir: &Path,
        run_time: DateTime<Local>,
    ) -> StdResult<ArchiveSummary> {
        let directory = self.run_directory(run_time);
        tokio::fs::create_dir_all(&directory)
            .await
            .with_context(|| {
                format!(
                    "Failed to create archive directory `{}`",
                    directory.display()
                )
            })?;

        let mut archived_files = vec![];
        for byproduct in self.list_byproducts(work_dir)? {
            let Some(file_name) = byproduct.file_name() else {
                continue;
            };
            let target = directory.join(file_name);
            debug!("Archiving byproduct"; "source" => %byproduct.display(), "target" => %target.display());
            file_utils::move_file(&byproduct, &target).await?;
            archived_files.push(target);
        }

        info!("Archived {} byproduct(s)", archived_files.len(); "directory" => %directory.display());

        Ok(ArchiveSummary {
            directory,
            archived_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use std::fs;

    use crate::test_tools::TempDir;

    use super::*;

    fn run_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 17, 9, 5, 3).unwrap()
    }

    #[test]
    fn run_directory_is_a_sortable_timestamp() {
        let archiver = ArtifactArchiver::new(Path::new("/work/outputs"), "cnf");

        assert_eq!(
            PathBuf::from("/work/outputs/20261017_090503"),
            archiver.run_directory(run_time())
        );
    }

    #[tokio::test]
    async fn only_matching_byproducts_are_moved() {
        let work_dir = TempDir::create("archiver", "only_matching_byproducts_are_moved");
        fs::write(work_dir.join("miter.cnf"), "p cnf 2 1").unwrap();
        fs::write(work_dir.join("other.cnf"), "p cnf 1 1").unwrap();
        fs::write(work_dir.join("stdcell.v"), "module AND2;").unwrap();
        fs::create_dir(work_dir.join("dir.cnf")).unwrap();
        let archiver = ArtifactArchiver::new(&work_dir.join("outputs"), "cnf");

        let summary = archiver.archive(&work_dir, run_time()).await.unwrap();

        let expected_directory = work_dir.join("outputs").join("20261017_090503");
        assert_eq!(expected_directory, summary.directory);
        assert_eq!(
            vec![
                expected_directory.join("miter.cnf"),
                expected_directory.join("other.cnf")
            ],
            summary.archived_files
        );
        assert!(!work_dir.join("miter.cnf").exists());
        assert!(work_dir.join("stdcell.v").exists());
        assert!(work_dir.join("dir.cnf").is_dir());
        assert_eq!(
            "p cnf 2 1",
            fs::read_to_string(expected_directory.join("miter.cnf")).unwrap()
        );
    }

    #[tokio::test]
    async fn archive_without_byproduct_creates_an_empty_directory() {
        let work_dir = TempDir::create("archiver", "archive_without_byproduct_creates_an_empty_directory");
        let archiver = ArtifactArchiver::new(&work_dir.join("outputs"), "cnf");

        let summary = archiver.archive(&work_dir, run_time()).await.unwrap();

        assert!(summary.directory.is_dir());
        assert!(summary.archived_files.is_empty());
    }

    #[tokio::test]
    async fn distinct_runs_use_distinct_directories() {
        let work_dir = TempDir::create("archiver", "distinct_runs_use_distinct_directories");
        let archiver = ArtifactArchiver::new(&work_dir.join("outputs"), "cnf");
        fs::write(work_dir.join("first.cnf"), "1").unwrap();
        let first = archiver.archive(&work_dir, run_time()).await.unwrap();
        fs::write(work_dir.join("first.cnf"), "2").unwrap();

        let second = archiver
            .archive(&work_dir, run_time() + chrono::Duration::seconds(1))
            .await
            .unwrap();

        assert_ne!(first.directory, second.directory);
        assert_eq!("1", fs::read_to_string(first.directory.join("first.cnf")).unwrap());
        assert_eq!("2", fs::read_to_string(second.directory.join("first.cnf")).unwrap());
    }
}
