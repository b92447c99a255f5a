//! Batch builds of every filter directory under a root.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::{BuildReport, FilterBuilder};
use crate::error::{Error, Result};

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Directories built successfully, in name order
    pub built: Vec<BuildReport>,
    /// Directories whose build failed, in name order
    pub failed: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    /// Whether every directory was built.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs a `FilterBuilder` over every immediate subdirectory of a root.
pub struct BatchDriver {
    builder: FilterBuilder,
}

impl BatchDriver {
    /// Create a driver.
    pub fn new(builder: FilterBuilder) -> Self {
        Self { builder }
    }

    /// List filter directories under `root`, sorted by name.
    pub fn filter_dirs(root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }
        let mut dirs = Vec::new();
        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Build every filter directory under `root`.
    ///
    /// A failed directory is recorded in the report and does not stop the
    /// others.
    pub fn run(&self, root: &Path) -> Result<BatchReport> {
        let dirs = Self::filter_dirs(root)?;
        log::info!(
            "Building {} filters in {}{}",
            dirs.len(),
            root.display(),
            if self.builder.config().parallel {
                " (parallel)"
            } else {
                ""
            }
        );

        let results: Vec<(PathBuf, Result<BuildReport>)> = if self.builder.config().parallel {
            dirs.into_par_iter()
                .map(|dir| {
                    let result = self.builder.build(&dir);
                    (dir, result)
                })
                .collect()
        } else {
            dirs.into_iter()
                .map(|dir| {
                    let result = self.builder.build(&dir);
                    (dir, result)
                })
                .collect()
        };

        let mut report = BatchReport::default();
        for (dir, result) in results {
            match result {
                Ok(build) => report.built.push(build),
                Err(e) => {
                    log::error!("Failed to build {}: {}", dir.display(), e);
                    report.failed.push((dir, e));
                }
            }
        }

        log::info!(
            "Batch finished: {} built, {} failed",
            report.built.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blacklist::DomainBlacklist;
    use crate::config::BuildConfig;
    use tempfile::tempdir;

    fn make_filter(root: &Path, name: &str, template: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("template.txt"), template).unwrap();
        fs::write(
            dir.join("metadata.json"),
            format!(r#"{{"name": "{}", "description": "d", "expires": 4}}"#, name),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_filter_dirs_sorted_and_dirs_only() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("b")).unwrap();
        fs::create_dir(root.path().join("a")).unwrap();
        fs::write(root.path().join("readme.txt"), "x").unwrap();

        let dirs = BatchDriver::filter_dirs(root.path()).unwrap();
        assert_eq!(dirs, vec![root.path().join("a"), root.path().join("b")]);
    }

    #[test]
    fn test_root_must_be_directory() {
        let root = tempdir().unwrap();
        let file = root.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            BatchDriver::filter_dirs(&file),
            Err(Error::NotADirectory(_))
        ));
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let root = tempdir().unwrap();
        make_filter(root.path(), "first", "||a.com^\n");
        fs::create_dir(root.path().join("second")).unwrap();
        make_filter(root.path(), "third", "||c.com^\n");

        for parallel in [false, true] {
            let config = BuildConfig::default().with_parallel(parallel);
            let driver = BatchDriver::new(FilterBuilder::new(config, DomainBlacklist::new()));
            let report = driver.run(root.path()).unwrap();

            assert!(!report.is_success());
            assert_eq!(report.built.len(), 2);
            assert_eq!(report.failed.len(), 1);
            assert_eq!(report.failed[0].0, root.path().join("second"));
            assert!(matches!(report.failed[0].1, Error::MissingTemplate(_)));
        }
    }
}
