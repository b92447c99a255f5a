//! Building the compiled filter of one filter directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::blacklist::DomainBlacklist;
use crate::compiler::{CompileStats, Compiler};
use crate::config::BuildConfig;
use crate::context::FilterContext;
use crate::error::{Error, Result};
use crate::header::build_header;
use crate::metadata::FilterMetadata;
use crate::revision::Revision;
use crate::source::SourceLoader;

/// Line separator of compiled filters.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Summary of one successful directory build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Filter directory
    pub dir: PathBuf,
    /// Revision written for this build
    pub revision: Revision,
    /// Number of body lines in the compiled filter
    pub rule_count: usize,
    /// Number of rules rewritten from `:style()` syntax
    pub converted: usize,
    pub stats: CompileStats,
}

/// Builds filter directories.
///
/// # Example
///
/// ```ignore
/// use filtergen::{BuildConfig, FilterBuilder};
/// use std::path::Path;
///
/// let builder = FilterBuilder::from_config(BuildConfig::default())?;
/// let report = builder.build(Path::new("filters/base"))?;
/// println!("version {}", report.revision.version);
/// ```
pub struct FilterBuilder {
    config: BuildConfig,
    loader: SourceLoader,
    blacklist: DomainBlacklist,
}

impl FilterBuilder {
    /// Create a builder with an already loaded blacklist.
    pub fn new(config: BuildConfig, blacklist: DomainBlacklist) -> Self {
        let loader = match config.fetch_timeout() {
            Some(timeout) => SourceLoader::with_timeout(timeout),
            None => SourceLoader::new(),
        };
        Self {
            config,
            loader,
            blacklist,
        }
    }

    /// Create a builder, loading the blacklist named by the configuration.
    pub fn from_config(config: BuildConfig) -> Result<Self> {
        let blacklist = match &config.blacklist {
            Some(path) => {
                let blacklist = DomainBlacklist::load(path)?;
                log::info!(
                    "Loaded {} blacklisted domains from {}",
                    blacklist.len(),
                    path.display()
                );
                blacklist
            }
            None => DomainBlacklist::new(),
        };
        Ok(Self::new(config, blacklist))
    }

    /// Configuration used by this builder.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build one filter directory.
    ///
    /// A missing template or missing/malformed metadata aborts the build
    /// before anything is written.
    pub fn build(&self, dir: &Path) -> Result<BuildReport> {
        let files = &self.config.files;
        log::info!("Building filter {}", dir.display());

        let template = read_template(&dir.join(&files.template))?;
        let metadata = FilterMetadata::load(dir.join(&files.metadata))?;

        let revision_path = dir.join(&files.revision);
        let previous = Revision::load(&revision_path).unwrap_or_else(|e| {
            log::warn!(
                "Cannot read {}, starting from the baseline version: {}",
                revision_path.display(),
                e
            );
            None
        });
        let revision = Revision::next(previous.as_ref(), Revision::now_millis());

        let ctx = FilterContext::new(dir, self.loader.clone());
        let output = Compiler::new(&ctx, &self.blacklist)
            .with_exclusions(files.exclusions.as_str())
            .compile(&template);

        let rule_count = output.rules.len();
        let mut lines = build_header(&metadata, &revision);
        lines.extend(output.rules);

        write_atomic(&dir.join(&files.filter), &lines.join(LINE_SEPARATOR))?;
        revision.save(&revision_path)?;

        log::info!(
            "Built {} version {} with {} rules",
            dir.display(),
            revision.version,
            rule_count
        );

        Ok(BuildReport {
            dir: dir.to_path_buf(),
            revision,
            rule_count,
            converted: output.annotations.len(),
            stats: output.stats,
        })
    }
}

fn read_template(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::MissingTemplate(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write a file through a temporary file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
