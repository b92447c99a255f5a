//! Build configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Resource names inside a filter directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    /// Template with rules and `@include` directives (required)
    pub template: String,
    /// Compiled output
    pub filter: String,
    /// Version and timestamp of the last build
    pub revision: String,
    /// Filter name, description and expiry (required)
    pub metadata: String,
    /// Exclusions applied to the whole compiled list (optional)
    pub exclusions: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            template: "template.txt".to_string(),
            filter: "filter.txt".to_string(),
            revision: "revision.json".to_string(),
            metadata: "metadata.json".to_string(),
            exclusions: "exclude.txt".to_string(),
        }
    }
}

/// Configuration shared by every filter directory of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Resource names inside each filter directory
    pub files: FileNames,
    /// Domain blacklist file; no blacklist filtering when unset
    pub blacklist: Option<PathBuf>,
    /// Build filter directories concurrently
    pub parallel: bool,
    /// Timeout for remote includes; requests never time out when unset
    pub fetch_timeout_secs: Option<u64>,
}

impl BuildConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Set the blacklist file.
    pub fn with_blacklist(mut self, path: impl Into<PathBuf>) -> Self {
        self.blacklist = Some(path.into());
        self
    }

    /// Enable or disable parallel directory builds.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Remote request timeout, if configured.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}
