//! Filter revision tracking.
//!
//! A revision is stored next to the compiled filter as
//! `{"version": "1.0.0.3", "timeUpdated": 1700000000000}` and bumped on every
//! build.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::builder::write_atomic;
use crate::error::{Error, Result};

/// Dotted four-segment version, ordered segment by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version([u64; 4]);

impl Version {
    /// Version of the first build of a filter.
    pub const BASELINE: Version = Version([1, 0, 0, 0]);

    /// Create a version from its segments.
    pub fn new(major: u64, minor: u64, build: u64, revision: u64) -> Self {
        Version([major, minor, build, revision])
    }

    /// Parse a dotted version; missing trailing segments are zero.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            return Err(Error::InvalidVersion(s.to_string()));
        }

        let mut segments = [0u64; 4];
        for (segment, part) in segments.iter_mut().zip(&parts) {
            *segment = part
                .parse()
                .map_err(|_| Error::InvalidVersion(s.to_string()))?;
        }
        Ok(Version(segments))
    }

    /// Next version: the last segment incremented.
    ///
    /// An overflowing segment wraps to zero and carries into the one before
    /// it. The all-`u64::MAX` version has no successor and is returned as is.
    pub fn next(&self) -> Self {
        let mut segments = self.0;
        for segment in segments.iter_mut().rev() {
            match segment.checked_add(1) {
                Some(value) => {
                    *segment = value;
                    return Version(segments);
                }
                None => *segment = 0,
            }
        }
        log::warn!("Version {} has no successor", self);
        *self
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, build, revision] = self.0;
        write!(f, "{}.{}.{}.{}", major, minor, build, revision)
    }
}

mod version_serde {
    use super::Version;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(version: &Version, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&version.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Version, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(de::Error::custom)
    }
}

/// Version and build time of one compiled filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    #[serde(with = "version_serde")]
    pub version: Version,
    /// Build time in milliseconds since the Unix epoch
    #[serde(rename = "timeUpdated")]
    pub time_updated: i64,
}

impl Revision {
    /// Revision of the first build.
    pub fn baseline(time_updated: i64) -> Self {
        Self {
            version: Version::BASELINE,
            time_updated,
        }
    }

    /// Revision following `previous`, or the baseline for a first build.
    ///
    /// The timestamp always moves forward, even if the clock did not.
    pub fn next(previous: Option<&Revision>, now_millis: i64) -> Self {
        match previous {
            Some(prev) => Self {
                version: prev.version.next(),
                time_updated: now_millis.max(prev.time_updated.saturating_add(1)),
            },
            None => Self::baseline(now_millis),
        }
    }

    /// Current time in milliseconds since the Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Load a revision file.
    ///
    /// Returns `None` if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let revision: Self = serde_json::from_str(&content)?;
        Ok(Some(revision))
    }

    /// Save the revision to a file through an atomic rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path.as_ref(), &content)
    }
}
