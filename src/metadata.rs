//! Filter metadata (`metadata.json`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Update frequency of a filter, as text (`"4 days"`) or a number.
///
/// Numbers are kept as written and printed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expires {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expires::Number(number) => write!(f, "{}", number),
            Expires::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Descriptive metadata of a filter. Never written by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMetadata {
    pub name: String,
    pub description: String,
    pub expires: Expires,
}

impl FilterMetadata {
    /// Load metadata from a file.
    ///
    /// Both a missing and a malformed file are errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingMetadata(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| Error::InvalidMetadata {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_metadata_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"name": "Base filter", "description": "Blocks ads", "expires": "4 days"}"#,
        )
        .unwrap();

        let meta = FilterMetadata::load(&path).unwrap();
        assert_eq!(meta.name, "Base filter");
        assert_eq!(meta.description, "Blocks ads");
        assert_eq!(meta.expires, Expires::Text("4 days".to_string()));
    }

    #[test]
    fn test_metadata_numeric_expires() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, r#"{"name": "n", "description": "d", "expires": 2}"#).unwrap();

        let meta = FilterMetadata::load(&path).unwrap();
        assert_eq!(meta.expires, Expires::Number(serde_json::Number::from(2u64)));
        assert_eq!(meta.expires.to_string(), "2");
    }

    #[test]
    fn test_metadata_fractional_and_negative_expires() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        fs::write(&path, r#"{"name": "n", "description": "d", "expires": 1.5}"#).unwrap();
        let meta = FilterMetadata::load(&path).unwrap();
        assert_eq!(meta.expires.to_string(), "1.5");

        fs::write(&path, r#"{"name": "n", "description": "d", "expires": -1}"#).unwrap();
        let meta = FilterMetadata::load(&path).unwrap();
        assert_eq!(meta.expires.to_string(), "-1");
    }

    #[test]
    fn test_metadata_missing_file() {
        let result = FilterMetadata::load("/nonexistent/metadata.json");
        assert!(matches!(result, Err(Error::MissingMetadata(_))));
    }

    #[test]
    fn test_metadata_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, r#"{"name": "missing fields"}"#).unwrap();

        let result = FilterMetadata::load(&path);
        assert!(matches!(result, Err(Error::InvalidMetadata { .. })));
    }
}
