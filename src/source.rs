//! Loading of rule resources from local files and remote URLs.
//!
//! This module provides `SourceLoader` which handles:
//! - Reading files relative to a filter directory
//! - Downloading remote resources (blocking)
//! - Gzip decompression of `.gz` payloads
//!
//! Failures are reported to the caller as errors; the compilation pipeline
//! turns them into "contributes nothing" with a warning.

use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

/// Loader for local and remote rule resources.
///
/// Cloning is cheap; clones share the underlying HTTP agent.
#[derive(Clone)]
pub struct SourceLoader {
    agent: ureq::Agent,
}

impl SourceLoader {
    /// Create a loader with no request timeout.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Create a loader that gives up on remote requests after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Whether a location refers to a remote resource.
    ///
    /// Anything with a scheme separator is remote; everything else is a path.
    pub fn is_remote(location: &str) -> bool {
        location.contains(':')
    }

    /// Resolve a local location against a base directory.
    pub fn resolve_path(location: &str, base_dir: &Path) -> PathBuf {
        base_dir.join(location)
    }

    /// Load a resource, returning `None` if it cannot be read.
    pub fn load(&self, location: &str, base_dir: &Path) -> Option<String> {
        let result = if Self::is_remote(location) {
            self.fetch(location)
        } else {
            self.read_local(&Self::resolve_path(location, base_dir))
        };

        match result {
            Ok(content) => Some(content),
            Err(e) => {
                log::warn!("Failed to load {}: {}", location, e);
                None
            }
        }
    }

    /// Read a local file.
    pub fn read_local(&self, path: &Path) -> Result<String> {
        let raw = fs::read(path)?;
        decode(raw)
    }

    /// Download a remote resource.
    pub fn fetch(&self, url: &str) -> Result<String> {
        log::info!("Downloading {}", url);

        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => Error::Download(format!("HTTP error {}: {}", code, url)),
            ureq::Error::Transport(t) => Error::Download(format!("Transport error: {}", t)),
        })?;

        let mut raw = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut raw)
            .map_err(|e| Error::Download(format!("Failed to read response: {}", e)))?;

        log::debug!("Downloaded {} bytes from {}", raw.len(), url);
        decode(raw)
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode raw bytes as text, decompressing gzip payloads.
fn decode(raw: Vec<u8>) -> Result<String> {
    let data = if is_gzip(&raw) {
        let mut decoder = GzDecoder::new(&raw[..]);
        let mut data = Vec::new();
        decoder.read_to_end(&mut data)?;
        data
    } else {
        raw
    };

    Ok(match String::from_utf8(data) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Check if data is gzip compressed.
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}
