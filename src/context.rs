//! Per-directory resolution context.

use std::path::PathBuf;

use crate::source::SourceLoader;

/// Context for resolving resources of one filter directory.
///
/// Every build owns its own context, so concurrent builds of different
/// directories never share a base directory.
#[derive(Clone)]
pub struct FilterContext {
    base_dir: PathBuf,
    loader: SourceLoader,
}

impl FilterContext {
    /// Create a context rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, loader: SourceLoader) -> Self {
        Self {
            base_dir: base_dir.into(),
            loader,
        }
    }

    /// Load a local or remote resource, `None` if unreadable.
    pub fn load(&self, location: &str) -> Option<String> {
        self.loader.load(location, &self.base_dir)
    }
}
