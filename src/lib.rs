//! filtergen - compiles block-list filters from templates.
//!
//! A filter directory holds a `template.txt` made of plain rules and
//! `@include` directives, a `metadata.json` describing the filter and,
//! optionally, an `exclude.txt` with rules to leave out. Building the
//! directory produces `filter.txt` and bumps the version in `revision.json`.
//!
//! # Features
//!
//! - **Includes**: local fragments and remote lists, with `/stripComments`
//!   and `/exclude="file"` options
//! - **Conversion**: legacy `:style()` rules and network options are
//!   rewritten to canonical syntax
//! - **Filtering**: exclusion lists (literal or `/regex/`), stable
//!   deduplication, validation and a domain blacklist
//! - **Batch builds**: every filter directory under a root, optionally in
//!   parallel
//!
//! # Quick Start
//!
//! ```ignore
//! use filtergen::{BatchDriver, BuildConfig, FilterBuilder};
//! use std::path::Path;
//!
//! let config = BuildConfig::default().with_blacklist("blacklist.txt");
//! let driver = BatchDriver::new(FilterBuilder::from_config(config)?);
//! let report = driver.run(Path::new("filters"))?;
//! assert!(report.is_success());
//! ```
//!
//! # Conversion
//!
//! ```
//! use filtergen::converter::convert;
//!
//! let result = convert(&["example.com##h1:style(color: blue)", "||ads.org^$xhr"]);
//! assert_eq!(result.rules[0], "example.com#$#h1 { color: blue }");
//! assert_eq!(result.rules[1], "||ads.org^$xmlhttprequest");
//! ```

mod error;
mod lines;

pub mod batch;
pub mod blacklist;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod context;
pub mod converter;
pub mod exclusion;
pub mod header;
pub mod include;
pub mod mask;
pub mod metadata;
pub mod revision;
pub mod sorter;
pub mod source;
pub mod validator;

// Re-export core types
pub use error::{Error, Result};
pub use lines::split_lines;
pub use mask::RuleMask;

// Re-export pipeline types
pub use batch::{BatchDriver, BatchReport};
pub use blacklist::DomainBlacklist;
pub use builder::{BuildReport, FilterBuilder};
pub use compiler::{CompileOutput, CompileStats, Compiler};
pub use config::{BuildConfig, FileNames};
pub use context::FilterContext;
pub use converter::{convert, Conversion};
pub use exclusion::{ExclusionEntry, ExclusionList};
pub use include::IncludeDirective;
pub use metadata::{Expires, FilterMetadata};
pub use revision::{Revision, Version};
pub use sorter::Sorter;
pub use source::SourceLoader;
pub use validator::Validator;
