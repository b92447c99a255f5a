//! Compiled filter header.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::metadata::FilterMetadata;
use crate::revision::Revision;

/// Build the `!`-prefixed header of a compiled filter.
pub fn build_header(metadata: &FilterMetadata, revision: &Revision) -> Vec<String> {
    vec![
        format!("! Title: {}", metadata.name),
        format!("! Description: {}", metadata.description),
        format!("! Version: {}", revision.version),
        format!("! TimeUpdated: {}", format_time(revision.time_updated)),
        format!("! Expires: {} (update frequency)", metadata.expires),
    ]
}

/// Format epoch milliseconds as an ISO-8601 UTC timestamp.
pub fn format_time(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(time) => time.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}
