//! Line splitting shared by templates, included resources and exclusion lists.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

/// Split content into logical lines on any run of CR/LF characters.
///
/// Runs of blank lines collapse, so no empty entries are produced. A UTF-8
/// byte order mark at the start of the content is dropped.
pub fn split_lines(content: &str) -> Vec<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    LINE_BREAKS
        .split(content)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether a line is a `!` comment.
pub fn is_comment(line: &str) -> bool {
    line.starts_with('!')
}
