//! `@include` directive parsing and resolution.
//!
//! Syntax: `@include <url-or-path> [/stripComments] [/exclude="<name>"]`
//!
//! Included content is not re-expanded: `@include` lines inside an included
//! resource are plain rule text.

use crate::context::FilterContext;
use crate::converter::{self, Conversion};
use crate::exclusion;
use crate::lines::{is_comment, split_lines};

/// Directive prefix recognized in templates.
pub const INCLUDE_PREFIX: &str = "@include";

const STRIP_COMMENTS_OPTION: &str = "/stripComments";
const EXCLUDE_OPTION: &str = "/exclude=";

/// A parsed `@include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Local path (relative to the filter directory) or remote URL
    pub url: String,
    /// Drop `!` comment lines from the included content
    pub strip_comments: bool,
    /// Exclusion resource applied to the included content
    pub exclude: Option<String>,
}

impl IncludeDirective {
    /// Check if a template line is an include directive.
    pub fn is_directive(line: &str) -> bool {
        directive_args(line.trim()).is_some()
    }

    /// Parse a directive line, `None` if it is not a directive or has no URL.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = directive_args(line.trim())?.trim_start();

        let (url, options) = split_first_token(rest);
        if url.is_empty() {
            return None;
        }

        let mut directive = IncludeDirective {
            url: url.to_string(),
            strip_comments: false,
            exclude: None,
        };

        for option in options.split_whitespace() {
            if option == STRIP_COMMENTS_OPTION {
                directive.strip_comments = true;
            } else if let Some(name) = option.strip_prefix(EXCLUDE_OPTION) {
                let name = unquote(name);
                if !name.is_empty() {
                    directive.exclude = Some(name.to_string());
                }
            } else {
                log::warn!("Unknown @include option {} in: {}", option, line);
            }
        }

        Some(directive)
    }
}

/// Text after the `@include` keyword, which must end at whitespace or end of line.
fn directive_args(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(INCLUDE_PREFIX)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Split off the first token, honoring double quotes.
fn split_first_token(s: &str) -> (&str, &str) {
    if let Some(quoted) = s.strip_prefix('"') {
        return match quoted.find('"') {
            Some(end) => (&quoted[..end], &quoted[end + 1..]),
            None => (quoted, ""),
        };
    }
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

/// Expand one `@include` directive line.
///
/// Returns an empty conversion if the directive is malformed or its target
/// cannot be read.
pub fn resolve(line: &str, ctx: &FilterContext) -> Conversion {
    let Some(directive) = IncludeDirective::parse(line) else {
        log::warn!("Invalid @include directive: {}", line);
        return Conversion::default();
    };

    let Some(content) = ctx.load(&directive.url) else {
        log::warn!("Included resource {} contributes no rules", directive.url);
        return Conversion::default();
    };

    let mut lines: Vec<String> = split_lines(&content)
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(name) = &directive.exclude {
        lines = exclusion::exclude(lines, name, ctx);
    }

    if directive.strip_comments {
        lines.retain(|line| !is_comment(line));
    }

    log::info!("Included {} lines from {}", lines.len(), directive.url);
    converter::convert(lines.as_slice())
}
