//! Exclusion lists.
//!
//! An exclusion resource holds one entry per line:
//! - `! text` is a comment
//! - `/pattern/` is a regular expression
//! - anything else is a literal substring
//!
//! A rule is dropped when it matches any entry.

use regex::Regex;

use crate::context::FilterContext;
use crate::lines::{is_comment, split_lines};

/// A single exclusion entry.
#[derive(Debug, Clone)]
pub enum ExclusionEntry {
    /// Excludes rules containing this text
    Literal(String),
    /// Excludes rules matching this pattern
    Pattern(Regex),
}

impl ExclusionEntry {
    /// Parse an entry, `None` for comments, blank lines and invalid patterns.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            return None;
        }

        if line.len() > 2 && line.starts_with('/') && line.ends_with('/') {
            let pattern = &line[1..line.len() - 1];
            return match Regex::new(pattern) {
                Ok(re) => Some(ExclusionEntry::Pattern(re)),
                Err(e) => {
                    log::warn!("Skipping invalid exclusion pattern {}: {}", line, e);
                    None
                }
            };
        }

        Some(ExclusionEntry::Literal(line.to_string()))
    }

    /// Check if a rule matches this entry.
    pub fn matches(&self, rule: &str) -> bool {
        match self {
            ExclusionEntry::Literal(text) => rule.contains(text.as_str()),
            ExclusionEntry::Pattern(re) => re.is_match(rule),
        }
    }
}

/// Parsed exclusion resource.
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    entries: Vec<ExclusionEntry>,
}

impl ExclusionList {
    /// Parse an exclusion resource.
    pub fn parse(content: &str) -> Self {
        Self {
            entries: split_lines(content)
                .into_iter()
                .filter_map(ExclusionEntry::parse)
                .collect(),
        }
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no active entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a rule is excluded.
    pub fn is_excluded(&self, rule: &str) -> bool {
        self.entries.iter().any(|entry| entry.matches(rule))
    }

    /// Remove excluded rules, keeping the order of the rest.
    pub fn apply(&self, lines: Vec<String>) -> Vec<String> {
        if self.is_empty() {
            return lines;
        }
        lines
            .into_iter()
            .filter(|line| !self.is_excluded(line))
            .collect()
    }
}

/// Apply the named exclusion resource of a filter directory.
///
/// An unreadable resource leaves the lines unchanged.
pub fn exclude(lines: Vec<String>, name: &str, ctx: &FilterContext) -> Vec<String> {
    let Some(content) = ctx.load(name) else {
        return lines;
    };

    let list = ExclusionList::parse(&content);
    let before = lines.len();
    let kept = list.apply(lines);
    log::info!(
        "Excluded {} rules using {} ({} entries)",
        before - kept.len(),
        name,
        list.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceLoader;
    use std::fs;
    use tempfile::tempdir;

    fn rules(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_entries() {
        assert!(ExclusionEntry::parse("! comment").is_none());
        assert!(ExclusionEntry::parse("   ").is_none());
        assert!(matches!(
            ExclusionEntry::parse("ads.com"),
            Some(ExclusionEntry::Literal(ref s)) if s == "ads.com"
        ));
        assert!(matches!(
            ExclusionEntry::parse("/^\\|\\|ads/"),
            Some(ExclusionEntry::Pattern(_))
        ));
    }

    #[test]
    fn test_pattern_strips_exactly_one_slash() {
        let entry = ExclusionEntry::parse("/ads$/").unwrap();
        assert!(entry.matches("||example.com/ads"));
        assert!(!entry.matches("||example.com/ad"));
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        assert!(ExclusionEntry::parse("/(unclosed/").is_none());
    }

    #[test]
    fn test_apply_literal_and_pattern() {
        let list = ExclusionList::parse("! exclusions\nbanner\n/^\\|\\|tracker\\./\n");
        assert_eq!(list.len(), 2);

        let kept = list.apply(rules(&[
            "||ads.com^",
            "example.com##.banner",
            "||tracker.net^",
            "||cdn.tracker.net^",
        ]));
        assert_eq!(kept, rules(&["||ads.com^", "||cdn.tracker.net^"]));
    }

    #[test]
    fn test_apply_idempotent() {
        let list = ExclusionList::parse("ads\n/^##/");
        let input = rules(&["||ads.com^", "##.x", "||ok.com^", "ok.com##.y"]);
        let once = list.apply(input);
        let twice = list.apply(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, rules(&["||ok.com^", "ok.com##.y"]));
    }

    #[test]
    fn test_exclude_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("exclude.txt"), "bad\n").unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());

        let kept = exclude(rules(&["||bad.com^", "||good.com^"]), "exclude.txt", &ctx);
        assert_eq!(kept, rules(&["||good.com^"]));
    }

    #[test]
    fn test_exclude_missing_resource_is_noop() {
        let dir = tempdir().unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());

        let input = rules(&["||bad.com^", "||good.com^"]);
        assert_eq!(exclude(input.clone(), "exclude.txt", &ctx), input);
    }
}
