//! Final ordering of compiled rules.

use crate::lines::is_comment;

/// Sorts rules while keeping comments in place.
///
/// Comment lines act as section boundaries: the rules between two comments
/// are sorted among themselves and never move across a comment.
#[derive(Debug, Clone, Default)]
pub struct Sorter;

impl Sorter {
    /// Create a new sorter.
    pub fn new() -> Self {
        Self
    }

    /// Sort rules section by section.
    pub fn sort(&self, mut rules: Vec<String>) -> Vec<String> {
        let mut start = 0;
        while start < rules.len() {
            if is_comment(&rules[start]) {
                start += 1;
                continue;
            }
            let end = rules[start..]
                .iter()
                .position(|rule| is_comment(rule))
                .map_or(rules.len(), |offset| start + offset);
            rules[start..end].sort();
            start = end;
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sort_without_comments() {
        let sorted = Sorter::new().sort(rules(&["||c.com^", "a.com##.x", "||b.com^"]));
        assert_eq!(sorted, rules(&["a.com##.x", "||b.com^", "||c.com^"]));
    }

    #[test]
    fn test_comments_are_section_boundaries() {
        let sorted = Sorter::new().sort(rules(&[
            "! Section B",
            "||z.com^",
            "||y.com^",
            "! Section A",
            "||b.com^",
            "||a.com^",
        ]));
        assert_eq!(
            sorted,
            rules(&[
                "! Section B",
                "||y.com^",
                "||z.com^",
                "! Section A",
                "||a.com^",
                "||b.com^",
            ])
        );
    }

    #[test]
    fn test_sort_idempotent() {
        let sorter = Sorter::new();
        let once = sorter.sort(rules(&["b", "! x", "d", "c", "a"]));
        assert_eq!(sorter.sort(once.clone()), once);
    }
}
