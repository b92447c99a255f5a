//! Domain blacklist filtering.
//!
//! Rules must never target blacklisted domains. Depending on the rule this
//! means dropping it or pruning the blacklisted domains from its domain list:
//! - `||domain^` network rules are dropped
//! - `$domain=a|b` lists lose their blacklisted entries
//! - cosmetic domain lists lose their blacklisted entries
//!
//! A rule whose domain list becomes empty is dropped, since it would
//! otherwise turn into a generic rule.

use ahash::AHashSet;
use std::fs;
use std::path::Path;

use crate::lines::{is_comment, split_lines};
use crate::mask::RuleMask;
use crate::validator::split_network;
use crate::Result;

/// Characters that end the host part of a `||` network pattern.
const HOST_TERMINATORS: &[char] = &['^', '/', '$', ':', '*', '|', '?'];

/// Set of domains that rules must not target.
#[derive(Debug, Clone, Default)]
pub struct DomainBlacklist {
    domains: AHashSet<String>,
}

impl DomainBlacklist {
    /// Create an empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a blacklist from domain names.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Parse a blacklist resource: one domain per line, `!` and `#` comments.
    pub fn parse(content: &str) -> Self {
        Self::from_domains(
            split_lines(content)
                .into_iter()
                .map(str::trim)
                .filter(|line| !is_comment(line) && !line.starts_with('#')),
        )
    }

    /// Load a blacklist file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Number of blacklisted domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether the blacklist is empty.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Check a domain and all of its parent domains.
    pub fn is_blacklisted(&self, domain: &str) -> bool {
        if self.domains.is_empty() {
            return false;
        }
        let domain = domain.trim().trim_start_matches("*.").to_lowercase();
        let mut current = domain.as_str();
        loop {
            if self.domains.contains(current) {
                return true;
            }
            match current.find('.') {
                Some(idx) => current = &current[idx + 1..],
                None => return false,
            }
        }
    }

    /// Drop or rewrite rules, returning them with the number of dropped rules.
    pub fn filter(&self, rules: Vec<String>) -> (Vec<String>, usize) {
        if self.domains.is_empty() {
            return (rules, 0);
        }

        let before = rules.len();
        let kept: Vec<String> = rules
            .into_iter()
            .filter_map(|rule| {
                let result = self.apply(&rule);
                match &result {
                    None => log::debug!("Rule targets blacklisted domain, dropped: {}", rule),
                    Some(rewritten) if *rewritten != rule => {
                        log::debug!("Pruned blacklisted domains: {} -> {}", rule, rewritten)
                    }
                    _ => {}
                }
                result
            })
            .collect();

        let dropped = before - kept.len();
        if dropped > 0 {
            log::info!("Blacklist removed {} rules", dropped);
        }
        (kept, dropped)
    }

    /// Apply the blacklist to one rule, `None` if it must be dropped.
    fn apply(&self, rule: &str) -> Option<String> {
        if is_comment(rule) {
            return Some(rule.to_string());
        }

        if let Some((domains, mask, body)) = RuleMask::find(rule) {
            if domains.is_empty() {
                return Some(rule.to_string());
            }
            let pruned = self.prune(domains, ',')?;
            return Some(format!("{}{}{}", pruned, mask.marker(), body));
        }

        let (pattern, options) = split_network(rule);
        if let Some(host) = pattern.trim_start_matches("@@").strip_prefix("||") {
            let host = host.split(HOST_TERMINATORS).next().unwrap_or_default();
            if !host.is_empty() && self.is_blacklisted(host) {
                return None;
            }
        }

        let Some(options) = options else {
            return Some(rule.to_string());
        };

        let mut tokens = Vec::new();
        for option in options.split(',') {
            match option.split_once('=') {
                Some((name, value)) if name.eq_ignore_ascii_case("domain") => {
                    let pruned = self.prune(value, '|')?;
                    tokens.push(format!("{}={}", name, pruned));
                }
                _ => tokens.push(option.to_string()),
            }
        }
        Some(format!("{}${}", pattern, tokens.join(",")))
    }

    /// Remove blacklisted entries from a domain list, `None` if none remain.
    ///
    /// Negated entries are kept.
    fn prune(&self, list: &str, separator: char) -> Option<String> {
        let kept: Vec<&str> = list
            .split(separator)
            .filter(|entry| entry.starts_with('~') || !self.is_blacklisted(entry))
            .collect();
        if kept.is_empty() {
            return None;
        }
        Some(kept.join(&separator.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rules(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_and_match_subdomains() {
        let blacklist = DomainBlacklist::parse("! comment\n# other comment\nExample.COM\n\nfoo.org\n");
        assert_eq!(blacklist.len(), 2);
        assert!(blacklist.is_blacklisted("example.com"));
        assert!(blacklist.is_blacklisted("www.example.com"));
        assert!(blacklist.is_blacklisted("*.example.com"));
        assert!(!blacklist.is_blacklisted("notexample.com"));
        assert!(!blacklist.is_blacklisted("org"));
    }

    #[test]
    fn test_network_rules_dropped() {
        let blacklist = DomainBlacklist::from_domains(["example.com"]);
        let (kept, dropped) = blacklist.filter(rules(&[
            "||example.com^",
            "@@||cdn.example.com/ads.js$script",
            "||other.com^",
            "! example.com comment",
        ]));
        assert_eq!(kept, rules(&["||other.com^", "! example.com comment"]));
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_domain_option_pruned() {
        let blacklist = DomainBlacklist::from_domains(["bad.com"]);
        let (kept, dropped) = blacklist.filter(rules(&[
            "||ads.net^$script,domain=bad.com|good.com",
            "||ads.net^$domain=bad.com",
            "||ads.net^$domain=~bad.com",
        ]));
        assert_eq!(
            kept,
            rules(&[
                "||ads.net^$script,domain=good.com",
                "||ads.net^$domain=~bad.com",
            ])
        );
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_cosmetic_domains_pruned() {
        let blacklist = DomainBlacklist::from_domains(["bad.com"]);
        let (kept, dropped) = blacklist.filter(rules(&[
            "bad.com,good.com##.ad",
            "bad.com#$#h1 { color: red }",
            "##.generic",
        ]));
        assert_eq!(kept, rules(&["good.com##.ad", "##.generic"]));
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_empty_blacklist_passes_through() {
        let blacklist = DomainBlacklist::new();
        let input = rules(&["||example.com^", "a.com##.b"]);
        assert_eq!(blacklist.filter(input.clone()), (input, 0));
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blacklist.txt");
        fs::write(&path, "ads.example\n").unwrap();

        let blacklist = DomainBlacklist::load(&path).unwrap();
        assert!(blacklist.is_blacklisted("ads.example"));
        assert!(DomainBlacklist::load(dir.path().join("missing.txt")).is_err());
    }
}
