//! Rule syntax validation.
//!
//! Rejects lines that would break or be ignored by ad blockers: empty lines,
//! list headers, cosmetic rules without a body and network rules with unknown
//! modifiers. Comments are always kept.

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::lines::is_comment;
use crate::mask::RuleMask;

/// Network rule modifiers accepted in `$` option lists.
const KNOWN_OPTIONS: &[&str] = &[
    "1p", "3p", "all", "app", "badfilter", "client", "content", "cookie", "csp", "ctag",
    "denyallow", "dnsrewrite", "dnstype", "document", "domain", "donottrack", "ehide",
    "elemhide", "empty", "extension", "font", "generichide", "genericblock", "ghide",
    "header", "hls", "image", "important", "inline-font", "inline-script", "jsinject",
    "jsonprune", "match-case", "media", "method", "mp4", "network", "object",
    "object-subrequest", "other", "permissions", "ping", "popunder", "popup", "redirect",
    "redirect-rule", "referrerpolicy", "removeheader", "removeparam", "replace", "rewrite",
    "script", "shide", "specifichide", "stealth", "strict1p", "strict3p", "stylesheet",
    "subdocument", "third-party", "to", "urlblock", "urltransform", "webrtc", "websocket",
    "xmlhttprequest",
];

static KNOWN_OPTION_SET: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| KNOWN_OPTIONS.iter().copied().collect());

/// Domains in cosmetic rule prefixes: host names (IDN included), wildcards and ports.
static DOMAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}*][\p{L}\p{N}.*_:\-\[\]]*$").unwrap());

/// CSS injection body: `selector { declarations }`.
static INJECTION_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+\{.*\}\s*$").unwrap());

/// Validator for compiled rule lists.
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Keep valid lines, returning them with the number of rejected lines.
    pub fn validate(&self, lines: Vec<String>) -> (Vec<String>, usize) {
        let before = lines.len();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| {
                let valid = self.is_valid(line);
                if !valid && !line.is_empty() {
                    log::debug!("Rejected invalid rule: {}", line);
                }
                valid
            })
            .collect();
        let rejected = before - kept.len();
        if rejected > 0 {
            log::info!("Validation removed {} lines", rejected);
        }
        (kept, rejected)
    }

    /// Check a single line.
    pub fn is_valid(&self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        if is_comment(line) {
            return true;
        }
        if line.starts_with('[') && !line.starts_with("[$") && line.ends_with(']') {
            return false;
        }

        match RuleMask::find(line) {
            Some((domains, mask, body)) => is_valid_cosmetic(domains, mask, body),
            None => is_valid_network(line),
        }
    }
}

fn is_valid_cosmetic(domains: &str, mask: RuleMask, body: &str) -> bool {
    let body = body.trim();
    if body.is_empty() {
        return false;
    }
    if mask.is_injection() && !INJECTION_BODY.is_match(body) {
        return false;
    }
    let domains = match strip_modifier_block(domains) {
        Some(domains) => domains,
        None => return false,
    };
    if domains.is_empty() {
        return true;
    }
    domains.split(',').all(|domain| {
        let domain = domain.trim().trim_start_matches('~');
        DOMAIN_PATTERN.is_match(domain)
    })
}

/// Drop a leading `[$path=...]` modifier block from a cosmetic domain list.
///
/// `None` if the block is never closed.
fn strip_modifier_block(domains: &str) -> Option<&str> {
    match domains.strip_prefix("[$") {
        Some(rest) => rest.find(']').map(|end| &rest[end + 1..]),
        None => Some(domains),
    }
}

fn is_valid_network(rule: &str) -> bool {
    let (pattern, options) = split_network(rule);

    match options {
        Some(options) => {
            let mut has_domain = false;
            for option in options.split(',') {
                let name = option
                    .split_once('=')
                    .map_or(option, |(name, _)| name)
                    .trim_start_matches('~')
                    .to_ascii_lowercase();
                if name == "domain" {
                    has_domain = true;
                }
                if !KNOWN_OPTION_SET.contains(name.as_str()) {
                    return false;
                }
            }
            let pattern = pattern.trim_start_matches("@@");
            !pattern.is_empty() || has_domain
        }
        None => !pattern.trim_start_matches("@@").is_empty(),
    }
}

/// Split a network rule into pattern and option list.
///
/// A `$` inside a regex rule only starts an option list when the text after
/// it looks like modifiers.
pub(crate) fn split_network(rule: &str) -> (&str, Option<&str>) {
    let Some(idx) = rule.rfind('$') else {
        return (rule, None);
    };
    let (pattern, options) = (&rule[..idx], &rule[idx + 1..]);

    let body = pattern.trim_start_matches("@@");
    if body.starts_with('/') && !looks_like_options(options) {
        return (rule, None);
    }
    (pattern, Some(options))
}

fn looks_like_options(options: &str) -> bool {
    let starts_like_modifier = options
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '~');
    starts_like_modifier && (!options.contains('/') || options.contains('='))
}
