//! Legacy `:style()` rule conversion.
//!
//! `example.com##h1:style(color: blue)` becomes
//! `example.com#$#h1 { color: blue }`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mask::STYLE_REWRITES;

/// Marker of a legacy style rule.
pub const STYLE_MARKER: &str = ":style(";

/// Captures the selector and the style declarations.
static STYLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*):style\((.*)\)").unwrap());

/// Rewrite a `:style()` rule into CSS injection syntax.
///
/// Returns `None` when the rule is not a style rule or cannot be decomposed;
/// the caller keeps the original rule in both cases.
pub fn rewrite_style(rule: &str) -> Option<String> {
    if !rule.contains(STYLE_MARKER) {
        return None;
    }

    let Some(rewrite) = STYLE_REWRITES.iter().find(|r| rule.contains(r.detect)) else {
        log::debug!("Style rule without cosmetic mask left as is: {}", rule);
        return None;
    };

    let (domain, selector_and_style) = rule.split_once(rewrite.detect)?;

    let Some(caps) = STYLE_PATTERN.captures(selector_and_style) else {
        log::warn!(
            "Cannot split style rule into selector and declarations, keeping it: {}",
            rule
        );
        return None;
    };

    Some(format!(
        "{}{}{} {{ {} }}",
        domain,
        rewrite.emit.marker(),
        &caps[1],
        &caps[2]
    ))
}
