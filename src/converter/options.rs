//! Legacy network option rewriting.

use crate::mask::RuleMask;

/// Legacy option tokens and their canonical replacements.
const OPTION_REWRITES: &[(&str, &str)] = &[
    ("first-party", "~third-party"),
    ("~first-party", "third-party"),
    ("xhr", "xmlhttprequest"),
    ("css", "stylesheet"),
    ("frame", "subdocument"),
];

/// Rewrite legacy option tokens of a network rule.
///
/// Tokens are matched case-insensitively right after the `$` that opens the
/// option list or after a `,` separator. Returns `None` if nothing changed.
pub fn rewrite_options(rule: &str) -> Option<String> {
    // Cosmetic rules have no option list
    if RuleMask::find(rule).is_some() {
        return None;
    }

    let idx = rule.rfind('$')?;
    let (pattern, options) = (&rule[..idx], &rule[idx + 1..]);

    let mut changed = false;
    let tokens: Vec<&str> = options
        .split(',')
        .map(|token| {
            match OPTION_REWRITES
                .iter()
                .find(|(legacy, _)| token.eq_ignore_ascii_case(legacy))
            {
                Some((_, canonical)) => {
                    changed = true;
                    *canonical
                }
                None => token,
            }
        })
        .collect();

    if !changed {
        return None;
    }

    Some(format!("{}${}", pattern, tokens.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_party_negation() {
        assert_eq!(
            rewrite_options("||example.org^$first-party").as_deref(),
            Some("||example.org^$~third-party")
        );
        assert_eq!(
            rewrite_options("||example.org^$~first-party").as_deref(),
            Some("||example.org^$third-party")
        );
    }

    #[test]
    fn test_multiple_rewrites() {
        assert_eq!(
            rewrite_options("||example.org^$first-party,xhr").as_deref(),
            Some("||example.org^$~third-party,xmlhttprequest")
        );
        assert_eq!(
            rewrite_options("||a.com^$xhr,frame,css").as_deref(),
            Some("||a.com^$xmlhttprequest,subdocument,stylesheet")
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            rewrite_options("||a.com^$XHR,Frame").as_deref(),
            Some("||a.com^$xmlhttprequest,subdocument")
        );
    }

    #[test]
    fn test_other_options_preserved() {
        assert_eq!(
            rewrite_options("||a.com^$script,css,domain=b.com|c.com").as_deref(),
            Some("||a.com^$script,stylesheet,domain=b.com|c.com")
        );
    }

    #[test]
    fn test_token_must_match_whole_option() {
        assert_eq!(rewrite_options("||a.com^$xhrfoo"), None);
        assert_eq!(rewrite_options("||a.com^$frameset,cssx"), None);
    }

    #[test]
    fn test_no_options() {
        assert_eq!(rewrite_options("||a.com^"), None);
        assert_eq!(rewrite_options("/ads$/"), None);
    }

    #[test]
    fn test_cosmetic_selectors_untouched() {
        assert_eq!(rewrite_options("a.com#$#div,frame { display: none }"), None);
    }
}
