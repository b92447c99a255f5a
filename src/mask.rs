//! Cosmetic rule masks.
//!
//! A mask is the separator between the domain list and the body of a cosmetic
//! rule, e.g. `example.com##.banner`. The same markers are detected in raw
//! rules and emitted in converted ones.

use std::fmt;

/// RuleMask identifies the dialect of a cosmetic rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleMask {
    /// Element hiding (`##`)
    ElementHiding,
    /// Element hiding exception (`#@#`)
    ElementHidingException,
    /// CSS injection (`#$#`)
    CssInjection,
    /// CSS injection exception (`#@$#`)
    CssInjectionException,
}

/// Masks ordered longest marker first, for locating a separator at a position.
const BY_LENGTH: [RuleMask; 4] = [
    RuleMask::CssInjectionException,
    RuleMask::CssInjection,
    RuleMask::ElementHidingException,
    RuleMask::ElementHiding,
];

impl RuleMask {
    /// Get the separator text embedded in rules of this dialect.
    pub fn marker(&self) -> &'static str {
        match self {
            RuleMask::ElementHiding => "##",
            RuleMask::ElementHidingException => "#@#",
            RuleMask::CssInjection => "#$#",
            RuleMask::CssInjectionException => "#@$#",
        }
    }

    /// Whether rules of this dialect carry `selector { declarations }` bodies.
    pub fn is_injection(&self) -> bool {
        matches!(
            self,
            RuleMask::CssInjection | RuleMask::CssInjectionException
        )
    }

    /// Locate the cosmetic separator in a rule.
    ///
    /// Returns the leftmost separator, preferring the longest marker that
    /// starts at that position, as `(domains, mask, body)`.
    pub fn find(rule: &str) -> Option<(&str, RuleMask, &str)> {
        for (idx, _) in rule.match_indices('#') {
            let rest = &rule[idx..];
            if let Some(mask) = BY_LENGTH.iter().find(|m| rest.starts_with(m.marker())) {
                let body = &rest[mask.marker().len()..];
                return Some((&rule[..idx], *mask, body));
            }
        }
        None
    }
}

impl fmt::Display for RuleMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// One row of the conversion table: a marker to detect and the mask to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRewrite {
    pub detect: &'static str,
    pub emit: RuleMask,
}

/// Markers that introduce legacy `:style()` rules, in detection priority order.
///
/// `#@##` is the legacy spelling of an exception whose selector follows the
/// marker directly; it has to win over the plain `##` row.
pub const STYLE_REWRITES: &[MaskRewrite] = &[
    MaskRewrite {
        detect: "#$#",
        emit: RuleMask::CssInjection,
    },
    MaskRewrite {
        detect: "#@$#",
        emit: RuleMask::CssInjectionException,
    },
    MaskRewrite {
        detect: "#@##",
        emit: RuleMask::CssInjectionException,
    },
    MaskRewrite {
        detect: "##",
        emit: RuleMask::CssInjection,
    },
    MaskRewrite {
        detect: "#@#",
        emit: RuleMask::CssInjectionException,
    },
];
