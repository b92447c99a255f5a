//! Rule syntax converter.
//!
//! Rewrites legacy rule syntax into canonical syntax:
//! - `:style()` cosmetic rules become CSS injection rules
//! - legacy network options (`xhr`, `css`, `frame`, `first-party`) are renamed
//!
//! The converter never drops or reorders rules.

mod options;
mod style;

pub use options::rewrite_options;
pub use style::{rewrite_style, STYLE_MARKER};

/// Result of converting a list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// Converted rules, same length and order as the input
    pub rules: Vec<String>,
    /// `!`-prefixed copies of the original rules rewritten from `:style()` syntax
    pub annotations: Vec<String>,
}

/// Convert rules to canonical syntax.
pub fn convert<S: AsRef<str>>(rules: &[S]) -> Conversion {
    let mut conversion = Conversion {
        rules: Vec::with_capacity(rules.len()),
        annotations: Vec::new(),
    };

    for rule in rules {
        let original = rule.as_ref();
        let mut converted = original.to_string();

        if let Some(rewritten) = rewrite_style(&converted) {
            log::debug!("Converted style rule: {} -> {}", original, rewritten);
            conversion.annotations.push(format!("! {}", original));
            converted = rewritten;
        }

        if let Some(rewritten) = rewrite_options(&converted) {
            log::debug!("Converted rule options: {} -> {}", original, rewritten);
            converted = rewritten;
        }

        conversion.rules.push(converted);
    }

    conversion
}
