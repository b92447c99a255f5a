//! Template compilation.
//!
//! Compiling a template runs these stages in order:
//! 1. `@include` expansion (with per-include exclusions and conversion)
//! 2. exclusion filtering with the directory's exclusion resource
//! 3. stable deduplication
//! 4. validation and domain blacklist filtering
//! 5. sorting

use ahash::AHashSet;

use crate::blacklist::DomainBlacklist;
use crate::config::FileNames;
use crate::context::FilterContext;
use crate::exclusion;
use crate::include::{self, IncludeDirective};
use crate::lines::split_lines;
use crate::sorter::Sorter;
use crate::validator::Validator;

/// Line counts collected while compiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    /// Lines contributed by `@include` directives
    pub included: usize,
    /// Lines removed by the directory's exclusion resource
    pub excluded: usize,
    /// Duplicate lines removed
    pub duplicates: usize,
    /// Lines rejected by the validator
    pub invalid: usize,
    /// Rules dropped by the domain blacklist
    pub blacklisted: usize,
}

/// Result of compiling a template.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// Processed rule body
    pub rules: Vec<String>,
    /// Original text of rules rewritten by the converter
    pub annotations: Vec<String>,
    pub stats: CompileStats,
}

/// Compiler for the template of one filter directory.
pub struct Compiler<'a> {
    ctx: &'a FilterContext,
    blacklist: &'a DomainBlacklist,
    exclusions: String,
    validator: Validator,
    sorter: Sorter,
}

impl<'a> Compiler<'a> {
    /// Create a compiler resolving resources through `ctx`.
    pub fn new(ctx: &'a FilterContext, blacklist: &'a DomainBlacklist) -> Self {
        Self {
            ctx,
            blacklist,
            exclusions: FileNames::default().exclusions,
            validator: Validator::new(),
            sorter: Sorter::new(),
        }
    }

    /// Use a different exclusion resource name.
    pub fn with_exclusions(mut self, name: impl Into<String>) -> Self {
        self.exclusions = name.into();
        self
    }

    /// Compile a template into a rule body.
    pub fn compile(&self, template: &str) -> CompileOutput {
        let mut stats = CompileStats::default();
        let mut annotations = Vec::new();
        let mut lines = Vec::new();

        for line in split_lines(template) {
            if IncludeDirective::is_directive(line) {
                let included = include::resolve(line, self.ctx);
                stats.included += included.rules.len();
                lines.extend(included.rules.iter().map(|rule| rule.trim().to_string()));
                annotations.extend(included.annotations);
            } else {
                lines.push(line.trim().to_string());
            }
        }

        let before = lines.len();
        let lines = exclusion::exclude(lines, &self.exclusions, self.ctx);
        stats.excluded = before - lines.len();

        let (lines, duplicates) = dedup(lines);
        stats.duplicates = duplicates;

        let (lines, invalid) = self.validator.validate(lines);
        stats.invalid = invalid;

        let (lines, blacklisted) = self.blacklist.filter(lines);
        stats.blacklisted = blacklisted;

        let rules = self.sorter.sort(lines);

        log::info!(
            "Compiled {} rules ({} included, {} excluded, {} duplicates, {} invalid, {} blacklisted)",
            rules.len(),
            stats.included,
            stats.excluded,
            stats.duplicates,
            stats.invalid,
            stats.blacklisted
        );

        CompileOutput {
            rules,
            annotations,
            stats,
        }
    }
}

/// Remove repeated lines, keeping each first occurrence in place.
///
/// Returns the remaining lines and the number removed.
pub fn dedup(lines: Vec<String>) -> (Vec<String>, usize) {
    let before = lines.len();
    let mut seen = AHashSet::with_capacity(lines.len());
    let kept: Vec<String> = lines
        .into_iter()
        .filter(|line| seen.insert(line.clone()))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceLoader;
    use std::fs;
    use tempfile::tempdir;

    fn lines(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedup_stable() {
        let (kept, removed) = dedup(lines(&["b", "a", "b", "c", "a", "b"]));
        assert_eq!(kept, lines(&["b", "a", "c"]));
        assert_eq!(removed, 3);

        let (again, removed) = dedup(kept.clone());
        assert_eq!(again, kept);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_compile_plain_template() {
        let dir = tempdir().unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());
        let blacklist = DomainBlacklist::new();

        let output = Compiler::new(&ctx, &blacklist)
            .compile("  ||b.com^  \r\n||a.com^\n\n||b.com^\n   \n");
        assert_eq!(output.rules, lines(&["||a.com^", "||b.com^"]));
        assert_eq!(output.stats.duplicates, 1);
    }

    #[test]
    fn test_compile_with_include_and_exclusions() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("fragment.txt"),
            "! fragment comment\n  ||ads.com^$xhr  \n||skip.com^\nsite.com##h1:style(color: red)\n",
        )
        .unwrap();
        fs::write(dir.path().join("exclude.txt"), "skip.com\n").unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());
        let blacklist = DomainBlacklist::new();

        let output = Compiler::new(&ctx, &blacklist)
            .compile("@include fragment.txt /stripComments\n||zzz.com^\n||ads.com^$xmlhttprequest\n");

        assert_eq!(
            output.rules,
            lines(&[
                "site.com#$#h1 { color: red }",
                "||ads.com^$xmlhttprequest",
                "||zzz.com^",
            ])
        );
        assert_eq!(output.stats.included, 3);
        assert_eq!(output.stats.excluded, 1);
        assert_eq!(output.stats.duplicates, 1);
        assert_eq!(output.annotations, lines(&["! site.com##h1:style(color: red)"]));
    }

    #[test]
    fn test_strip_comments_only_affects_included_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("fragment.txt"), "! included comment\n||ads.com^\n").unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());
        let blacklist = DomainBlacklist::new();

        let output = Compiler::new(&ctx, &blacklist)
            .compile("! Template comment\n@include fragment.txt /stripComments\n");

        assert_eq!(output.rules, lines(&["! Template comment", "||ads.com^"]));
    }

    #[test]
    fn test_compile_applies_validator_and_blacklist() {
        let dir = tempdir().unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());
        let blacklist = DomainBlacklist::from_domains(["blocked.org"]);

        let output = Compiler::new(&ctx, &blacklist)
            .compile("||ok.com^\n||ok.com^$bogus\n||blocked.org^\nblocked.org,fine.net##.ad\n");

        assert_eq!(output.rules, lines(&["fine.net##.ad", "||ok.com^"]));
        assert_eq!(output.stats.invalid, 1);
        assert_eq!(output.stats.blacklisted, 1);
    }

    #[test]
    fn test_custom_exclusions_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("skip.txt"), "/^\\|\\|a/\n").unwrap();
        let ctx = FilterContext::new(dir.path(), SourceLoader::new());
        let blacklist = DomainBlacklist::new();

        let output = Compiler::new(&ctx, &blacklist)
            .with_exclusions("skip.txt")
            .compile("||a.com^\n||b.com^\n");
        assert_eq!(output.rules, lines(&["||b.com^"]));
    }
}
