//! Stylesheet compilation across breakpoint tiers
//!
//! Alternate, file-scoped output mode: instead of inline utility classes,
//! whole named rules are diffed between adjacent tiers and only the
//! changed ones are emitted under `@media` blocks. Whole-rule-text
//! equality is the only granularity — a single changed declaration
//! duplicates the entire rule under the media query.

use reweave_semantics::{Breakpoints, Tier};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use crate::report::{MergeIssue, MergeReport};

/// The four logical sections a per-tier stylesheet is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylesheetSection {
    Imports,
    RootTokens,
    Utilities,
    CustomClasses,
}

impl fmt::Display for StylesheetSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StylesheetSection::Imports => "imports",
            StylesheetSection::RootTokens => "root-tokens",
            StylesheetSection::Utilities => "utilities",
            StylesheetSection::CustomClasses => "custom-classes",
        };
        write!(f, "{}", name)
    }
}

/// One tier's stylesheet, each section addressable as raw text. Produced
/// by the out-of-scope extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylesheetSource {
    pub imports: String,
    pub root_tokens: String,
    pub utilities: String,
    pub custom_classes: String,
}

/// A named custom rule: selector plus the raw declaration body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub class_name: String,
    pub body: String,
}

/// The merged stylesheet artifact: desktop sections verbatim, unioned
/// root tokens, and two `@media` blocks holding only the rules whose
/// text differs from the next-wider tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedStylesheet {
    pub imports: String,
    pub root_tokens: Vec<(String, String)>,
    pub utilities: String,
    pub desktop_rules: Vec<StyleRule>,
    pub tablet_rules: Vec<StyleRule>,
    pub mobile_rules: Vec<StyleRule>,
    pub breakpoints: Breakpoints,
}

impl MergedStylesheet {
    pub fn media_block_count(&self) -> usize {
        [&self.tablet_rules, &self.mobile_rules]
            .iter()
            .filter(|rules| !rules.is_empty())
            .count()
    }

    /// Serialize to CSS text.
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        if !self.imports.trim().is_empty() {
            css.push_str(self.imports.trim());
            css.push_str("\n\n");
        }

        if !self.root_tokens.is_empty() {
            css.push_str(":root {\n");
            for (name, value) in &self.root_tokens {
                css.push_str("  ");
                css.push_str(name);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }
            css.push_str("}\n\n");
        }

        if !self.utilities.trim().is_empty() {
            css.push_str(self.utilities.trim());
            css.push_str("\n\n");
        }

        for rule in &self.desktop_rules {
            write_rule(&mut css, rule, "");
        }

        for (tier, rules) in [(Tier::Tablet, &self.tablet_rules), (Tier::Mobile, &self.mobile_rules)]
        {
            if rules.is_empty() {
                continue;
            }
            // media_query is Some for every non-desktop tier
            if let Some(query) = self.breakpoints.media_query(tier) {
                css.push_str(&query);
                css.push_str(" {\n");
                for rule in rules {
                    write_rule(&mut css, rule, "  ");
                }
                css.push_str("}\n\n");
            }
        }

        css
    }
}

fn write_rule(css: &mut String, rule: &StyleRule, indent: &str) {
    css.push_str(indent);
    css.push_str(&rule.class_name);
    css.push_str(" {\n");
    for line in rule.body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        css.push_str(indent);
        css.push_str("  ");
        css.push_str(line);
        css.push('\n');
    }
    css.push_str(indent);
    css.push_str("}\n\n");
}

/// Diff whole rule bodies between adjacent tiers and emit `@media` blocks
/// containing only the changed custom classes, plus a union of root-level
/// design tokens.
#[instrument(skip_all)]
pub fn compile_stylesheets(
    desktop: &StylesheetSource,
    tablet: &StylesheetSource,
    mobile: &StylesheetSource,
    breakpoints: Breakpoints,
    report: &mut MergeReport,
) -> MergedStylesheet {
    let desktop_tokens = parse_token_section(Tier::Desktop, desktop, report);
    let tablet_tokens = parse_token_section(Tier::Tablet, tablet, report);
    let mobile_tokens = parse_token_section(Tier::Mobile, mobile, report);

    // Union of the three tiers' token maps; later tiers win on key
    // collision, first-seen order is preserved.
    let mut root_tokens: Vec<(String, String)> = Vec::new();
    for (name, value) in desktop_tokens
        .into_iter()
        .chain(tablet_tokens)
        .chain(mobile_tokens)
    {
        if let Some(existing) = root_tokens.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            root_tokens.push((name, value));
        }
    }

    let desktop_rules = parse_rules(Tier::Desktop, desktop, report);
    let tablet_source_rules = parse_rules(Tier::Tablet, tablet, report);
    let mobile_source_rules = parse_rules(Tier::Mobile, mobile, report);

    // New classes count as "differs from nothing".
    let tablet_rules = diff_rules(&tablet_source_rules, &desktop_rules);
    // Mobile is diffed against the tablet tier, not desktop.
    let mobile_rules = diff_rules(&mobile_source_rules, &tablet_source_rules);

    debug!(
        root_tokens = root_tokens.len(),
        tablet_overrides = tablet_rules.len(),
        mobile_overrides = mobile_rules.len(),
        "Compiled merged stylesheet"
    );

    MergedStylesheet {
        imports: desktop.imports.clone(),
        root_tokens,
        utilities: desktop.utilities.clone(),
        desktop_rules,
        tablet_rules,
        mobile_rules,
        breakpoints,
    }
}

/// Rules from `narrow` whose whole rule text differs from the same-named
/// rule in `wide` (or which have no counterpart there).
fn diff_rules(narrow: &[StyleRule], wide: &[StyleRule]) -> Vec<StyleRule> {
    narrow
        .iter()
        .filter(|rule| {
            wide.iter()
                .find(|w| w.class_name == rule.class_name)
                .map_or(true, |w| w.body != rule.body)
        })
        .cloned()
        .collect()
}

fn parse_token_section(
    tier: Tier,
    source: &StylesheetSource,
    report: &mut MergeReport,
) -> Vec<(String, String)> {
    match parse_root_tokens(&source.root_tokens) {
        Ok(tokens) => tokens,
        Err(()) => {
            report.record(MergeIssue::UnparsableStylesheetSection {
                tier,
                section: StylesheetSection::RootTokens,
            });
            Vec::new()
        }
    }
}

fn parse_rules(tier: Tier, source: &StylesheetSource, report: &mut MergeReport) -> Vec<StyleRule> {
    match parse_custom_classes(&source.custom_classes) {
        Ok(rules) => rules,
        Err(()) => {
            report.record(MergeIssue::UnparsableStylesheetSection {
                tier,
                section: StylesheetSection::CustomClasses,
            });
            Vec::new()
        }
    }
}

/// Parse `--name: value;` declarations, tolerating an optional
/// `:root { ... }` wrapper. Any other non-empty declaration fails the
/// whole section.
fn parse_root_tokens(text: &str) -> Result<Vec<(String, String)>, ()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let inner = if let Some(rest) = trimmed.strip_prefix(":root") {
        let rest = rest.trim_start().strip_prefix('{').ok_or(())?;
        rest.trim_end().strip_suffix('}').ok_or(())?
    } else {
        trimmed
    };

    let mut tokens = Vec::new();
    for declaration in inner.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let (name, value) = declaration.split_once(':').ok_or(())?;
        let name = name.trim();
        if !name.starts_with("--") {
            return Err(());
        }
        tokens.push((name.to_string(), value.trim().to_string()));
    }

    Ok(tokens)
}

/// Split a custom-class section into `selector { body }` rules by brace
/// matching. Unbalanced braces fail the section.
fn parse_custom_classes(text: &str) -> Result<Vec<StyleRule>, ()> {
    let mut rules = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let open = rest.find('{').ok_or(())?;
        let selector = rest[..open].trim();
        if selector.is_empty() {
            return Err(());
        }

        let mut depth = 0usize;
        let mut close = None;
        for (i, ch) in rest[open..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or(())?;

        let body: String = rest[open + 1..close]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        rules.push(StyleRule {
            class_name: selector.to_string(),
            body,
        });
        rest = rest[close + 1..].trim_start();
    }

    Ok(rules)
}
