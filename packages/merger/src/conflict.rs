//! Conflict detection over non-identical utility classes
//!
//! Remaining (non-identical) tokens are grouped into mutually-exclusive
//! property groups: static closed sets first, then dynamic prefix
//! patterns. A token matching no rule is ungrouped and never treated as
//! conflicting regardless of textual difference.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::identity::TierEntry;
use crate::tree::Element;

pub const GROUP_DISPLAY: &str = "display";

const STATIC_GROUPS: &[(&str, &[&str])] = &[
    (
        "flex-direction",
        &["flex-row", "flex-row-reverse", "flex-col", "flex-col-reverse"],
    ),
    (
        "align-items",
        &[
            "items-start",
            "items-end",
            "items-center",
            "items-baseline",
            "items-stretch",
        ],
    ),
    (
        "justify-content",
        &[
            "justify-start",
            "justify-end",
            "justify-center",
            "justify-between",
            "justify-around",
            "justify-evenly",
        ],
    ),
    (
        "align-content",
        &[
            "content-start",
            "content-end",
            "content-center",
            "content-between",
            "content-around",
            "content-evenly",
        ],
    ),
    (
        GROUP_DISPLAY,
        &[
            "block",
            "inline-block",
            "inline",
            "flex",
            "inline-flex",
            "grid",
            "inline-grid",
            "table",
            "contents",
            "hidden",
        ],
    ),
    (
        "position",
        &["static", "fixed", "absolute", "relative", "sticky"],
    ),
];

// Longer prefixes first so min-w-64 never classifies as width.
const DYNAMIC_RULES: &[(&str, &str)] = &[
    ("min-width", r"^min-w-"),
    ("max-width", r"^max-w-"),
    ("width", r"^w-"),
    ("min-height", r"^min-h-"),
    ("max-height", r"^max-h-"),
    ("height", r"^h-"),
    ("flex-basis", r"^basis-"),
    ("flex-grow", r"^(flex-)?grow(-|$)"),
    ("flex-shrink", r"^(flex-)?shrink(-|$)"),
];

struct DynamicRule {
    group: &'static str,
    pattern: Regex,
}

/// Classifies utility tokens into conflict groups. Built once per
/// [`MergeContext`](crate::reconciler::MergeContext) and discarded with
/// it; no process-wide state.
pub struct GroupRegistry {
    token_to_group: HashMap<&'static str, &'static str>,
    dynamic: Vec<DynamicRule>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        let mut token_to_group = HashMap::new();
        for (group, tokens) in STATIC_GROUPS {
            for token in *tokens {
                token_to_group.insert(*token, *group);
            }
        }

        let dynamic = DYNAMIC_RULES
            .iter()
            .map(|(group, pattern)| DynamicRule {
                group,
                pattern: Regex::new(pattern).unwrap(),
            })
            .collect();

        Self {
            token_to_group,
            dynamic,
        }
    }

    /// The conflict group a token belongs to, if any. Static lookup wins
    /// over pattern rules; a token belongs to at most one group.
    pub fn classify(&self, token: &str) -> Option<&'static str> {
        if let Some(group) = self.token_to_group.get(token) {
            return Some(*group);
        }
        self.dynamic
            .iter()
            .find(|rule| rule.pattern.is_match(token))
            .map(|rule| rule.group)
    }

    /// The element's token from the `display` group, if it carries one.
    /// Used when restoring visibility at the narrowest tier.
    pub fn display_token<'a>(&self, element: &'a Element) -> Option<&'a str> {
        element
            .classes
            .iter()
            .map(String::as_str)
            .find(|token| self.classify(token) == Some(GROUP_DISPLAY))
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-group resolution slots for one element. A missing slot means "no
/// token from this group at this breakpoint" — absence, not conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeDecision {
    pub group: String,
    pub base: Option<String>,
    pub tablet_override: Option<String>,
    pub mobile_override: Option<String>,
}

/// Detect per-group divergences for one matched element.
///
/// Pure and deterministic: decisions come out in order of each group's
/// first appearance across desktop, then tablet, then mobile classes.
/// When one tier carries several tokens of the same group, the first in
/// document order fills the slot.
pub fn detect_conflicts(
    entry: &TierEntry<'_>,
    identical: &HashSet<String>,
    registry: &GroupRegistry,
) -> Vec<MergeDecision> {
    let mut order: Vec<&'static str> = Vec::new();
    let mut slots: HashMap<&'static str, [Option<String>; 3]> = HashMap::new();

    let tiers = [entry.desktop, entry.tablet, entry.mobile];
    for (slot, element) in tiers.iter().enumerate() {
        let Some(element) = element else { continue };
        for token in &element.classes {
            if identical.contains(token) {
                continue;
            }
            let Some(group) = registry.classify(token) else {
                continue;
            };
            let group_slots = slots.entry(group).or_insert_with(|| {
                order.push(group);
                [None, None, None]
            });
            if group_slots[slot].is_none() {
                group_slots[slot] = Some(token.clone());
            }
        }
    }

    let decisions: Vec<MergeDecision> = order
        .into_iter()
        .map(|group| {
            let [base, tablet_override, mobile_override] =
                slots.remove(group).unwrap_or_default();
            MergeDecision {
                group: group.to_string(),
                base,
                tablet_override,
                mobile_override,
            }
        })
        .collect();

    if !decisions.is_empty() {
        debug!(groups = decisions.len(), "Detected class conflicts");
    }
    decisions
}
