//! Desktop-first class merging
//!
//! The desktop class set is the unprefixed base. Tablet divergences are
//! emitted under the tablet-or-narrower prefix and mobile divergences
//! under the mobile-only prefix, diffed against the *resolved* tablet
//! state per group so three-tier cascading comes out right instead of two
//! independent two-way diffs. Overrides win per tier through media
//! specificity, so the desktop base token is retained when overridden;
//! removal only purges same-group duplicates at the same prefix tier.

use reweave_semantics::{prefixed, Tier};
use std::collections::HashSet;

use crate::conflict::{GroupRegistry, MergeDecision};
use crate::tree::Element;

/// Outcome of merging one element's three class sets.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedClasses {
    pub class_name: String,
    /// Number of groups that produced at least one prefixed override.
    pub conflicts_resolved: usize,
}

/// Produce the merged class string for one element.
///
/// Serialization order is fixed: group-independent and base tokens in
/// original desktop order, then tablet-prefixed tokens, then
/// mobile-prefixed tokens, in decision order. Identical input always
/// yields an identical string.
pub fn merge_classes(
    desktop: &Element,
    identical: &HashSet<String>,
    decisions: &[MergeDecision],
    registry: &GroupRegistry,
) -> MergedClasses {
    let mut base: Vec<&str> = desktop.classes.iter().map(String::as_str).collect();
    let mut tablet_emits: Vec<String> = Vec::new();
    let mut mobile_emits: Vec<String> = Vec::new();
    let mut conflicts_resolved = 0;

    for decision in decisions {
        // Purge same-group duplicates from the base tier: only the
        // decision's base slot survives. Identical classes are never
        // removed (they pass through untouched by definition).
        base.retain(|token| {
            identical.contains(*token)
                || registry.classify(token) != Some(decision.group.as_str())
                || Some(*token) == decision.base.as_deref()
        });

        let mut emitted = false;
        let mut effective = decision.base.as_deref();

        if let Some(tablet) = decision.tablet_override.as_deref() {
            if Some(tablet) != decision.base.as_deref() {
                tablet_emits.push(prefixed(Tier::Tablet, tablet));
                effective = Some(tablet);
                emitted = true;
            }
        }
        // A missing tablet slot is absence, not a conflict: the base is
        // kept and remains the effective tablet value.

        if let Some(mobile) = decision.mobile_override.as_deref() {
            if Some(mobile) != effective {
                mobile_emits.push(prefixed(Tier::Mobile, mobile));
                emitted = true;
            }
        }

        if emitted {
            conflicts_resolved += 1;
        }
    }

    let mut parts: Vec<String> = base.into_iter().map(str::to_string).collect();
    parts.extend(tablet_emits);
    parts.extend(mobile_emits);

    MergedClasses {
        class_name: parts.join(" "),
        conflicts_resolved,
    }
}
