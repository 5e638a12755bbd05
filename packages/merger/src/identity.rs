//! Identity matching across the three breakpoint trees
//!
//! Elements are matched purely by identity-key equality. No fuzzy or
//! positional matching is attempted: a renamed element is treated as
//! absent on one side and new on the other, and the visibility injector
//! compensates structurally.

use reweave_semantics::{PresenceSet, Tier};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::report::{MergeIssue, MergeReport};
use crate::tree::{Element, VariantTree};

/// One identity key's slots across the three trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierEntry<'a> {
    pub desktop: Option<&'a Element>,
    pub tablet: Option<&'a Element>,
    pub mobile: Option<&'a Element>,
}

impl<'a> TierEntry<'a> {
    pub fn get(&self, tier: Tier) -> Option<&'a Element> {
        match tier {
            Tier::Desktop => self.desktop,
            Tier::Tablet => self.tablet,
            Tier::Mobile => self.mobile,
        }
    }

    pub fn presence(&self) -> PresenceSet {
        PresenceSet {
            desktop: self.desktop.is_some(),
            tablet: self.tablet.is_some(),
            mobile: self.mobile.is_some(),
        }
    }
}

/// Mapping from identity key to the element in each of the three trees,
/// built once per component. Borrows the input trees; the merge never
/// mutates them.
#[derive(Debug, Default)]
pub struct IdentityIndex<'a> {
    entries: HashMap<String, TierEntry<'a>>,
    /// Keys that collided within a single tree. These are excluded from
    /// reconciliation; the desktop value is kept verbatim.
    excluded: HashSet<String>,
}

impl<'a> IdentityIndex<'a> {
    /// Build the index from one component's three variant trees,
    /// recording duplicate-key issues in the report.
    pub fn build(
        desktop: &'a VariantTree,
        tablet: &'a VariantTree,
        mobile: &'a VariantTree,
        report: &mut MergeReport,
    ) -> Self {
        let mut index = IdentityIndex::default();
        index.collect(Tier::Desktop, &desktop.root, report);
        index.collect(Tier::Tablet, &tablet.root, report);
        index.collect(Tier::Mobile, &mobile.root, report);

        debug!(
            keys = index.entries.len(),
            excluded = index.excluded.len(),
            "Built identity index"
        );
        index
    }

    fn collect(&mut self, tier: Tier, root: &'a Element, report: &mut MergeReport) {
        let mut seen: HashSet<&str> = HashSet::new();
        root.walk(&mut |element| {
            let key = element.identity_key.as_str();
            if !seen.insert(key) {
                warn!(key, %tier, "Duplicate identity key, excluding from merge");
                report.record(MergeIssue::DuplicateIdentity {
                    key: key.to_string(),
                    tier,
                });
                self.excluded.insert(key.to_string());
                return;
            }

            let entry = self.entries.entry(key.to_string()).or_default();
            match tier {
                Tier::Desktop => entry.desktop = Some(element),
                Tier::Tablet => entry.tablet = Some(element),
                Tier::Mobile => entry.mobile = Some(element),
            }
        });
    }

    pub fn entry(&self, key: &str) -> Option<&TierEntry<'a>> {
        self.entries.get(key)
    }

    pub fn presence(&self, key: &str) -> PresenceSet {
        self.entries
            .get(key)
            .map(|entry| entry.presence())
            .unwrap_or_default()
    }

    /// Whether a key was disqualified by a duplicate within one tree.
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    /// Keys with no desktop slot. The merged tree uses the desktop
    /// shape, so these elements cannot appear in the output.
    pub fn missing_at_desktop(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.desktop.is_none())
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
