//! Issue collection and merge statistics
//!
//! A single malformed element or stylesheet section must never abort the
//! merge of sibling elements or other components, so nothing here is
//! thrown mid-merge: issues are accumulated into the report that ships
//! with the merged artifact.

use reweave_semantics::Tier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stylesheet::StylesheetSection;

pub type MergeResult<T> = Result<T, MergeError>;

/// Fatal errors for facade misuse. The merge itself degrades instead of
/// failing; see [`MergeIssue`].
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Missing export for tier {tier}")]
    MissingTier { tier: Tier },
}

/// Non-fatal conditions collected during a merge.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MergeIssue {
    /// The same identity key appeared twice within one tree. The key is
    /// excluded from reconciliation and its desktop value kept verbatim.
    #[error("Duplicate identity key '{key}' in {tier} tree")]
    DuplicateIdentity { key: String, tier: Tier },

    /// A named sub-component is absent from one or two tiers and was
    /// excluded from the merge.
    #[error("Component '{name}' missing from {missing:?}")]
    MissingComponent { name: String, missing: Vec<Tier> },

    /// A stylesheet section failed to parse and was treated as empty.
    #[error("Unparsable {section} section in {tier} stylesheet")]
    UnparsableStylesheetSection {
        tier: Tier,
        section: StylesheetSection,
    },
}

/// Counters reported per merged component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub elements_merged: usize,
    pub conflicts_resolved: usize,
    pub visibility_injected: usize,
    pub elements_dropped_missing_at_desktop: usize,
}

impl MergeStats {
    pub fn absorb(&mut self, other: &MergeStats) {
        self.elements_merged += other.elements_merged;
        self.conflicts_resolved += other.conflicts_resolved;
        self.visibility_injected += other.visibility_injected;
        self.elements_dropped_missing_at_desktop += other.elements_dropped_missing_at_desktop;
    }
}

/// Stats plus every issue observed while producing one artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    pub stats: MergeStats,
    pub issues: Vec<MergeIssue>,
}

impl MergeReport {
    pub fn record(&mut self, issue: MergeIssue) {
        self.issues.push(issue);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
