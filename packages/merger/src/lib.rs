pub mod conflict;
pub mod identity;
pub mod merger;
pub mod normalizer;
pub mod reconciler;
pub mod report;
pub mod stylesheet;
pub mod tree;
pub mod visibility;


#[cfg(test)]
mod tests_reconciler;

#[cfg(test)]
mod tests_stylesheet;

pub use conflict::{detect_conflicts, GroupRegistry, MergeDecision};
pub use identity::{IdentityIndex, TierEntry};
pub use merger::{merge_classes, MergedClasses};
pub use normalizer::identical_classes;
pub use reconciler::{
    merge_component, reconcile_page, BreakpointExport, ComponentExport, MergeContext,
    MergedComponent, MergedPage,
};
pub use report::{MergeError, MergeIssue, MergeReport, MergeResult, MergeStats};
pub use stylesheet::{
    compile_stylesheets, MergedStylesheet, StyleRule, StylesheetSection, StylesheetSource,
};
pub use tree::{Element, MergedElement, VariantTree};
pub use visibility::visibility_tokens;
