//! Component reconciliation across the three breakpoint exports
//!
//! Top-level driver: discovers which named sub-components exist in all
//! three exports, runs the element-level merge per shared component, and
//! assembles the page in the desktop tier's composition order. A
//! component missing from any tier is excluded with a warning, never
//! silently guessed.

use reweave_semantics::{BreakpointDescriptor, Breakpoints, Tier};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::conflict::{detect_conflicts, GroupRegistry};
use crate::identity::IdentityIndex;
use crate::merger::merge_classes;
use crate::normalizer::identical_classes;
use crate::report::{MergeError, MergeIssue, MergeReport, MergeResult, MergeStats};
use crate::stylesheet::{compile_stylesheets, MergedStylesheet, StylesheetSource};
use crate::tree::{Element, MergedElement, VariantTree};
use crate::visibility::visibility_tokens;

/// Per-run merge state: fallback breakpoint thresholds plus the
/// conflict-group registry. Passed into each component call and discarded
/// after use; no process-wide state.
pub struct MergeContext {
    /// Thresholds used when merging components directly, without
    /// breakpoint exports. [`reconcile_page`] takes its thresholds from
    /// the export descriptors instead.
    pub breakpoints: Breakpoints,
    registry: GroupRegistry,
}

impl MergeContext {
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            registry: GroupRegistry::new(),
        }
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }
}

impl Default for MergeContext {
    fn default() -> Self {
        Self::new(Breakpoints::default())
    }
}

/// One named sub-component as delivered by extraction for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentExport {
    pub name: String,
    pub tree: VariantTree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<StylesheetSource>,
}

/// Everything extraction delivers for one breakpoint: the descriptor and
/// the named sub-components, in composition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointExport {
    pub descriptor: BreakpointDescriptor,
    pub components: Vec<ComponentExport>,
}

impl BreakpointExport {
    pub fn new(descriptor: BreakpointDescriptor) -> Self {
        Self {
            descriptor,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: ComponentExport) -> Self {
        self.components.push(component);
        self
    }

    /// Exact name match only; see the fuzzy-matching note in DESIGN.md.
    pub fn component(&self, name: &str) -> Option<&ComponentExport> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Output contract per merged component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedComponent {
    pub name: String,
    pub tree: MergedElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<MergedStylesheet>,
    pub report: MergeReport,
}

/// The assembled page: merged components in the desktop tier's
/// composition order, plus warnings for components that could not merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedPage {
    pub components: Vec<MergedComponent>,
    pub warnings: Vec<MergeIssue>,
    pub stats: MergeStats,
}

/// Merge one component's three variant trees (and stylesheets, when the
/// exports carry them) into a single responsive artifact.
///
/// Media-query thresholds come from the context. Merging through
/// [`reconcile_page`] uses the export descriptors' widths instead.
pub fn merge_component(
    context: &MergeContext,
    desktop: &ComponentExport,
    tablet: &ComponentExport,
    mobile: &ComponentExport,
) -> MergedComponent {
    merge_component_with(context, context.breakpoints, desktop, tablet, mobile)
}

#[instrument(skip_all, fields(component = %desktop.name))]
fn merge_component_with(
    context: &MergeContext,
    breakpoints: Breakpoints,
    desktop: &ComponentExport,
    tablet: &ComponentExport,
    mobile: &ComponentExport,
) -> MergedComponent {
    let mut report = MergeReport::default();

    let index = IdentityIndex::build(&desktop.tree, &tablet.tree, &mobile.tree, &mut report);

    // Elements absent from desktop have no structural slot in the merged
    // tree and cannot be visibility-injected; they are dropped and
    // counted.
    report.stats.elements_dropped_missing_at_desktop = index.missing_at_desktop();

    let tree = merge_element(context, &index, &desktop.tree.root, &mut report.stats);

    let stylesheet = match (&desktop.stylesheet, &tablet.stylesheet, &mobile.stylesheet) {
        (None, None, None) => None,
        (desktop_sheet, tablet_sheet, mobile_sheet) => Some(compile_stylesheets(
            &desktop_sheet.clone().unwrap_or_default(),
            &tablet_sheet.clone().unwrap_or_default(),
            &mobile_sheet.clone().unwrap_or_default(),
            breakpoints,
            &mut report,
        )),
    };

    info!(
        elements = report.stats.elements_merged,
        conflicts = report.stats.conflicts_resolved,
        visibility = report.stats.visibility_injected,
        dropped = report.stats.elements_dropped_missing_at_desktop,
        "Merged component"
    );

    MergedComponent {
        name: desktop.name.clone(),
        tree,
        stylesheet,
        report,
    }
}

fn merge_element(
    context: &MergeContext,
    index: &IdentityIndex<'_>,
    element: &Element,
    stats: &mut MergeStats,
) -> MergedElement {
    let key = element.identity_key.as_str();
    stats.elements_merged += 1;

    let merged_class_name = if index.is_excluded(key) {
        // Duplicate key: no cross-breakpoint reconciliation, desktop
        // value kept verbatim.
        element.classes.join(" ")
    } else {
        match index.entry(key) {
            Some(entry) => {
                let identical = identical_classes(entry);
                let decisions = detect_conflicts(entry, &identical, context.registry());
                let merged = merge_classes(element, &identical, &decisions, context.registry());
                stats.conflicts_resolved += merged.conflicts_resolved;

                let injected =
                    visibility_tokens(&entry.presence(), element, context.registry());
                if injected.is_empty() {
                    merged.class_name
                } else {
                    stats.visibility_injected += 1;
                    if merged.class_name.is_empty() {
                        injected.join(" ")
                    } else {
                        format!("{} {}", merged.class_name, injected.join(" "))
                    }
                }
            }
            None => element.classes.join(" "),
        }
    };

    MergedElement {
        identity_key: element.identity_key.clone(),
        tag_kind: element.tag_kind.clone(),
        merged_class_name,
        children: element
            .children
            .iter()
            .map(|child| merge_element(context, index, child, stats))
            .collect(),
    }
}

/// Merge the three breakpoint exports of one design into a page.
///
/// The tablet and mobile descriptors' max widths set the media-query
/// thresholds of every compiled stylesheet.
///
/// Fails only on a malformed call (exports whose descriptors do not cover
/// desktop/tablet/mobile). Per-component problems degrade into warnings.
#[instrument(skip_all, fields(
    desktop_components = desktop.components.len(),
    tablet_components = tablet.components.len(),
    mobile_components = mobile.components.len(),
))]
pub fn reconcile_page(
    context: &MergeContext,
    desktop: &BreakpointExport,
    tablet: &BreakpointExport,
    mobile: &BreakpointExport,
) -> MergeResult<MergedPage> {
    for (export, expected) in [
        (desktop, Tier::Desktop),
        (tablet, Tier::Tablet),
        (mobile, Tier::Mobile),
    ] {
        if export.descriptor.tier != expected {
            return Err(MergeError::MissingTier { tier: expected });
        }
    }

    let breakpoints = Breakpoints::new(
        tablet.descriptor.max_width_px,
        mobile.descriptor.max_width_px,
    );

    info!(
        tablet_max = breakpoints.tablet_max_px,
        mobile_max = breakpoints.mobile_max_px,
        "Starting page reconciliation"
    );

    let mut components = Vec::new();
    let mut warnings = Vec::new();
    let mut stats = MergeStats::default();

    for desktop_component in &desktop.components {
        let name = desktop_component.name.as_str();
        let tablet_component = tablet.component(name);
        let mobile_component = mobile.component(name);

        let (Some(tablet_component), Some(mobile_component)) =
            (tablet_component, mobile_component)
        else {
            let mut missing = Vec::new();
            if tablet_component.is_none() {
                missing.push(Tier::Tablet);
            }
            if mobile_component.is_none() {
                missing.push(Tier::Mobile);
            }
            warn!(component = name, ?missing, "Component missing from tier, skipping");
            warnings.push(MergeIssue::MissingComponent {
                name: name.to_string(),
                missing,
            });
            continue;
        };

        let merged = merge_component_with(
            context,
            breakpoints,
            desktop_component,
            tablet_component,
            mobile_component,
        );
        stats.absorb(&merged.report.stats);
        components.push(merged);
    }

    // Components that only exist at narrower tiers cannot be placed in
    // the desktop composition; report them too.
    for export in [tablet, mobile] {
        for component in &export.components {
            if desktop.component(&component.name).is_none()
                && !warnings.iter().any(|issue| {
                    matches!(issue, MergeIssue::MissingComponent { name, .. } if *name == component.name)
                })
            {
                debug!(component = %component.name, "Component absent from desktop export");
                warnings.push(MergeIssue::MissingComponent {
                    name: component.name.clone(),
                    missing: vec![Tier::Desktop],
                });
            }
        }
    }

    info!(
        merged = components.len(),
        skipped = warnings.len(),
        "Page reconciliation complete"
    );

    Ok(MergedPage {
        components,
        warnings,
        stats,
    })
}
