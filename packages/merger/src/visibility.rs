//! Visibility injection for structurally absent elements
//!
//! The merged tree always carries the desktop tier's shape, so an element
//! absent from a narrower tier still exists in the DOM there. Hide/show
//! override tokens compensate so the kept structure renders correctly at
//! every breakpoint. An element missing from desktop has no node to
//! attach overrides to and is dropped (counted, never silently).

use reweave_semantics::{prefixed, PresenceSet, Tier};

use crate::conflict::GroupRegistry;
use crate::tree::Element;

const HIDDEN: &str = "hidden";
const DEFAULT_DISPLAY: &str = "block";

/// The hide/show tokens to append for one element, given where it is
/// present. Empty when the element exists at every tier.
pub fn visibility_tokens(
    presence: &PresenceSet,
    desktop: &Element,
    registry: &GroupRegistry,
) -> Vec<String> {
    debug_assert!(presence.desktop, "caller drops elements missing at desktop");

    match (presence.tablet, presence.mobile) {
        // Present everywhere: nothing to inject.
        (true, true) => Vec::new(),

        // Absent only at mobile: hide at the narrowest tier.
        (true, false) => vec![prefixed(Tier::Mobile, HIDDEN)],

        // Desktop-only: tablet-or-narrower covers mobile as well.
        (false, false) => vec![prefixed(Tier::Tablet, HIDDEN)],

        // Sandwich absence (desktop + mobile, no tablet): hide at tablet
        // and restore the element's own display value at mobile.
        (false, true) => {
            let display = registry.display_token(desktop).unwrap_or(DEFAULT_DISPLAY);
            vec![
                prefixed(Tier::Tablet, HIDDEN),
                prefixed(Tier::Mobile, display),
            ]
        }
    }
}
