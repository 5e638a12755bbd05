//! Class-set normalization
//!
//! Computes, per matched element, the subset of utility classes that are
//! textually identical across all three variants. Identical classes are
//! excluded from conflict analysis, bounding the detector's cost to the
//! symmetric difference only.

use std::collections::HashSet;

use crate::identity::TierEntry;

/// The classes an element carries identically at desktop, tablet and
/// mobile. Elements present in fewer than three trees have nothing to
/// normalize against and produce an empty set.
pub fn identical_classes(entry: &TierEntry<'_>) -> HashSet<String> {
    let (Some(desktop), Some(tablet), Some(mobile)) = (entry.desktop, entry.tablet, entry.mobile)
    else {
        return HashSet::new();
    };

    let tablet_set: HashSet<&str> = tablet.classes.iter().map(String::as_str).collect();
    let mobile_set: HashSet<&str> = mobile.classes.iter().map(String::as_str).collect();

    desktop
        .classes
        .iter()
        .filter(|class| tablet_set.contains(class.as_str()) && mobile_set.contains(class.as_str()))
        .cloned()
        .collect()
}
