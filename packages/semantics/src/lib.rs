/// Shared breakpoint vocabulary for the responsive merge pipeline
///
/// This crate defines the three fixed viewport tiers and the responsive
/// prefixes used by the desktop-first merge. Desktop is always the
/// unprefixed base; narrower tiers are expressed as max-width overrides,
/// so the vocabulary only needs two prefixes.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Responsive prefix applied to classes that take effect at tablet width
/// and below.
pub const TABLET_PREFIX: &str = "tablet-or-narrower";

/// Responsive prefix applied to classes that take effect only at mobile
/// width.
pub const MOBILE_PREFIX: &str = "mobile-only";

/// One of the three fixed viewport-width buckets a layout is exported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Desktop,
    Tablet,
    Mobile,
}

impl Tier {
    /// All tiers, widest first. Merge passes iterate in this order.
    pub const ALL: [Tier; 3] = [Tier::Desktop, Tier::Tablet, Tier::Mobile];

    /// The responsive prefix for classes scoped to this tier, or `None`
    /// for desktop (the unprefixed base).
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Tier::Desktop => None,
            Tier::Tablet => Some(TABLET_PREFIX),
            Tier::Mobile => Some(MOBILE_PREFIX),
        }
    }

    /// The next-wider tier, used when diffing adjacent tiers.
    pub fn wider(&self) -> Option<Tier> {
        match self {
            Tier::Desktop => None,
            Tier::Tablet => Some(Tier::Desktop),
            Tier::Mobile => Some(Tier::Tablet),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Desktop => "desktop",
            Tier::Tablet => "tablet",
            Tier::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Prefix a utility token for a tier. Desktop tokens pass through
/// unchanged.
pub fn prefixed(tier: Tier, token: &str) -> String {
    match tier.prefix() {
        Some(prefix) => format!("{}:{}", prefix, token),
        None => token.to_string(),
    }
}

/// Identifies the viewport bucket a tree/stylesheet was exported at.
///
/// `max_width_px` parameterizes the media-query thresholds emitted for the
/// two non-desktop tiers; the desktop value is unused by the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointDescriptor {
    pub tier: Tier,
    pub max_width_px: u32,
}

impl BreakpointDescriptor {
    pub fn new(tier: Tier, max_width_px: u32) -> Self {
        Self { tier, max_width_px }
    }
}

/// The two max-width thresholds the merge emits media queries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub tablet_max_px: u32,
    pub mobile_max_px: u32,
}

impl Breakpoints {
    pub fn new(tablet_max_px: u32, mobile_max_px: u32) -> Self {
        Self {
            tablet_max_px,
            mobile_max_px,
        }
    }

    /// The `@media` prelude for a non-desktop tier, `None` for desktop.
    pub fn media_query(&self, tier: Tier) -> Option<String> {
        match tier {
            Tier::Desktop => None,
            Tier::Tablet => Some(format!("@media (max-width: {}px)", self.tablet_max_px)),
            Tier::Mobile => Some(format!("@media (max-width: {}px)", self.mobile_max_px)),
        }
    }
}

impl Default for Breakpoints {
    /// Thresholds used by the stock export profile.
    fn default() -> Self {
        Self::new(1024, 640)
    }
}

/// Per-identity-key presence flags across the three trees.
///
/// An element may be absent from up to two trees but must be present in at
/// least one; the visibility injector turns absences into hide/show
/// overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSet {
    pub desktop: bool,
    pub tablet: bool,
    pub mobile: bool,
}

impl PresenceSet {
    pub fn contains(&self, tier: Tier) -> bool {
        match tier {
            Tier::Desktop => self.desktop,
            Tier::Tablet => self.tablet,
            Tier::Mobile => self.mobile,
        }
    }

    pub fn mark(&mut self, tier: Tier) {
        match tier {
            Tier::Desktop => self.desktop = true,
            Tier::Tablet => self.tablet = true,
            Tier::Mobile => self.mobile = true,
        }
    }

    /// Present in all three trees.
    pub fn is_universal(&self) -> bool {
        self.desktop && self.tablet && self.mobile
    }

    pub fn count(&self) -> usize {
        [self.desktop, self.tablet, self.mobile]
            .iter()
            .filter(|p| **p)
            .count()
    }
}
