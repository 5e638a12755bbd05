/// Integration tests for the stylesheet output mode
/// Runs the component merge with per-tier stylesheet sources attached and
/// checks the merged artifact and its CSS serialization.
use crate::*;
use reweave_semantics::{Breakpoints, Tier};

fn sheet(imports: &str, root: &str, utilities: &str, custom: &str) -> StylesheetSource {
    StylesheetSource {
        imports: imports.to_string(),
        root_tokens: root.to_string(),
        utilities: utilities.to_string(),
        custom_classes: custom.to_string(),
    }
}

fn export(tier: Tier, stylesheet: Option<StylesheetSource>) -> ComponentExport {
    ComponentExport {
        name: "Card".to_string(),
        tree: VariantTree::new(tier, Element::new("root", "div").with_class("flex")),
        stylesheet,
    }
}

#[cfg(test)]
mod stylesheet_integration_tests {
    use super::*;

    #[test]
    fn test_component_without_stylesheets_yields_none() {
        let context = MergeContext::default();
        let merged = merge_component(
            &context,
            &export(Tier::Desktop, None),
            &export(Tier::Tablet, None),
            &export(Tier::Mobile, None),
        );

        assert!(merged.stylesheet.is_none());
    }

    #[test]
    fn test_missing_narrow_stylesheet_is_treated_as_empty() {
        let context = MergeContext::default();
        let merged = merge_component(
            &context,
            &export(
                Tier::Desktop,
                Some(sheet("", "", "", ".card { padding: 32px; }")),
            ),
            &export(Tier::Tablet, None),
            &export(Tier::Mobile, None),
        );

        let stylesheet = merged.stylesheet.unwrap();
        assert_eq!(stylesheet.desktop_rules.len(), 1);
        assert!(stylesheet.tablet_rules.is_empty());
        assert!(stylesheet.mobile_rules.is_empty());
    }

    #[test]
    fn test_desktop_sections_survive_verbatim() {
        let context = MergeContext::default();
        let desktop_sheet = sheet(
            "@import url(\"fonts.css\");",
            ":root { --primary: #36f; }",
            ".flex { display: flex; }",
            ".card { padding: 32px; }",
        );
        let tablet_sheet = sheet(
            "@import url(\"other.css\");",
            ":root { --primary: #36f; }",
            ".flex { display: flex; }",
            ".card { padding: 16px; }",
        );
        let mobile_sheet = tablet_sheet.clone();

        let merged = merge_component(
            &context,
            &export(Tier::Desktop, Some(desktop_sheet)),
            &export(Tier::Tablet, Some(tablet_sheet)),
            &export(Tier::Mobile, Some(mobile_sheet)),
        );

        let stylesheet = merged.stylesheet.unwrap();
        // Imports and utilities come from desktop only, no merge.
        assert!(stylesheet.imports.contains("fonts.css"));
        assert!(!stylesheet.imports.contains("other.css"));
        assert!(stylesheet.utilities.contains("display: flex"));
    }

    #[test]
    fn test_direct_merge_thresholds_fall_back_to_context() {
        // Merging a single component carries no breakpoint descriptors,
        // so the context thresholds apply. Page reconciliation takes
        // them from the export descriptors instead.
        let context = MergeContext::new(Breakpoints::new(900, 500));
        let merged = merge_component(
            &context,
            &export(
                Tier::Desktop,
                Some(sheet("", "", "", ".card { padding: 32px; }")),
            ),
            &export(
                Tier::Tablet,
                Some(sheet("", "", "", ".card { padding: 16px; }")),
            ),
            &export(
                Tier::Mobile,
                Some(sheet("", "", "", ".card { padding: 8px; }")),
            ),
        );

        let css = merged.stylesheet.unwrap().to_css();
        assert!(css.contains("@media (max-width: 900px)"));
        assert!(css.contains("@media (max-width: 500px)"));
    }

    #[test]
    fn test_stylesheet_merge_is_deterministic() {
        let context = MergeContext::default();
        let desktop_sheet = sheet(
            "",
            ":root { --gap: 32px; --radius: 8px; }",
            "",
            ".card { padding: 32px; }\n.title { font-size: 24px; }",
        );
        let tablet_sheet = sheet(
            "",
            ":root { --gap: 16px; }",
            "",
            ".card { padding: 16px; }\n.title { font-size: 24px; }",
        );
        let mobile_sheet = sheet(
            "",
            ":root { --gap: 8px; }",
            "",
            ".card { padding: 8px; }\n.title { font-size: 18px; }",
        );

        let run = || {
            merge_component(
                &context,
                &export(Tier::Desktop, Some(desktop_sheet.clone())),
                &export(Tier::Tablet, Some(tablet_sheet.clone())),
                &export(Tier::Mobile, Some(mobile_sheet.clone())),
            )
            .stylesheet
            .unwrap()
            .to_css()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_unparsable_custom_section_degrades() {
        let context = MergeContext::default();
        let merged = merge_component(
            &context,
            &export(
                Tier::Desktop,
                Some(sheet("", "", "", ".card { padding: 32px; }")),
            ),
            &export(Tier::Tablet, Some(sheet("", "", "", ".broken { nope"))),
            &export(
                Tier::Mobile,
                Some(sheet("", "", "", ".card { padding: 8px; }")),
            ),
        );

        let stylesheet = merged.stylesheet.unwrap();
        // Tablet section treated as empty: nothing to diff against
        // desktop, and mobile diffs against an empty tablet tier.
        assert!(stylesheet.tablet_rules.is_empty());
        assert_eq!(stylesheet.mobile_rules.len(), 1);
        assert!(merged.report.issues.iter().any(|issue| matches!(
            issue,
            MergeIssue::UnparsableStylesheetSection {
                tier: Tier::Tablet,
                section: StylesheetSection::CustomClasses,
            }
        )));
    }
}
