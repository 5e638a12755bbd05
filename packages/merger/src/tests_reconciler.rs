/// Tests for page-level reconciliation
/// Component discovery, missing-tier warnings, descriptor validation and
/// aggregate stats.
use crate::*;
use reweave_semantics::{BreakpointDescriptor, Breakpoints, Tier};

fn component(name: &str, tier: Tier, root: Element) -> ComponentExport {
    ComponentExport {
        name: name.to_string(),
        tree: VariantTree::new(tier, root),
        stylesheet: None,
    }
}

fn export_for(tier: Tier, components: Vec<ComponentExport>) -> BreakpointExport {
    let max_width = match tier {
        Tier::Desktop => 1440,
        Tier::Tablet => 1024,
        Tier::Mobile => 640,
    };
    BreakpointExport {
        descriptor: BreakpointDescriptor::new(tier, max_width),
        components,
    }
}

#[cfg(test)]
mod reconciler_tests {
    use super::*;

    #[test]
    fn test_shared_components_are_merged_in_desktop_order() {
        let context = MergeContext::default();

        let desktop = export_for(
            Tier::Desktop,
            vec![
                component("Header", Tier::Desktop, Element::new("h", "header")),
                component("Footer", Tier::Desktop, Element::new("f", "footer")),
            ],
        );
        let tablet = export_for(
            Tier::Tablet,
            vec![
                component("Footer", Tier::Tablet, Element::new("f", "footer")),
                component("Header", Tier::Tablet, Element::new("h", "header")),
            ],
        );
        let mobile = export_for(
            Tier::Mobile,
            vec![
                component("Header", Tier::Mobile, Element::new("h", "header")),
                component("Footer", Tier::Mobile, Element::new("f", "footer")),
            ],
        );

        let page = reconcile_page(&context, &desktop, &tablet, &mobile).unwrap();

        let names: Vec<&str> = page.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Header", "Footer"]);
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_component_missing_from_one_tier_is_excluded_with_warning() {
        let context = MergeContext::default();

        let desktop = export_for(
            Tier::Desktop,
            vec![
                component("Header", Tier::Desktop, Element::new("h", "header")),
                component("Promo", Tier::Desktop, Element::new("p", "section")),
            ],
        );
        let tablet = export_for(
            Tier::Tablet,
            vec![component("Header", Tier::Tablet, Element::new("h", "header"))],
        );
        let mobile = export_for(
            Tier::Mobile,
            vec![
                component("Header", Tier::Mobile, Element::new("h", "header")),
                component("Promo", Tier::Mobile, Element::new("p", "section")),
            ],
        );

        let page = reconcile_page(&context, &desktop, &tablet, &mobile).unwrap();

        assert_eq!(page.components.len(), 1);
        assert_eq!(page.warnings.len(), 1);
        assert!(matches!(
            &page.warnings[0],
            MergeIssue::MissingComponent { name, missing }
                if name == "Promo" && missing == &vec![Tier::Tablet]
        ));
    }

    #[test]
    fn test_component_only_at_narrow_tiers_is_reported() {
        let context = MergeContext::default();

        let desktop = export_for(Tier::Desktop, vec![]);
        let tablet = export_for(
            Tier::Tablet,
            vec![component("Drawer", Tier::Tablet, Element::new("d", "nav"))],
        );
        let mobile = export_for(
            Tier::Mobile,
            vec![component("Drawer", Tier::Mobile, Element::new("d", "nav"))],
        );

        let page = reconcile_page(&context, &desktop, &tablet, &mobile).unwrap();

        assert!(page.components.is_empty());
        assert_eq!(page.warnings.len(), 1);
        assert!(matches!(
            &page.warnings[0],
            MergeIssue::MissingComponent { name, missing }
                if name == "Drawer" && missing == &vec![Tier::Desktop]
        ));
    }

    #[test]
    fn test_exact_name_match_only() {
        let context = MergeContext::default();

        let desktop = export_for(
            Tier::Desktop,
            vec![component("Header", Tier::Desktop, Element::new("h", "header"))],
        );
        // Case differs: never matched.
        let tablet = export_for(
            Tier::Tablet,
            vec![component("header", Tier::Tablet, Element::new("h", "header"))],
        );
        let mobile = export_for(
            Tier::Mobile,
            vec![component("Header", Tier::Mobile, Element::new("h", "header"))],
        );

        let page = reconcile_page(&context, &desktop, &tablet, &mobile).unwrap();

        assert!(page.components.is_empty());
        assert_eq!(page.warnings.len(), 2);
    }

    #[test]
    fn test_mismatched_descriptor_is_fatal() {
        let context = MergeContext::default();
        let desktop = export_for(Tier::Desktop, vec![]);
        let mobile = export_for(Tier::Mobile, vec![]);

        let result = reconcile_page(&context, &desktop, &mobile.clone(), &mobile);
        assert!(matches!(
            result,
            Err(MergeError::MissingTier { tier: Tier::Tablet })
        ));
    }

    #[test]
    fn test_page_stats_aggregate_components() {
        let context = MergeContext::new(Breakpoints::new(1024, 640));

        let desktop = export_for(
            Tier::Desktop,
            vec![
                component(
                    "Nav",
                    Tier::Desktop,
                    Element::new("nav", "nav").with_class("flex-row"),
                ),
                component(
                    "Aside",
                    Tier::Desktop,
                    Element::new("aside", "aside")
                        .with_child(Element::new("ad", "div").with_class("w-64")),
                ),
            ],
        );
        let tablet = export_for(
            Tier::Tablet,
            vec![
                component(
                    "Nav",
                    Tier::Tablet,
                    Element::new("nav", "nav").with_class("flex-row"),
                ),
                component(
                    "Aside",
                    Tier::Tablet,
                    Element::new("aside", "aside")
                        .with_child(Element::new("ad", "div").with_class("w-64")),
                ),
            ],
        );
        let mobile = export_for(
            Tier::Mobile,
            vec![
                component(
                    "Nav",
                    Tier::Mobile,
                    Element::new("nav", "nav").with_class("flex-col"),
                ),
                component("Aside", Tier::Mobile, Element::new("aside", "aside")),
            ],
        );

        let page = reconcile_page(&context, &desktop, &tablet, &mobile).unwrap();

        assert_eq!(page.stats.elements_merged, 3);
        assert_eq!(page.stats.conflicts_resolved, 1);
        assert_eq!(page.stats.visibility_injected, 1);

        let ad = page.components[1].tree.find_by_key("ad").unwrap();
        assert!(ad.class_list().contains(&"mobile-only:hidden"));
    }

    #[test]
    fn test_descriptor_widths_set_media_thresholds() {
        // Exports carry 900px/500px descriptors; the context keeps its
        // stock 1024/640 thresholds and must not win.
        let context = MergeContext::default();

        let styled = |tier: Tier, padding: &str| ComponentExport {
            name: "Card".to_string(),
            tree: VariantTree::new(tier, Element::new("root", "div")),
            stylesheet: Some(StylesheetSource {
                custom_classes: format!(".card {{ padding: {}; }}", padding),
                ..StylesheetSource::default()
            }),
        };

        let desktop = BreakpointExport {
            descriptor: BreakpointDescriptor::new(Tier::Desktop, 1440),
            components: vec![styled(Tier::Desktop, "32px")],
        };
        let tablet = BreakpointExport {
            descriptor: BreakpointDescriptor::new(Tier::Tablet, 900),
            components: vec![styled(Tier::Tablet, "16px")],
        };
        let mobile = BreakpointExport {
            descriptor: BreakpointDescriptor::new(Tier::Mobile, 500),
            components: vec![styled(Tier::Mobile, "8px")],
        };

        let page = reconcile_page(&context, &desktop, &tablet, &mobile).unwrap();
        let css = page.components[0].stylesheet.as_ref().unwrap().to_css();

        assert!(css.contains("@media (max-width: 900px)"));
        assert!(css.contains("@media (max-width: 500px)"));
        assert!(!css.contains("1024px"));
        assert!(!css.contains("640px"));
    }

    #[test]
    fn test_input_contract_round_trips_through_json() {
        let export = export_for(
            Tier::Desktop,
            vec![component(
                "Hero",
                Tier::Desktop,
                Element::new("root", "div").with_class("flex"),
            )],
        );

        let json = serde_json::to_string(&export).unwrap();
        let back: BreakpointExport = serde_json::from_str(&json).unwrap();
        assert_eq!(export, back);
    }
}
