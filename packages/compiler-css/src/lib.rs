use reweave_common::CommonResult;
use reweave_merger::{
    compile_stylesheets, reconcile_page, BreakpointExport, MergeContext, MergeReport,
    StylesheetSource,
};
use reweave_semantics::Breakpoints;

/// Compile three per-tier stylesheet sources to merged CSS text
pub fn compile_to_css(
    desktop: &StylesheetSource,
    tablet: &StylesheetSource,
    mobile: &StylesheetSource,
    breakpoints: Breakpoints,
) -> (String, MergeReport) {
    let mut report = MergeReport::default();
    let merged = compile_stylesheets(desktop, tablet, mobile, breakpoints, &mut report);
    (merged.to_css(), report)
}

/// Reconcile a full page and emit one stylesheet covering every merged
/// component that carried stylesheet sources
pub fn compile_page_to_css(
    context: &MergeContext,
    desktop: &BreakpointExport,
    tablet: &BreakpointExport,
    mobile: &BreakpointExport,
) -> CommonResult<String> {
    let page = reconcile_page(context, desktop, tablet, mobile)?;

    let mut css = String::new();
    for component in &page.components {
        if let Some(stylesheet) = &component.stylesheet {
            css.push_str(&format!("/* {} */\n", component.name));
            css.push_str(&stylesheet.to_css());
        }
    }

    Ok(css)
}
