use crate::report::report_model::{CheckTarget, VerifyReport};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a verification report for terminal output.
///
/// Produces output like:
/// ```text
/// === Locator check: saved/case.html ===
///
/// ✓ PASS  details [tab body]
/// ✗ FAIL  details / General / Title [field]
///     no element matches css locator: input[ng-model="case.title"]
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &VerifyReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Locator check: {} ===\n\n", report.source));

    for check in &report.checks {
        let marker = if check.passed() {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} [{}]\n",
            marker,
            check.path,
            target_name(check.target)
        ));

        if let Some(message) = check.failure_message() {
            out.push_str(&format!("    {}: {}\n", message, check.locator));
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

pub fn target_name(target: CheckTarget) -> &'static str {
    match target {
        CheckTarget::TabBody => "tab body",
        CheckTarget::TabTitle => "tab title",
        CheckTarget::SectionBody => "section body",
        CheckTarget::SectionTitle => "section title",
        CheckTarget::Field => "field",
    }
}
