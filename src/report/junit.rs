use crate::report::console::target_name;
use crate::report::report_model::VerifyReport;

// ============================================================================
// JUnit XML reporter: standard CI integration format
// ============================================================================

/// Generate a JUnit XML report, one testcase per locator check.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="saved/case.html" tests="2" failures="1">
///   <testcase name="details [tab body]" classname="ng-locator-scan" />
///   <testcase name="details / General / Title [field]" classname="ng-locator-scan">
///     <failure message="no element matches css locator" type="LocatorFailure">input[ng-model="case.title"]</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &VerifyReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for check in &report.checks {
        let name = format!("{} [{}]", check.path, target_name(check.target));

        match check.failure_message() {
            None => cases.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"ng-locator-scan\" />\n",
                escape_xml(&name)
            )),
            Some(message) => cases.push_str(&format!(
                "  <testcase name=\"{name}\" classname=\"ng-locator-scan\">\n    <failure message=\"{message}\" type=\"LocatorFailure\">{body}</failure>\n  </testcase>\n",
                name = escape_xml(&name),
                message = escape_xml(&message),
                body = escape_xml(&check.locator),
            )),
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.source),
        tests = report.total,
        failures = report.failed,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
