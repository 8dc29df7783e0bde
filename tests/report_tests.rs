use ng_locator_scan::report::console::format_console_report;
use ng_locator_scan::report::junit::{escape_xml, generate_junit_xml};
use ng_locator_scan::report::report_model::{CheckStatus, CheckTarget, LocatorCheck, VerifyReport};
use ng_locator_scan::scan::scan_model::LocatorType;

// ============================================================================
// Helper builders
// ============================================================================

fn check(path: &str, target: CheckTarget, locator: &str, status: CheckStatus) -> LocatorCheck {
    LocatorCheck {
        path: path.to_string(),
        target,
        locator: locator.to_string(),
        locator_type: LocatorType::Css,
        status,
    }
}

fn mixed_report() -> VerifyReport {
    VerifyReport::from_checks(
        "saved/case.html",
        "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        vec![
            check("details", CheckTarget::TabBody, r#"ng-form[name="details"]"#, CheckStatus::Found),
            check(
                "details / General / Title",
                CheckTarget::Field,
                r#"input[ng-model="case.title"]"#,
                CheckStatus::Missing,
            ),
            check(
                "details / General / Low",
                CheckTarget::Field,
                r#"input[type="radio"]"#,
                CheckStatus::Ambiguous(2),
            ),
        ],
    )
}

// ============================================================================
// 1. Report counts
// ============================================================================

#[test]
fn report_from_checks_counts() {
    let report = mixed_report();
    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 2);
    assert!(!report.all_passed());
    assert_eq!(report.failures().count(), 2);
}

#[test]
fn report_empty_is_passing() {
    let report = VerifyReport::from_checks("x.html", "", vec![]);
    assert_eq!(report.total, 0);
    assert!(report.all_passed());
}

#[test]
fn failure_messages_per_status() {
    let found = check("t", CheckTarget::TabBody, "a", CheckStatus::Found);
    assert!(found.passed());
    assert_eq!(found.failure_message(), None);

    let ambiguous = check("t", CheckTarget::TabBody, "a", CheckStatus::Ambiguous(3));
    assert_eq!(
        ambiguous.failure_message().as_deref(),
        Some("3 elements match css locator")
    );

    let invalid = check("t", CheckTarget::TabBody, "a[", CheckStatus::Invalid("bad".into()));
    assert_eq!(invalid.failure_message().as_deref(), Some("invalid css locator: bad"));
}

// ============================================================================
// 2. Console output
// ============================================================================

#[test]
fn console_lists_checks_and_summary() {
    let out = format_console_report(&mixed_report());

    assert!(out.starts_with("=== Locator check: saved/case.html ===\n"));
    assert!(out.contains("\u{2713} PASS  details [tab body]\n"));
    assert!(out.contains("\u{2717} FAIL  details / General / Title [field]\n"));
    assert!(out.contains(r#"    no element matches css locator: input[ng-model="case.title"]"#));
    assert!(out.contains("2 elements match css locator"));
    assert!(out.ends_with("=== Results: 1 passed, 2 failed (3 total) ===\n"));
}

#[test]
fn console_shows_duration() {
    let out = format_console_report(&mixed_report().with_duration(1500));
    assert!(out.contains("(3 total) in 1.5s ==="));
}

// ============================================================================
// 3. JUnit XML
// ============================================================================

#[test]
fn junit_has_suite_and_cases() {
    let xml = generate_junit_xml(&mixed_report());

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains(r#"<testsuite name="saved/case.html" tests="3" failures="2">"#));
    assert!(xml.contains(r#"<testcase name="details [tab body]" classname="ng-locator-scan" />"#));
    assert_eq!(xml.matches("<testcase ").count(), 3);
    assert_eq!(xml.matches("<failure ").count(), 2);
    assert!(xml.trim_end().ends_with("</testsuite>"));
}

#[test]
fn junit_escapes_locators() {
    let xml = generate_junit_xml(&mixed_report());
    assert!(xml.contains("input[ng-model=&quot;case.title&quot;]</failure>"));
    assert!(!xml.contains(r#"ng-model="case.title""#));
}

#[test]
fn junit_time_attribute_when_timed() {
    let xml = generate_junit_xml(&mixed_report().with_duration(250));
    assert!(xml.contains(r#"failures="2" time="0.250">"#));
}

#[test]
fn escape_xml_all_specials() {
    assert_eq!(
        escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
    );
}

// ============================================================================
// 4. JSON
// ============================================================================

#[test]
fn report_json_shape() {
    let json = serde_json::to_value(mixed_report()).unwrap();

    assert_eq!(json["total"], 3);
    assert!(json.get("duration_ms").is_none());
    assert_eq!(json["checks"][0]["target"], "tab_body");
    assert_eq!(json["checks"][0]["status"]["status"], "found");
    assert_eq!(json["checks"][0]["locator_type"], "css");
    assert_eq!(json["checks"][2]["status"]["status"], "ambiguous");
    assert_eq!(json["checks"][2]["status"]["detail"], 2);
}
