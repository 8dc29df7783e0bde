use ng_locator_scan::trace::logger::TraceLogger;
use ng_locator_scan::trace::trace::{ScanDecision, ScanEvent, ScanKind};

#[test]
fn trace_appends_one_json_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let tracer = TraceLogger::new(path.to_str().unwrap());

    tracer.log(
        &ScanEvent::now(ScanKind::Buttons, ScanDecision::ButtonDuplicate)
            .with_label("title::Save")
            .with_element("/html[1]/body[1]/button[2]"),
    );
    tracer.log(&ScanEvent::now(ScanKind::Fields, ScanDecision::TabDropped).with_tab("archive"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["scan"], "buttons");
    assert_eq!(lines[0]["decision"], "button_duplicate");
    assert_eq!(lines[0]["label"], "title::Save");
    assert!(lines[0].get("tab").is_none());
    assert_eq!(lines[1]["decision"], "tab_dropped");
    assert_eq!(lines[1]["tab"], "archive");
    assert!(lines[1]["timestamp_ms"].as_u64().unwrap() > 0);
}

#[test]
fn trace_unwritable_path_is_disabled() {
    let tracer = TraceLogger::new("/nonexistent/dir/trace.jsonl");
    assert!(!tracer.is_enabled());
    // Logging to a disabled tracer is a no-op
    tracer.log(&ScanEvent::now(ScanKind::Fields, ScanDecision::FieldRecorded));
}

#[test]
fn trace_disabled_logger() {
    assert!(!TraceLogger::disabled().is_enabled());
}
