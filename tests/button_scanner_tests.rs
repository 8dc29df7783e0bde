mod common;

use common::utils::load_fixture;
use ng_locator_scan::dom::document::Document;
use ng_locator_scan::scan::button_scanner::{ButtonScanner, button_label};
use ng_locator_scan::scan::scan_config::ScanConfig;
use ng_locator_scan::scan::scan_model::{ButtonBuckets, LabelSourceKind, button_key};

fn scan(doc: &Document, buckets: ButtonBuckets) -> ButtonBuckets {
    let config = ScanConfig::default();
    ButtonScanner::new(&config).scan(doc, None, buckets).unwrap()
}

// ============================================================================
// Buckets
// ============================================================================

#[test]
fn buttons_are_partitioned() {
    let doc = load_fixture("case_form.html");
    let buckets = scan(&doc, ButtonBuckets::new());

    let keys: Vec<&str> = buckets.labels.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["text::Cancel", "text::Close", "title::Save"]);
    assert_eq!(buckets.duplicates.len(), 1);
    assert_eq!(buckets.manual.len(), 1);
    assert_eq!(buckets.total(), 5);
}

#[test]
fn first_save_is_unique_second_is_duplicate() {
    let doc = load_fixture("case_form.html");
    let buckets = scan(&doc, ButtonBuckets::new());

    let save = &buckets.labels["title::Save"];
    assert_eq!(save.label, "Save");
    assert_eq!(save.locator, LabelSourceKind::Title);
    assert_eq!(save.class.as_deref(), Some("btn btn-primary"));
    assert_eq!(save.element, "/html[1]/body[1]/div[1]/button[1]");
    assert_eq!(save.key(), "title::Save");

    let dup = &buckets.duplicates[0];
    assert_eq!(dup.key(), "title::Save");
    assert_eq!(dup.class.as_deref(), Some("btn"));
    assert_eq!(dup.element, "/html[1]/body[1]/div[1]/button[2]");
}

#[test]
fn unlabeled_button_goes_to_manual() {
    let doc = load_fixture("case_form.html");
    let buckets = scan(&doc, ButtonBuckets::new());

    let manual = &buckets.manual[0];
    assert_eq!(manual.class.as_deref(), Some("btn-icon"));
    assert_eq!(manual.element, "/html[1]/body[1]/div[1]/button[4]");
}

#[test]
fn blank_title_falls_back_to_text() {
    let doc = load_fixture("case_form.html");
    let buckets = scan(&doc, ButtonBuckets::new());
    let close = &buckets.labels["text::Close"];
    assert_eq!(close.locator, LabelSourceKind::Text);
    assert_eq!(close.label, "Close");
}

#[test]
fn same_label_from_different_sources_is_not_a_duplicate() {
    let doc = Document::parse(r#"<button title="Save">x</button><button>Save</button>"#);
    let buckets = scan(&doc, ButtonBuckets::new());
    assert_eq!(buckets.labels.len(), 2);
    assert!(buckets.duplicates.is_empty());
}

// ============================================================================
// Accumulator
// ============================================================================

#[test]
fn accumulator_sends_known_keys_to_duplicates() {
    let first = Document::parse(r#"<button title="Save">Save</button>"#);
    let second = Document::parse(r#"<div><button title="Save">Save</button><button>Delete</button></div>"#);

    let buckets = scan(&first, ButtonBuckets::new());
    let buckets = scan(&second, buckets);

    assert_eq!(buckets.labels.len(), 2);
    assert_eq!(buckets.labels["title::Save"].element, "/html[1]/body[1]/button[1]");
    assert_eq!(buckets.duplicates.len(), 1);
    assert_eq!(buckets.duplicates[0].element, "/html[1]/body[1]/div[1]/button[1]");
    assert_eq!(buckets.total(), 3);
}

#[test]
fn every_button_lands_in_one_bucket() {
    let doc = load_fixture("case_form.html");
    let visited = doc.select(None, "button").unwrap().len();
    let buckets = scan(&doc, ButtonBuckets::new());
    assert_eq!(buckets.total(), visited);
}

#[test]
fn scan_under_root_only() {
    let doc = Document::parse(
        r#"<div id="top"><button>One</button></div><div id="bottom"><button>Two</button></div>"#,
    );
    let root = doc.select(None, "#bottom").unwrap()[0];
    let config = ScanConfig::default();
    let buckets = ButtonScanner::new(&config)
        .scan(&doc, Some(root), ButtonBuckets::new())
        .unwrap();
    let keys: Vec<&str> = buckets.labels.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["text::Two"]);
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn button_label_prefers_title() {
    let doc = Document::parse(r#"<button title=" Print  all ">Print</button>"#);
    let button = doc.select(None, "button").unwrap()[0];
    assert_eq!(
        button_label(button),
        Some((LabelSourceKind::Title, "Print all".to_string()))
    );
}

#[test]
fn button_key_format() {
    assert_eq!(button_key(LabelSourceKind::Text, "Add row"), "text::Add row");
}

#[test]
fn buckets_serialize_in_json_shape() {
    let doc = Document::parse(r#"<button title="Save" class="btn">Save</button><button></button>"#);
    let buckets = scan(&doc, ButtonBuckets::new());
    let json = serde_json::to_value(&buckets).unwrap();

    assert_eq!(json["labels"]["title::Save"]["locator"], "title");
    assert_eq!(json["labels"]["title::Save"]["class"], "btn");
    assert!(json["duplicates"].as_array().unwrap().is_empty());
    assert_eq!(json["manual"][0]["class"], serde_json::Value::Null);

    let back: ButtonBuckets = serde_json::from_value(json).unwrap();
    assert_eq!(back, buckets);
}
