mod common;

use common::utils::load_fixture;
use ng_locator_scan::dom::document::{Document, element_path, fingerprint, tag_name, text_content};
use ng_locator_scan::dom::xpath::{XPath, XPathError};
use ng_locator_scan::error::ScanError;

const PAGE: &str = r#"<html><body>
<div id="a">
  <label>First</label>
  <label>Second</label>
  <input id="x" type="text" ng-model="m.x">
  <span>tail</span>
</div>
<div id="b" class="box">
  <p>one</p><p>two</p><p>three</p>
  <label><input type="checkbox" id="c"> Enabled *</label>
</div>
</body></html>"#;

fn ids(found: &[scraper::ElementRef<'_>]) -> Vec<String> {
    found
        .iter()
        .map(|e| e.value().attr("id").unwrap_or(tag_name(*e).as_str()).to_string())
        .collect()
}

fn first<'a>(doc: &'a Document, css: &str) -> scraper::ElementRef<'a> {
    doc.select(None, css).unwrap()[0]
}

// ============================================================================
// Document
// ============================================================================

#[test]
fn document_select_in_document_order() {
    let doc = Document::parse(PAGE);
    let found = doc.select(None, "div").unwrap();
    assert_eq!(ids(&found), vec!["a", "b"]);
}

#[test]
fn document_select_excludes_base() {
    let doc = Document::parse(PAGE);
    let base = first(&doc, "div#a");
    let found = doc.select(Some(base), "div, label").unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|e| tag_name(*e) == "label"));
}

#[test]
fn document_invalid_selector_is_an_error() {
    let doc = Document::parse(PAGE);
    let err = doc.select(None, "input[").unwrap_err();
    assert!(matches!(err, ScanError::InvalidSelector { .. }));
}

#[test]
fn document_digest_is_sha1_of_source() {
    let doc = Document::parse("<p>hi</p>");
    assert_eq!(doc.digest(), fingerprint("<p>hi</p>"));
    assert_eq!(doc.digest().len(), 40);
    assert_eq!(doc.source(), "<inline>");
}

#[test]
fn document_from_file_keeps_path_as_source() {
    let doc = load_fixture("case_form.html");
    assert!(doc.source().ends_with("case_form.html"));
}

#[test]
fn document_from_missing_file_is_io_error() {
    let err = Document::from_file("/no/such/page.html").err().unwrap();
    assert!(matches!(err, ScanError::Io { .. }));
}

#[test]
fn element_path_is_index_qualified() {
    let doc = Document::parse(PAGE);
    let p = doc.select(None, "p").unwrap();
    assert_eq!(element_path(p[1]), "/html[1]/body[1]/div[2]/p[2]");
}

#[test]
fn element_path_round_trips_through_xpath() {
    let doc = Document::parse(PAGE);
    let input = first(&doc, "#c");
    let found = doc.xpath(&element_path(input), None).unwrap().unwrap();
    assert_eq!(found, vec![input]);
}

// ============================================================================
// XPath: axes and steps
// ============================================================================

#[test]
fn xpath_returns_none_when_nothing_matches() {
    let doc = Document::parse(PAGE);
    assert!(doc.xpath("//table", None).unwrap().is_none());
}

#[test]
fn xpath_descendant_search_from_document() {
    let doc = Document::parse(PAGE);
    let found = doc.xpath("//p", None).unwrap().unwrap();
    let texts: Vec<String> = found.iter().map(|e| text_content(*e)).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn xpath_nearest_preceding_sibling_label() {
    let doc = Document::parse(PAGE);
    let input = first(&doc, "#x");
    let found = doc.xpath("preceding-sibling::label[1]", Some(input)).unwrap().unwrap();
    assert_eq!(text_content(found[0]), "Second");
}

#[test]
fn xpath_preceding_siblings_come_back_in_document_order() {
    let doc = Document::parse(PAGE);
    let input = first(&doc, "#x");
    let found = doc.xpath("preceding-sibling::label", Some(input)).unwrap().unwrap();
    let texts: Vec<String> = found.iter().map(|e| text_content(*e)).collect();
    assert_eq!(texts, vec!["First", "Second"]);
}

#[test]
fn xpath_parent_step_then_sibling() {
    let doc = Document::parse(PAGE);
    let checkbox = first(&doc, "#c");
    let found = doc.xpath("../preceding-sibling::p[1]", Some(checkbox)).unwrap().unwrap();
    assert_eq!(text_content(found[0]), "three");
}

#[test]
fn xpath_nearest_ancestor_with_attribute() {
    let doc = Document::parse(PAGE);
    let checkbox = first(&doc, "#c");
    let found = doc.xpath("ancestor::div[@class][1]", Some(checkbox)).unwrap().unwrap();
    assert_eq!(ids(&found), vec!["b"]);
}

#[test]
fn xpath_following_sibling_and_self() {
    let doc = Document::parse(PAGE);
    let input = first(&doc, "#x");
    let found = doc.xpath("following-sibling::*", Some(input)).unwrap().unwrap();
    assert_eq!(ids(&found), vec!["span"]);
    let same = doc.xpath("self::input", Some(input)).unwrap().unwrap();
    assert_eq!(same, vec![input]);
}

#[test]
fn xpath_union_is_deduplicated_and_ordered() {
    let doc = Document::parse(PAGE);
    let found = doc.xpath("//div[@id='b'] | //div | //span", None).unwrap().unwrap();
    assert_eq!(ids(&found), vec!["a", "span", "b"]);
}

// ============================================================================
// XPath: predicates and functions
// ============================================================================

#[test]
fn xpath_label_text_matches_checkbox_locator() {
    let doc = Document::parse(PAGE);
    let found = doc
        .xpath(
            ".//label[normalize-space(text())='Enabled *']/input[@type='checkbox']",
            Some(first(&doc, "#b")),
        )
        .unwrap()
        .unwrap();
    assert_eq!(ids(&found), vec!["c"]);
}

#[test]
fn xpath_normalize_space_of_whole_label() {
    let doc = Document::parse(
        "<div><label>\n  <input type=\"checkbox\" id=\"k\">\n  Enabled *\n</label></div>",
    );
    let by_text = doc
        .xpath(".//label[normalize-space(text())='Enabled *']/input", None)
        .unwrap();
    assert!(by_text.is_none());
    let by_string = doc
        .xpath(".//label[normalize-space(.)='Enabled *']/input", None)
        .unwrap()
        .unwrap();
    assert_eq!(ids(&by_string), vec!["k"]);
}

#[test]
fn xpath_normalize_space_keeps_no_break_space() {
    let doc = Document::parse("<div><label>Due&nbsp;date</label></div>");
    assert!(doc.xpath("//label[normalize-space(.)='Due date']", None).unwrap().is_none());
    assert!(doc.xpath("//label[contains(., 'Due\u{a0}date')]", None).unwrap().is_some());
}

#[test]
fn xpath_positional_predicates() {
    let doc = Document::parse(PAGE);
    let second = doc.xpath("//p[2]", None).unwrap().unwrap();
    assert_eq!(text_content(second[0]), "two");
    let last = doc.xpath("//p[last()]", None).unwrap().unwrap();
    assert_eq!(text_content(last[0]), "three");
    let later = doc.xpath("//p[position() != 1]", None).unwrap().unwrap();
    assert_eq!(later.len(), 2);
}

#[test]
fn xpath_string_functions() {
    let doc = Document::parse(PAGE);
    let found = doc
        .xpath("//p[contains(., 'o') and not(starts-with(., 't'))]", None)
        .unwrap()
        .unwrap();
    assert_eq!(text_content(found[0]), "one");

    let counted = doc.xpath("//div[count(p) = 3]", None).unwrap().unwrap();
    assert_eq!(ids(&counted), vec!["b"]);

    let joined = doc
        .xpath("//input[@ng-model = concat('m', '.', 'x')]", None)
        .unwrap()
        .unwrap();
    assert_eq!(ids(&joined), vec!["x"]);
}

#[test]
fn xpath_or_and_not_equal() {
    let doc = Document::parse(PAGE);
    let found = doc.xpath("//div[@id='a' or @id='zz']", None).unwrap().unwrap();
    assert_eq!(ids(&found), vec!["a"]);
    let others = doc.xpath("//div[@id != 'a']", None).unwrap().unwrap();
    assert_eq!(ids(&others), vec!["b"]);
}

#[test]
fn xpath_names_are_case_insensitive() {
    let doc = Document::parse(PAGE);
    assert!(doc.xpath("//DIV", None).unwrap().is_some());
}

// ============================================================================
// XPath: errors
// ============================================================================

#[test]
fn xpath_parse_error_reports_offset() {
    let err = XPath::parse("//div[").unwrap_err();
    match err {
        XPathError::Parse { offset, .. } => assert_eq!(offset, 6),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn xpath_unterminated_literal() {
    assert!(matches!(XPath::parse("//a[@b='x]"), Err(XPathError::Parse { .. })));
}

#[test]
fn xpath_unsupported_axis_and_function() {
    assert!(matches!(
        XPath::parse("following::div"),
        Err(XPathError::Unsupported { .. })
    ));
    assert!(matches!(
        XPath::parse("//div[translate(., 'a', 'b')]"),
        Err(XPathError::Unsupported { .. })
    ));
    assert!(matches!(XPath::parse("//div/@id"), Err(XPathError::Unsupported { .. })));
}

#[test]
fn xpath_errors_surface_through_document() {
    let doc = Document::parse(PAGE);
    let err = doc.xpath("//div[", None).unwrap_err();
    assert!(matches!(err, ScanError::XPath(XPathError::Parse { .. })));
}
