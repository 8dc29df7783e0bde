use ng_locator_scan::dom::normalize::{
    collapse_whitespace, collapse_xml_space, normalize_label, parse_include_source,
    strip_required_marker,
};

// ============================================================================
// Whitespace and required marker
// ============================================================================

#[test]
fn collapse_trims_and_joins_runs() {
    assert_eq!(
        collapse_whitespace("  Case \n\t  number  "),
        Some("Case number".to_string())
    );
}

#[test]
fn collapse_of_blank_is_none() {
    assert_eq!(collapse_whitespace(" \n\t "), None);
    assert_eq!(collapse_whitespace(""), None);
}

#[test]
fn collapse_xml_space_leaves_other_unicode_spaces() {
    assert_eq!(collapse_xml_space("\n\t Due\u{a0}date \r\n"), "Due\u{a0}date");
    assert_eq!(collapse_xml_space(" a \t b "), "a b");
    assert_eq!(collapse_xml_space(" \n "), "");
    assert_eq!(collapse_whitespace("Due\u{a0}date"), Some("Due date".to_string()));
}

#[test]
fn strip_removes_trailing_marker_only() {
    assert_eq!(strip_required_marker("Title *"), "Title");
    assert_eq!(strip_required_marker("Title  *"), "Title");
    assert_eq!(strip_required_marker("* Title"), "* Title");
    assert_eq!(strip_required_marker("Title*"), "Title*");
    assert_eq!(strip_required_marker("Title"), "Title");
}

#[test]
fn normalize_label_collapses_then_strips() {
    assert_eq!(normalize_label("\n  Due   date *\n"), Some("Due date".to_string()));
    assert_eq!(normalize_label("Enabled *"), Some("Enabled".to_string()));
}

#[test]
fn normalize_label_needs_space_before_marker() {
    assert_eq!(normalize_label("  *"), Some("*".to_string()));
    assert_eq!(normalize_label(" x *").as_deref(), Some("x"));
    assert_eq!(normalize_label("   "), None);
}

// ============================================================================
// ng-include sources
// ============================================================================

#[test]
fn include_single_quoted_literal() {
    assert_eq!(
        parse_include_source("'modules/case/general.html'"),
        "modules/case/general.html"
    );
}

#[test]
fn include_double_quoted_literal_with_padding() {
    assert_eq!(parse_include_source("  \"views/a.html\" "), "views/a.html");
}

#[test]
fn include_concatenated_literals() {
    assert_eq!(
        parse_include_source("'views/' + 'parties/' +\"contacts.html\""),
        "views/parties/contacts.html"
    );
}

#[test]
fn include_escaped_quote() {
    assert_eq!(parse_include_source(r"'it\'s.html'"), "it's.html");
}

#[test]
fn include_expression_is_kept_verbatim() {
    assert_eq!(parse_include_source(" vm.templateUrl "), "vm.templateUrl");
    assert_eq!(
        parse_include_source("'views/' + vm.page"),
        "'views/' + vm.page"
    );
    assert_eq!(parse_include_source("'unterminated"), "'unterminated");
    assert_eq!(parse_include_source("'a' +"), "'a' +");
}
