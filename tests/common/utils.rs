use std::path::PathBuf;

use ng_locator_scan::dom::document::Document;

pub fn fixture_path(name: &str) -> PathBuf {
    let base = std::env::current_dir().unwrap();
    base.join("tests").join("fixtures").join(name)
}

pub fn fixture_html(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Parse a fixture page from `tests/fixtures`.
pub fn load_fixture(name: &str) -> Document {
    Document::from_file(fixture_path(name).to_str().unwrap()).unwrap()
}

/// Wrap form markup in the tab/section scaffolding the field scanner expects.
pub fn single_section(fields: &str) -> String {
    format!(
        r#"<html><body>
<div class="tab-pane"><ng-form name="main">
  <div ng-include="'views/main.html'">
    <panel-view header="Main">
      <div class="panel-heading">Main</div>
      <div class="panel-body"><form>{}</form></div>
    </panel-view>
  </div>
</ng-form></div>
</body></html>"#,
        fields
    )
}
