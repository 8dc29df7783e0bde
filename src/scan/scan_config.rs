use serde::{Deserialize, Serialize};

/// What happens when two fields of one section resolve to the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The later field replaces the earlier one (last write wins).
    #[default]
    Overwrite,
    /// The later field is stored under `"<label> (n)"`.
    Suffix,
}

/// Markup conventions the scanners rely on.
///
/// Defaults match the AngularJS application the descriptors are written for:
/// tabs are `ng-form`s inside `div.tab-pane`, sections are `panel-view` panels,
/// fields are bound with `ng-model`, panels are pulled in with `ng-include`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub tab_selector: String,
    pub tab_name_attribute: String,

    pub section_selector: String,
    /// XPath from a section body to the container holding its heading
    pub section_container_xpath: String,
    pub section_heading_selector: String,

    /// XPath from a section body to the element carrying the include reference
    pub include_xpath: String,
    pub include_attribute: String,

    pub field_selector: String,
    pub model_attribute: String,
    /// Effective types that never become fields
    pub skip_types: Vec<String>,
    pub manual_fix_marker: String,
    pub on_label_collision: CollisionPolicy,

    pub button_selector: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tab_selector: "div.tab-pane ng-form".to_string(),
            tab_name_attribute: "name".to_string(),
            section_selector: "panel-view div.panel-body".to_string(),
            section_container_xpath: "ancestor::panel-view[1]".to_string(),
            section_heading_selector: "div.panel-heading".to_string(),
            include_xpath: "ancestor::div[@ng-include][1]".to_string(),
            include_attribute: "ng-include".to_string(),
            field_selector: "input, select, textarea".to_string(),
            model_attribute: "ng-model".to_string(),
            skip_types: ["file", "image", "reset", "button", "submit", "hidden"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            manual_fix_marker: "FIXME::".to_string(),
            on_label_collision: CollisionPolicy::Overwrite,
            button_selector: "button".to_string(),
        }
    }
}

impl ScanConfig {
    pub fn is_skip_type(&self, effective_type: &str) -> bool {
        self.skip_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(effective_type))
    }
}
