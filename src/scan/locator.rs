// Fixed locator templates for the AngularJS page layout.

pub fn tab_body(tab: &str) -> String {
    format!("ng-form[name={}]", css_string(tab))
}

pub fn tab_title(tab: &str) -> String {
    format!("li[active={}]", css_string(&format!("tabs.{}TabActive", tab)))
}

pub fn section_body(section: &str) -> String {
    format!("panel-view[header={}] div.panel-body form", css_string(section))
}

pub fn section_title(section: &str) -> String {
    format!("panel-view[header={}] div.panel-heading", css_string(section))
}

/// `tag[model-attribute="model"]`
pub fn model_css(tag: &str, model_attribute: &str, model: &str) -> String {
    format!("{}[{}={}]", tag, model_attribute, css_string(model))
}

/// Narrow a CSS locator to the control with the given `value` (radio buttons).
pub fn with_value(locator: &str, value: &str) -> String {
    format!("{}[value={}]", locator, css_string(value))
}

/// The checkbox sitting inside the label whose full text is `label_text`,
/// relative to the section body.
pub fn checkbox_xpath(label_text: &str) -> String {
    format!(
        ".//label[normalize-space(.)={}]/input[@type='checkbox']",
        xpath_literal(label_text)
    )
}

/// Double-quoted CSS string.
pub fn css_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// XPath 1.0 string literal; XPath has no escapes, so mixed quotes need `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
