use scraper::ElementRef;

use crate::dom::document::{element_path, tag_name};
use crate::error::ScanError;
use crate::scan::scan_config::ScanConfig;

/// What a form control is, decided once per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Radio,
    Checkbox,
    Select,
    /// Any other data-bearing control; carries the effective type (`text`, `email`, `textarea`, ...)
    TextLike(String),
    /// Not a test field (`file`, `submit`, `hidden`, ...)
    Skip(String),
}

impl ElementKind {
    /// The `type` written into the field descriptor.
    pub fn type_name(&self) -> &str {
        match self {
            ElementKind::Radio => "radio",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Select => "select",
            ElementKind::TextLike(t) | ElementKind::Skip(t) => t,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ElementKind::Skip(_))
    }
}

/// Classify a control from its tag and (for `input`) its lowercased `type`.
pub fn classify_control(tag: &str, input_type: Option<&str>, config: &ScanConfig) -> ElementKind {
    let effective = match (tag, input_type) {
        ("input", Some(t)) => t.to_ascii_lowercase(),
        _ => tag.to_ascii_lowercase(),
    };

    if config.is_skip_type(&effective) {
        return ElementKind::Skip(effective);
    }

    match effective.as_str() {
        "radio" => ElementKind::Radio,
        "checkbox" => ElementKind::Checkbox,
        "select" => ElementKind::Select,
        _ => ElementKind::TextLike(effective),
    }
}

/// Classify a DOM element. An `input` without a `type` attribute is an error.
pub fn classify_element(el: ElementRef<'_>, config: &ScanConfig) -> Result<ElementKind, ScanError> {
    let tag = tag_name(el);
    let input_type = if tag == "input" {
        let t = el
            .value()
            .attr("type")
            .ok_or_else(|| ScanError::missing_attribute("type", element_path(el)))?;
        Some(t)
    } else {
        None
    };

    Ok(classify_control(&tag, input_type, config))
}
