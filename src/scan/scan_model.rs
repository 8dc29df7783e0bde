use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Field descriptors (fieldData.json)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorType {
    Css,
    Xpath,
}

impl fmt::Display for LocatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorType::Css => write!(f, "css"),
            LocatorType::Xpath => write!(f, "xpath"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// The emitted label (also the key of the field in its section)
    pub name: String,
    /// Effective type: the input `type`, or the tag for `select`/`textarea`
    #[serde(rename = "type")]
    pub field_type: String,
    pub locator: String,
    pub locator_type: LocatorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub name: String,
    pub body: String,
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabDescriptor {
    pub name: String,
    pub body: String,
    pub title: String,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionDescriptor>,
}

/// Tab name → tab descriptor: the whole content of a `fieldData.json`.
pub type TabMap = BTreeMap<String, TabDescriptor>;

/// Two fields of one section resolved to the same label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCollision {
    pub tab: String,
    pub section: String,
    pub label: String,
    /// Locator of the field already recorded under the label
    pub existing: String,
    /// Locator of the field that arrived later
    pub incoming: String,
    /// Key the incoming field was stored under
    pub stored_as: String,
}

/// Field-scan accumulator, threaded through successive scans.
#[derive(Debug, Clone, Default)]
pub struct FieldScan {
    pub tabs: TabMap,
    pub collisions: Vec<LabelCollision>,
}

impl FieldScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from previously exported descriptors.
    pub fn from_tabs(tabs: TabMap) -> Self {
        Self {
            tabs,
            collisions: vec![],
        }
    }

    pub fn field_count(&self) -> usize {
        self.tabs
            .values()
            .flat_map(|t| t.sections.values())
            .map(|s| s.fields.len())
            .sum()
    }

    pub fn section_count(&self) -> usize {
        self.tabs.values().map(|t| t.sections.len()).sum()
    }
}

// ============================================================================
// Button buckets (buttons.json)
// ============================================================================

/// Where a button's label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSourceKind {
    Title,
    Text,
}

impl fmt::Display for LabelSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSourceKind::Title => write!(f, "title"),
            LabelSourceKind::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonRecord {
    pub label: String,
    pub locator: LabelSourceKind,
    #[serde(default)]
    pub class: Option<String>,
    /// Absolute XPath of the button in the scanned capture
    pub element: String,
}

impl ButtonRecord {
    pub fn key(&self) -> String {
        button_key(self.locator, &self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualButton {
    #[serde(default)]
    pub class: Option<String>,
    pub element: String,
}

/// Composite identity of a labeled button: `"<locator>::<label>"`.
pub fn button_key(locator: LabelSourceKind, label: &str) -> String {
    format!("{}::{}", locator, label)
}

/// Button-scan accumulator.
///
/// Every visited button lands in exactly one bucket: `labels` (first occurrence
/// of a key), `duplicates` (any later occurrence), or `manual` (no usable label).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonBuckets {
    #[serde(default)]
    pub labels: BTreeMap<String, ButtonRecord>,
    #[serde(default)]
    pub duplicates: Vec<ButtonRecord>,
    #[serde(default)]
    pub manual: Vec<ManualButton>,
}

impl ButtonBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.labels.len() + self.duplicates.len() + self.manual.len()
    }
}
