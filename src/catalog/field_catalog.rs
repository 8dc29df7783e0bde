use serde::Serialize;

use crate::error::ScanError;
use crate::scan::scan_model::{
    ButtonBuckets, FieldDescriptor, SectionDescriptor, TabDescriptor, TabMap,
};

/// A field that still carries the manual-fix marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub tab: String,
    pub section: String,
    pub label: String,
    pub locator: String,
}

/// Read-only view over a `fieldData.json`, as consumed when writing test steps.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    tabs: TabMap,
}

impl FieldCatalog {
    pub fn new(tabs: TabMap) -> Self {
        Self { tabs }
    }

    /// Parse descriptor JSON. Blank input and `null` give an empty catalog.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }

        let tabs: Option<TabMap> = serde_json::from_str(json).map_err(|e| ScanError::Json {
            context: "field descriptors".into(),
            source: e,
        })?;
        Ok(Self::new(tabs.unwrap_or_default()))
    }

    pub fn load(path: &str) -> Result<Self, ScanError> {
        Self::from_json(&read(path)?)
    }

    pub fn tabs(&self) -> &TabMap {
        &self.tabs
    }

    pub fn into_tabs(self) -> TabMap {
        self.tabs
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.keys().map(String::as_str).collect()
    }

    pub fn tab(&self, name: &str) -> Option<&TabDescriptor> {
        self.tabs.get(name)
    }

    pub fn section(&self, tab: &str, section: &str) -> Option<&SectionDescriptor> {
        self.tab(tab)?.sections.get(section)
    }

    pub fn field(&self, tab: &str, section: &str, label: &str) -> Option<&FieldDescriptor> {
        self.section(tab, section)?.fields.get(label)
    }

    pub fn field_names(&self, tab: &str, section: &str) -> Vec<&str> {
        self.section(tab, section)
            .map(|s| s.fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every field whose label starts with `marker`: no human-readable label was found.
    pub fn needs_review(&self, marker: &str) -> Vec<ReviewItem> {
        self.tabs
            .values()
            .flat_map(move |tab| {
                tab.sections.values().flat_map(move |section| {
                    section
                        .fields
                        .values()
                        .filter(move |f| f.name.starts_with(marker))
                        .map(move |f| ReviewItem {
                            tab: tab.name.clone(),
                            section: section.name.clone(),
                            label: f.name.clone(),
                            locator: f.locator.clone(),
                        })
                })
            })
            .collect()
    }
}

/// Load a `buttons.json` written by an earlier button scan.
pub fn load_buttons(path: &str) -> Result<ButtonBuckets, ScanError> {
    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(ButtonBuckets::default());
    }

    let buckets: Option<ButtonBuckets> =
        serde_json::from_str(&content).map_err(|e| ScanError::Json {
            context: format!("button buckets in {}", path),
            source: e,
        })?;
    Ok(buckets.unwrap_or_default())
}

fn read(path: &str) -> Result<String, ScanError> {
    std::fs::read_to_string(path).map_err(|e| ScanError::Io {
        path: path.to_string(),
        source: e,
    })
}
