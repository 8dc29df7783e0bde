use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Which scanner produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Fields,
    Buttons,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDecision {
    DocumentLoaded,
    FieldRecorded,
    FieldSkipped,
    SelectWithoutOptions,
    LabelCollision,
    SectionDropped,
    TabDropped,
    ButtonUnique,
    ButtonDuplicate,
    ButtonManual,
}

/// One line of the JSONL scan trace.
#[derive(Debug, Serialize)]
pub struct ScanEvent {
    pub timestamp_ms: u128,
    pub scan: ScanKind,
    pub decision: ScanDecision,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ScanEvent {
    pub fn now(scan: ScanKind, decision: ScanDecision) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            scan,
            decision,
            tab: None,
            section: None,
            label: None,
            element: None,
            detail: None,
        }
    }

    pub fn with_tab(mut self, tab: impl ToString) -> Self {
        self.tab = Some(tab.to_string());
        self
    }

    pub fn with_section(mut self, section: impl ToString) -> Self {
        self.section = Some(section.to_string());
        self
    }

    pub fn with_label(mut self, label: impl ToString) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_element(mut self, element: impl ToString) -> Self {
        self.element = Some(element.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
