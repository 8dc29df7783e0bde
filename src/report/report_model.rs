use serde::{Deserialize, Serialize};

use crate::scan::scan_model::LocatorType;

// ============================================================================
// Locator verification report
// ============================================================================

/// Which descriptor locator a check exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckTarget {
    TabBody,
    TabTitle,
    SectionBody,
    SectionTitle,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Exactly one element matched
    Found,
    /// More than one element matched
    Ambiguous(usize),
    Missing,
    /// The locator itself could not be parsed
    Invalid(String),
}

/// Result of resolving one locator against a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorCheck {
    /// `tab`, `tab / section` or `tab / section / field`
    pub path: String,
    pub target: CheckTarget,
    pub locator: String,
    pub locator_type: LocatorType,
    pub status: CheckStatus,
}

impl LocatorCheck {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Found
    }

    /// One-line description of a failed check.
    pub fn failure_message(&self) -> Option<String> {
        match &self.status {
            CheckStatus::Found => None,
            CheckStatus::Ambiguous(n) => Some(format!("{} elements match {} locator", n, self.locator_type)),
            CheckStatus::Missing => Some(format!("no element matches {} locator", self.locator_type)),
            CheckStatus::Invalid(msg) => Some(format!("invalid {} locator: {}", self.locator_type, msg)),
        }
    }
}

/// Aggregated checks for one descriptor file against one document.
///
/// Built via `from_checks()`. Consumed by the console and JUnit reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Where the document came from (path or URL)
    pub source: String,

    /// SHA-1 of the document text
    pub digest: String,

    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub checks: Vec<LocatorCheck>,
}

impl VerifyReport {
    /// Automatically computes total, passed, and failed counts.
    pub fn from_checks(source: &str, digest: &str, checks: Vec<LocatorCheck>) -> Self {
        let total = checks.len();
        let passed = checks.iter().filter(|c| c.passed()).count();
        Self {
            source: source.to_string(),
            digest: digest.to_string(),
            total,
            passed,
            failed: total - passed,
            duration_ms: None,
            checks,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &LocatorCheck> {
        self.checks.iter().filter(|c| !c.passed())
    }
}
