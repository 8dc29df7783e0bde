use scraper::ElementRef;
use tracing::{debug, info};

use crate::dom::document::{Document, element_path, parse_selector, text_content};
use crate::dom::normalize::normalize_label;
use crate::error::ScanError;
use crate::scan::scan_config::ScanConfig;
use crate::scan::scan_model::{ButtonBuckets, ButtonRecord, LabelSourceKind, ManualButton, button_key};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{ScanDecision, ScanEvent, ScanKind};

/// Sorts buttons into unique, duplicate and manual buckets by their label.
pub struct ButtonScanner<'c> {
    config: &'c ScanConfig,
    tracer: Option<&'c TraceLogger>,
}

impl<'c> ButtonScanner<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self {
            config,
            tracer: None,
        }
    }

    pub fn with_tracer(mut self, tracer: &'c TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Scan the buttons under `root` (the whole document when `None`) and add them to
    /// `buckets`. Keys already present in `buckets`, from this scan or an earlier one,
    /// send later buttons to the duplicates list.
    pub fn scan(
        &self,
        doc: &Document,
        root: Option<ElementRef<'_>>,
        mut buckets: ButtonBuckets,
    ) -> Result<ButtonBuckets, ScanError> {
        let selector = parse_selector(&self.config.button_selector)?;
        let before = buckets.total();

        for button in doc.select_with(root, &selector) {
            let class = button.value().attr("class").map(str::to_string);
            let element = element_path(button);

            let (locator, label) = match button_label(button) {
                Some(found) => found,
                None => {
                    debug!(element = %element, "button has no label, needs manual locator");
                    self.trace(ScanEvent::now(ScanKind::Buttons, ScanDecision::ButtonManual).with_element(&element));
                    buckets.manual.push(ManualButton { class, element });
                    continue;
                }
            };

            let key = button_key(locator, &label);
            let record = ButtonRecord {
                label,
                locator,
                class,
                element,
            };

            if buckets.labels.contains_key(&key) {
                debug!(key = %key, element = %record.element, "duplicate button label");
                self.trace(
                    ScanEvent::now(ScanKind::Buttons, ScanDecision::ButtonDuplicate)
                        .with_label(&key)
                        .with_element(&record.element),
                );
                buckets.duplicates.push(record);
            } else {
                self.trace(
                    ScanEvent::now(ScanKind::Buttons, ScanDecision::ButtonUnique)
                        .with_label(&key)
                        .with_element(&record.element),
                );
                buckets.labels.insert(key, record);
            }
        }

        info!(
            scanned = buckets.total() - before,
            unique = buckets.labels.len(),
            duplicates = buckets.duplicates.len(),
            manual = buckets.manual.len(),
            "button scan complete"
        );
        Ok(buckets)
    }

    fn trace(&self, event: ScanEvent) {
        if let Some(tracer) = self.tracer {
            tracer.log(&event);
        }
    }
}

/// Label of a button: its `title` attribute when usable, else its text content.
pub fn button_label(button: ElementRef<'_>) -> Option<(LabelSourceKind, String)> {
    if let Some(title) = button.value().attr("title").and_then(normalize_label) {
        return Some((LabelSourceKind::Title, title));
    }

    normalize_label(&text_content(button)).map(|text| (LabelSourceKind::Text, text))
}
