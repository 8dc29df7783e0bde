use scraper::{ElementRef, Selector};
use tracing::{debug, info, warn};

use crate::dom::document::{
    Document, element_path, parent_element, parse_selector, tag_name, text_content,
};
use crate::dom::normalize::{collapse_whitespace, parse_include_source, strip_required_marker};
use crate::error::ScanError;
use crate::scan::classifier::{ElementKind, classify_element};
use crate::scan::label::{DEFAULT_LABEL_CHAIN, LabelSource, infer_label};
use crate::scan::locator;
use crate::scan::scan_config::{CollisionPolicy, ScanConfig};
use crate::scan::scan_model::{
    FieldDescriptor, FieldScan, LabelCollision, LocatorType, SectionDescriptor, SelectOption,
    TabDescriptor, TabMap,
};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{ScanDecision, ScanEvent, ScanKind};

/// Walks tabs → sections → form controls and builds field descriptors.
///
/// The scan is all-or-nothing: a tab without a name, a section without a heading or
/// include reference, or an `input` without a `type` aborts it with an error.
pub struct FieldScanner<'c> {
    config: &'c ScanConfig,
    tracer: Option<&'c TraceLogger>,
    chain: Vec<LabelSource>,
}

/// Selectors compiled once per scan.
struct Selectors {
    tab: Selector,
    section: Selector,
    heading: Selector,
    field: Selector,
    option: Selector,
}

/// Where in the tab/section tree a field is being scanned.
struct Position<'p> {
    tab: &'p str,
    section: &'p str,
}

impl<'c> FieldScanner<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self {
            config,
            tracer: None,
            chain: DEFAULT_LABEL_CHAIN.to_vec(),
        }
    }

    pub fn with_tracer(mut self, tracer: &'c TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn with_label_chain(mut self, chain: &[LabelSource]) -> Self {
        self.chain = chain.to_vec();
        self
    }

    /// Scan `root` (the whole document when `None`) into a fresh tab map.
    pub fn scan(&self, doc: &Document, root: Option<ElementRef<'_>>) -> Result<TabMap, ScanError> {
        Ok(self.scan_into(doc, root, FieldScan::new())?.tabs)
    }

    /// Scan `root` and merge the result into `acc`.
    ///
    /// Tabs and sections already in the accumulator are extended, never replaced.
    pub fn scan_into(
        &self,
        doc: &Document,
        root: Option<ElementRef<'_>>,
        mut acc: FieldScan,
    ) -> Result<FieldScan, ScanError> {
        let selectors = self.compile()?;

        for tab_el in doc.select_with(root, &selectors.tab) {
            let tab_name = tab_el
                .value()
                .attr(&self.config.tab_name_attribute)
                .ok_or_else(|| {
                    ScanError::missing_attribute(&self.config.tab_name_attribute, element_path(tab_el))
                })?
                .to_string();

            let mut tab = acc.tabs.remove(&tab_name).unwrap_or_else(|| TabDescriptor {
                name: tab_name.clone(),
                body: locator::tab_body(&tab_name),
                title: locator::tab_title(&tab_name),
                sections: Default::default(),
            });

            for section_el in doc.select_with(Some(tab_el), &selectors.section) {
                let section_name = self.section_name(doc, section_el, &selectors.heading)?;
                let source = self.section_source(doc, section_el)?;

                let mut section = tab
                    .sections
                    .remove(&section_name)
                    .unwrap_or_else(|| SectionDescriptor {
                        name: section_name.clone(),
                        body: locator::section_body(&section_name),
                        title: locator::section_title(&section_name),
                        source: source.clone(),
                        fields: Default::default(),
                    });
                section.source = source;

                let position = Position {
                    tab: &tab_name,
                    section: &section_name,
                };
                for field_el in doc.select_with(Some(section_el), &selectors.field) {
                    if let Some(field) = self.scan_field(doc, field_el, &selectors.option, &position)? {
                        self.record_field(&mut section, field, &position, &mut acc.collisions);
                    }
                }

                if section.fields.is_empty() {
                    debug!(tab = %tab_name, section = %section_name, "section has no fields, dropped");
                    self.trace(
                        ScanEvent::now(ScanKind::Fields, ScanDecision::SectionDropped)
                            .with_tab(&tab_name)
                            .with_section(&section_name),
                    );
                } else {
                    tab.sections.insert(section_name, section);
                }
            }

            if tab.sections.is_empty() {
                debug!(tab = %tab_name, "tab has no sections, dropped");
                self.trace(ScanEvent::now(ScanKind::Fields, ScanDecision::TabDropped).with_tab(&tab_name));
            } else {
                acc.tabs.insert(tab_name, tab);
            }
        }

        info!(
            tabs = acc.tabs.len(),
            sections = acc.section_count(),
            fields = acc.field_count(),
            collisions = acc.collisions.len(),
            "field scan complete"
        );
        Ok(acc)
    }

    fn compile(&self) -> Result<Selectors, ScanError> {
        Ok(Selectors {
            tab: parse_selector(&self.config.tab_selector)?,
            section: parse_selector(&self.config.section_selector)?,
            heading: parse_selector(&self.config.section_heading_selector)?,
            field: parse_selector(&self.config.field_selector)?,
            option: parse_selector("option")?,
        })
    }

    fn section_name(
        &self,
        doc: &Document,
        section_el: ElementRef<'_>,
        heading: &Selector,
    ) -> Result<String, ScanError> {
        let container = doc
            .xpath(&self.config.section_container_xpath, Some(section_el))?
            .and_then(|found| found.into_iter().next())
            .ok_or_else(|| ScanError::missing_ancestor("section container", element_path(section_el)))?;

        let heading_el = doc
            .select_with(Some(container), heading)
            .into_iter()
            .next()
            .ok_or_else(|| ScanError::missing_ancestor("section heading", element_path(section_el)))?;

        Ok(collapse_whitespace(&text_content(heading_el)).unwrap_or_default())
    }

    fn section_source(&self, doc: &Document, section_el: ElementRef<'_>) -> Result<String, ScanError> {
        let missing = || ScanError::missing_ancestor("content include", element_path(section_el));

        let include = doc
            .xpath(&self.config.include_xpath, Some(section_el))?
            .and_then(|found| found.into_iter().next())
            .ok_or_else(missing)?;

        let raw = include
            .value()
            .attr(&self.config.include_attribute)
            .ok_or_else(missing)?;

        Ok(parse_include_source(raw))
    }

    fn scan_field(
        &self,
        doc: &Document,
        el: ElementRef<'_>,
        option_selector: &Selector,
        position: &Position<'_>,
    ) -> Result<Option<FieldDescriptor>, ScanError> {
        let kind = classify_element(el, self.config)?;
        let path = element_path(el);

        if let ElementKind::Skip(skipped) = &kind {
            debug!(element = %path, kind = %skipped, "skipping non-data control");
            self.trace(
                self.field_event(ScanDecision::FieldSkipped, position)
                    .with_element(&path)
                    .with_detail(skipped),
            );
            return Ok(None);
        }

        let model_attribute = &self.config.model_attribute;
        let model = el
            .value()
            .attr(model_attribute)
            .ok_or_else(|| ScanError::missing_attribute(model_attribute, path.clone()))?;

        let tag = tag_name(el);
        let (mut label, source) = infer_label(doc, el, model, &self.chain)?;
        let mut field_locator = locator::model_css(&tag, model_attribute, model);
        let mut locator_type = LocatorType::Css;
        let mut value = None;
        let mut options = None;

        match &kind {
            ElementKind::Radio => {
                // Radios are told apart by value; the label wraps the radio itself
                let radio_value = el
                    .value()
                    .attr("value")
                    .ok_or_else(|| ScanError::missing_attribute("value", path.clone()))?;
                field_locator = locator::with_value(&field_locator, radio_value);
                if let Some(text) = parent_text(el) {
                    label = text;
                }
                if !radio_value.is_empty() {
                    value = Some(radio_value.to_string());
                }
            }
            ElementKind::Checkbox => {
                if let Some(text) = parent_text(el) {
                    label = text;
                }
                field_locator = locator::checkbox_xpath(&label);
                locator_type = LocatorType::Xpath;
            }
            ElementKind::Select => {
                let choices = select_options(doc, el, option_selector);
                if choices.is_empty() {
                    debug!(element = %path, model, "select has no options, dropped");
                    self.trace(
                        self.field_event(ScanDecision::SelectWithoutOptions, position)
                            .with_element(&path)
                            .with_label(&label),
                    );
                    return Ok(None);
                }
                options = Some(choices);
            }
            ElementKind::TextLike(_) | ElementKind::Skip(_) => {}
        }

        let mut label = strip_required_marker(&label);
        if label == model {
            label = format!("{}{}", self.config.manual_fix_marker, label);
        }

        debug!(
            element = %path,
            label = %label,
            source = ?source,
            kind = kind.type_name(),
            "field recorded"
        );

        Ok(Some(FieldDescriptor {
            name: label,
            field_type: kind.type_name().to_string(),
            locator: field_locator,
            locator_type,
            value,
            options,
        }))
    }

    fn record_field(
        &self,
        section: &mut SectionDescriptor,
        mut field: FieldDescriptor,
        position: &Position<'_>,
        collisions: &mut Vec<LabelCollision>,
    ) {
        let label = field.name.clone();

        let key = match section.fields.get(&label) {
            // Re-scanning the same control is not a collision
            Some(existing) if existing.locator != field.locator => {
                let stored_as = match self.config.on_label_collision {
                    CollisionPolicy::Overwrite => label.clone(),
                    CollisionPolicy::Suffix => next_free_key(section, &label),
                };

                warn!(
                    tab = position.tab,
                    section = position.section,
                    label = %label,
                    existing = %existing.locator,
                    incoming = %field.locator,
                    stored_as = %stored_as,
                    "two fields share a label"
                );
                self.trace(
                    self.field_event(ScanDecision::LabelCollision, position)
                        .with_label(&label)
                        .with_detail(format!("{} vs {}", existing.locator, field.locator)),
                );

                collisions.push(LabelCollision {
                    tab: position.tab.to_string(),
                    section: position.section.to_string(),
                    label: label.clone(),
                    existing: existing.locator.clone(),
                    incoming: field.locator.clone(),
                    stored_as: stored_as.clone(),
                });
                stored_as
            }
            _ => label,
        };

        self.trace(
            self.field_event(ScanDecision::FieldRecorded, position)
                .with_label(&key)
                .with_detail(&field.locator),
        );
        field.name = key.clone();
        section.fields.insert(key, field);
    }

    fn field_event(&self, decision: ScanDecision, position: &Position<'_>) -> ScanEvent {
        ScanEvent::now(ScanKind::Fields, decision)
            .with_tab(position.tab)
            .with_section(position.section)
    }

    fn trace(&self, event: ScanEvent) {
        if let Some(tracer) = self.tracer {
            tracer.log(&event);
        }
    }
}

/// Whitespace-collapsed text of the element's parent.
fn parent_text(el: ElementRef<'_>) -> Option<String> {
    parent_element(el).and_then(|p| collapse_whitespace(&text_content(p)))
}

/// Options of a `select`: value from the `value` attribute (else the text, as the DOM
/// does), label from the text, else the `label` attribute, else the value.
/// Options with neither label nor value are dropped.
pub fn select_options(doc: &Document, select: ElementRef<'_>, option: &Selector) -> Vec<SelectOption> {
    doc.select_with(Some(select), option)
        .into_iter()
        .filter_map(|opt| {
            let text = collapse_whitespace(&text_content(opt));
            let value = opt
                .value()
                .attr("value")
                .map(str::to_string)
                .or_else(|| text.clone())
                .unwrap_or_default();
            let label = text
                .or_else(|| opt.value().attr("label").and_then(collapse_whitespace))
                .or_else(|| Some(value.clone()).filter(|v| !v.is_empty()))?;
            Some(SelectOption { label, value })
        })
        .collect()
}

fn next_free_key(section: &SectionDescriptor, label: &str) -> String {
    let mut n = 2;
    loop {
        let candidate = format!("{} ({})", label, n);
        if !section.fields.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
