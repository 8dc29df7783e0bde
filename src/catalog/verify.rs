use scraper::ElementRef;
use tracing::{debug, info};

use crate::catalog::field_catalog::FieldCatalog;
use crate::dom::document::{Document, parse_selector};
use crate::dom::xpath::XPath;
use crate::report::report_model::{CheckStatus, CheckTarget, LocatorCheck, VerifyReport};
use crate::scan::scan_model::LocatorType;

/// Resolve every locator of a catalog against a document.
///
/// Tab locators are resolved from the document, section locators inside the
/// tab body and field locators inside the section body. When a container does
/// not resolve to exactly one element its children are not checked.
pub fn verify(catalog: &FieldCatalog, doc: &Document) -> VerifyReport {
    let mut checks = Vec::new();

    for tab in catalog.tabs().values() {
        let (body_check, tab_body) = check(doc, None, &tab.name, CheckTarget::TabBody, &tab.body, LocatorType::Css);
        checks.push(body_check);
        let (title_check, _) = check(doc, None, &tab.name, CheckTarget::TabTitle, &tab.title, LocatorType::Css);
        checks.push(title_check);

        let Some(tab_body) = tab_body else {
            debug!(tab = %tab.name, "tab body not found, skipping its sections");
            continue;
        };

        for section in tab.sections.values() {
            let path = format!("{} / {}", tab.name, section.name);
            let (body_check, section_body) = check(
                doc,
                Some(tab_body),
                &path,
                CheckTarget::SectionBody,
                &section.body,
                LocatorType::Css,
            );
            checks.push(body_check);
            let (title_check, _) = check(
                doc,
                Some(tab_body),
                &path,
                CheckTarget::SectionTitle,
                &section.title,
                LocatorType::Css,
            );
            checks.push(title_check);

            let Some(section_body) = section_body else {
                debug!(section = %path, "section body not found, skipping its fields");
                continue;
            };

            for (label, field) in &section.fields {
                let (field_check, _) = check(
                    doc,
                    Some(section_body),
                    &format!("{} / {}", path, label),
                    CheckTarget::Field,
                    &field.locator,
                    field.locator_type,
                );
                checks.push(field_check);
            }
        }
    }

    let report = VerifyReport::from_checks(doc.source(), doc.digest(), checks);
    info!(
        source = %report.source,
        passed = report.passed,
        failed = report.failed,
        "verified descriptors"
    );
    report
}

/// Run one check. The matched element is returned only when the locator is unambiguous.
fn check<'a>(
    doc: &'a Document,
    base: Option<ElementRef<'a>>,
    path: &str,
    target: CheckTarget,
    locator: &str,
    locator_type: LocatorType,
) -> (LocatorCheck, Option<ElementRef<'a>>) {
    let (status, element) = match resolve(doc, base, locator, locator_type) {
        Ok(found) => match found.as_slice() {
            [] => (CheckStatus::Missing, None),
            [one] => (CheckStatus::Found, Some(*one)),
            many => (CheckStatus::Ambiguous(many.len()), None),
        },
        Err(message) => (CheckStatus::Invalid(message), None),
    };

    let check = LocatorCheck {
        path: path.to_string(),
        target,
        locator: locator.to_string(),
        locator_type,
        status,
    };
    (check, element)
}

fn resolve<'a>(
    doc: &'a Document,
    base: Option<ElementRef<'a>>,
    locator: &str,
    locator_type: LocatorType,
) -> Result<Vec<ElementRef<'a>>, String> {
    match locator_type {
        LocatorType::Css => {
            let selector = parse_selector(locator).map_err(|e| e.to_string())?;
            Ok(doc.select_with(base, &selector))
        }
        LocatorType::Xpath => {
            let xpath = XPath::parse(locator).map_err(|e| e.to_string())?;
            Ok(xpath.select(doc, base))
        }
    }
}
