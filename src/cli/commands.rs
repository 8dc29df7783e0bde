use scraper::ElementRef;
use tracing::{info, warn};

use crate::catalog::field_catalog::{FieldCatalog, load_buttons};
use crate::catalog::verify::verify;
use crate::cli::config::{AppConfig, ReportFormat, ScanArgs, SourceArgs};
use crate::cli::export::{save_json, write_output};
use crate::dom::document::{Document, element_path, text_content};
use crate::dom::normalize::collapse_whitespace;
use crate::error::ScanError;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::scan::button_scanner::ButtonScanner;
use crate::scan::field_scanner::FieldScanner;
use crate::scan::scan_model::{ButtonBuckets, FieldScan};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{ScanDecision, ScanEvent, ScanKind};

// ============================================================================
// fields subcommand
// ============================================================================

pub fn cmd_fields(
    args: &ScanArgs,
    config: &AppConfig,
    tracer: &TraceLogger,
) -> Result<FieldScan, Box<dyn std::error::Error>> {
    let doc = load_document(&args.source, ScanKind::Fields, tracer)?;

    let mut acc = match &args.merge {
        Some(path) => FieldScan::from_tabs(FieldCatalog::load(path)?.into_tabs()),
        None => FieldScan::new(),
    };

    let scanner = FieldScanner::new(&config.scan).with_tracer(tracer);
    for root in resolve_roots(&doc, &args.roots)? {
        acc = scanner.scan_into(&doc, root, acc)?;
    }

    let path = args.output.as_deref().unwrap_or(&config.output.fields_file);
    save_json(&acc.tabs, path)?;
    info!(path, fields = acc.field_count(), "field descriptors written");

    let review = FieldCatalog::new(acc.tabs.clone()).needs_review(&config.scan.manual_fix_marker);
    for item in &review {
        warn!(
            tab = %item.tab,
            section = %item.section,
            locator = %item.locator,
            "no label found for {}",
            item.label
        );
    }

    Ok(acc)
}

// ============================================================================
// buttons subcommand
// ============================================================================

pub fn cmd_buttons(
    args: &ScanArgs,
    config: &AppConfig,
    tracer: &TraceLogger,
) -> Result<ButtonBuckets, Box<dyn std::error::Error>> {
    let doc = load_document(&args.source, ScanKind::Buttons, tracer)?;

    let mut buckets = match &args.merge {
        Some(path) => load_buttons(path)?,
        None => ButtonBuckets::new(),
    };

    let scanner = ButtonScanner::new(&config.scan).with_tracer(tracer);
    for root in resolve_roots(&doc, &args.roots)? {
        buckets = scanner.scan(&doc, root, buckets)?;
    }

    let path = args.output.as_deref().unwrap_or(&config.output.buttons_file);
    save_json(&buckets, path)?;
    info!(
        path,
        unique = buckets.labels.len(),
        duplicates = buckets.duplicates.len(),
        manual = buckets.manual.len(),
        "button buckets written"
    );

    Ok(buckets)
}

// ============================================================================
// xpath subcommand
// ============================================================================

/// Print one line per match: element path, then its collapsed text.
/// Returns the number of matches.
pub fn cmd_xpath(
    source: &SourceArgs,
    expr: &str,
    base: Option<&str>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let doc = load_document(source, ScanKind::Fields, &TraceLogger::disabled())?;

    let base_el = match base {
        Some(css) => Some(
            doc.select(None, css)?
                .into_iter()
                .next()
                .ok_or_else(|| format!("base selector '{}' matches nothing", css))?,
        ),
        None => None,
    };

    let Some(found) = doc.xpath(expr, base_el)? else {
        warn!(expr, "no element matches");
        return Ok(0);
    };

    for el in &found {
        println!("{}", describe(*el));
    }
    Ok(found.len())
}

fn describe(el: ElementRef<'_>) -> String {
    match collapse_whitespace(&text_content(el)) {
        Some(text) => format!("{}\t{}", element_path(el), text),
        None => element_path(el),
    }
}

// ============================================================================
// verify subcommand
// ============================================================================

/// Returns `true` when every locator resolved to exactly one element.
pub fn cmd_verify(
    source: &SourceArgs,
    descriptors: &str,
    format: ReportFormat,
    output: Option<&str>,
    tracer: &TraceLogger,
) -> Result<bool, Box<dyn std::error::Error>> {
    let catalog = FieldCatalog::load(descriptors)?;
    if catalog.is_empty() {
        warn!(descriptors, "no descriptors found, nothing to verify");
        return Ok(true);
    }

    let doc = load_document(source, ScanKind::Fields, tracer)?;

    let start = std::time::Instant::now();
    let report = verify(&catalog, &doc).with_duration(start.elapsed().as_millis());
    let all_passed = report.all_passed();

    // Format report
    let output_content = match format {
        ReportFormat::Junit => generate_junit_xml(&report),
        ReportFormat::Json => serde_json::to_string_pretty(&report).map_err(|e| ScanError::Json {
            context: "verification report".into(),
            source: e,
        })?,
        ReportFormat::Console => format_console_report(&report),
    };

    // Write or print
    match output {
        Some(path) => write_output(&output_content, path)?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Load the page named by `--html` or `--url` and record it in the trace.
pub fn load_document(
    source: &SourceArgs,
    scan: ScanKind,
    tracer: &TraceLogger,
) -> Result<Document, ScanError> {
    let doc = match (&source.html, &source.url) {
        (Some(path), _) => Document::from_file(path)?,
        (None, Some(url)) => Document::fetch(url)?,
        (None, None) => return Err(ScanError::MissingSource),
    };

    info!(source = doc.source(), digest = doc.digest(), "document loaded");
    tracer.log(
        &ScanEvent::now(scan, ScanDecision::DocumentLoaded)
            .with_element(doc.source())
            .with_detail(doc.digest()),
    );
    Ok(doc)
}

/// Scan roots for the given `--root` selectors, in order: every match of the first
/// selector, then every match of the second, and so on. No selectors means the whole document.
pub fn resolve_roots<'a>(
    doc: &'a Document,
    selectors: &[String],
) -> Result<Vec<Option<ElementRef<'a>>>, ScanError> {
    if selectors.is_empty() {
        return Ok(vec![None]);
    }

    let mut roots = Vec::new();
    for css in selectors {
        let matches = doc.select(None, css)?;
        if matches.is_empty() {
            warn!(selector = %css, "root selector matches nothing");
        }
        roots.extend(matches.into_iter().map(Some));
    }
    Ok(roots)
}
