use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use sha1::{Digest, Sha1};

use crate::dom::xpath::XPath;
use crate::error::ScanError;

/// A parsed HTML page, the stand-in for the live DOM the scanners walk.
///
/// The document is read-only once parsed. `source` describes where it came from
/// (file path or URL) and `digest` is the SHA-1 of the raw text.
pub struct Document {
    html: Html,
    source: String,
    digest: String,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self::parse_from("<inline>", html)
    }

    pub fn parse_from(source: &str, html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            source: source.to_string(),
            digest: fingerprint(html),
        }
    }

    /// Load a page saved to disk (e.g. "Save page as" after AngularJS rendered it).
    pub fn from_file(path: &str) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Ok(Self::parse_from(path, &content))
    }

    /// Fetch a page over HTTP and parse whatever the server returns.
    pub fn fetch(url: &str) -> Result<Self, ScanError> {
        let to_error = |e: reqwest::Error| ScanError::Fetch {
            url: url.to_string(),
            source: e,
        };

        let client = reqwest::blocking::Client::new();
        let body = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(to_error)?;

        Ok(Self::parse_from(url, &body))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// The `<html>` element.
    pub fn root_element(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Descendants of `base` (default: the whole document) matching `css`, in document order.
    /// `base` itself is never part of the result.
    pub fn select<'a>(
        &'a self,
        base: Option<ElementRef<'a>>,
        css: &str,
    ) -> Result<Vec<ElementRef<'a>>, ScanError> {
        let selector = parse_selector(css)?;
        Ok(self.select_with(base, &selector))
    }

    pub fn select_with<'a>(
        &'a self,
        base: Option<ElementRef<'a>>,
        selector: &Selector,
    ) -> Vec<ElementRef<'a>> {
        match base {
            Some(el) => el.select(selector).filter(|m| m.id() != el.id()).collect(),
            None => self.html.select(selector).collect(),
        }
    }

    /// Evaluate an XPath expression relative to `base` (default: the document node).
    ///
    /// Returns `None` when nothing matches.
    pub fn xpath<'a>(
        &'a self,
        expr: &str,
        base: Option<ElementRef<'a>>,
    ) -> Result<Option<Vec<ElementRef<'a>>>, ScanError> {
        let xpath = XPath::parse(expr)?;
        Ok(xpath.evaluate(self, base))
    }

    /// Restore document order and drop duplicates.
    pub(crate) fn in_document_order<'a>(&'a self, nodes: &[ElementRef<'a>]) -> Vec<ElementRef<'a>> {
        let wanted: HashSet<_> = nodes.iter().map(|n| n.id()).collect();

        self.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| wanted.contains(&e.id()))
            .collect()
    }
}

pub fn parse_selector(css: &str) -> Result<Selector, ScanError> {
    Selector::parse(css).map_err(|e| ScanError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The DOM `textContent` of an element: every descendant text node, concatenated.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// The element's direct text children, in order (XPath `text()`).
pub fn own_text_nodes(el: ElementRef<'_>) -> Vec<String> {
    el.children()
        .filter_map(|c| c.value().as_text().map(|t| t.text.to_string()))
        .collect()
}

/// Lowercased tag name.
pub fn tag_name(el: ElementRef<'_>) -> String {
    el.value().name().to_ascii_lowercase()
}

pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Absolute, index-qualified XPath of an element, e.g. `/html[1]/body[1]/div[2]/button[1]`.
///
/// Serves as a stable, serializable reference to an element of a given capture.
pub fn element_path(el: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = Some(el);

    while let Some(node) = current {
        let name = node.value().name();
        let index = 1 + node
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|s| s.value().name() == name)
            .count();
        segments.push(format!("{}[{}]", name, index));
        current = parent_element(node);
    }

    segments.reverse();
    format!("/{}", segments.join("/"))
}
