use scraper::ElementRef;

use crate::dom::document::{Document, text_content};
use crate::dom::normalize::collapse_whitespace;
use crate::error::ScanError;

/// One way of guessing a field's human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    /// Nearest `<label>` among the element's preceding siblings
    PrecedingSiblingLabel,
    /// Nearest `<label>` among the parent's preceding siblings
    ParentPrecedingSiblingLabel,
    /// The model identifier itself (always succeeds)
    ModelIdentifier,
}

/// Lookup order used by the field scanner.
pub const DEFAULT_LABEL_CHAIN: [LabelSource; 3] = [
    LabelSource::PrecedingSiblingLabel,
    LabelSource::ParentPrecedingSiblingLabel,
    LabelSource::ModelIdentifier,
];

impl LabelSource {
    fn xpath(self) -> Option<&'static str> {
        match self {
            LabelSource::PrecedingSiblingLabel => Some("preceding-sibling::label[1]"),
            LabelSource::ParentPrecedingSiblingLabel => Some("../preceding-sibling::label[1]"),
            LabelSource::ModelIdentifier => None,
        }
    }

    /// Whitespace-collapsed label text, or `None` when this source has nothing usable.
    pub fn lookup(
        self,
        doc: &Document,
        el: ElementRef<'_>,
        model: &str,
    ) -> Result<Option<String>, ScanError> {
        let expr = match self.xpath() {
            Some(expr) => expr,
            None => return Ok(Some(model.to_string()).filter(|m| !m.is_empty())),
        };

        let found = doc
            .xpath(expr, Some(el))?
            .and_then(|labels| labels.into_iter().next())
            .and_then(|label| collapse_whitespace(&text_content(label)));
        Ok(found)
    }
}

/// Walk `chain` and return the first label found, with the source that produced it.
///
/// Falls back to the raw model identifier when the chain yields nothing.
pub fn infer_label(
    doc: &Document,
    el: ElementRef<'_>,
    model: &str,
    chain: &[LabelSource],
) -> Result<(String, LabelSource), ScanError> {
    for source in chain {
        if let Some(label) = source.lookup(doc, el, model)? {
            return Ok((label, *source));
        }
    }
    Ok((model.to_string(), LabelSource::ModelIdentifier))
}
