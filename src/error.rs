use thiserror::Error;

use crate::dom::xpath::XPathError;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Reading an input or descriptor file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing an output file failed
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Fetching a page over HTTP failed
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Neither a file nor a URL was given for the page
    #[error("no page source given: pass --html or --url")]
    MissingSource,

    /// A configured or generated CSS selector could not be parsed
    #[error("invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error(transparent)]
    XPath(#[from] XPathError),

    /// An element the scan depends on has no expected ancestor or heading
    #[error("no {what} found for element {element}")]
    MissingAncestor { what: String, element: String },

    /// An element lacks an attribute the scan must read
    #[error("element {element} has no '{attribute}' attribute")]
    MissingAttribute { attribute: String, element: String },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScanError {
    pub fn missing_ancestor(what: &str, element: String) -> Self {
        ScanError::MissingAncestor {
            what: what.to_string(),
            element,
        }
    }

    pub fn missing_attribute(attribute: &str, element: String) -> Self {
        ScanError::MissingAttribute {
            attribute: attribute.to_string(),
            element,
        }
    }
}
