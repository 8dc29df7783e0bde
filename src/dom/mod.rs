pub mod document;
pub mod normalize;
pub mod xpath;
