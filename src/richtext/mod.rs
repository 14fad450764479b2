//! Rich-text normalization for HTML-bearing fields
//!
//! Announcement bodies and descriptions arrive as HTML fragments. This module
//! turns them into plain text (block boundaries kept as single line breaks,
//! whitespace collapsed) and an ordered list of links, in a single forward
//! pass over the html5ever token stream.

mod extractor;
mod sink;

pub use extractor::{
    extract, extract_links, extract_text, Extraction, Link, Markup, RichTextExtractor,
};
pub use sink::{tokenize, ExtractorSink};
