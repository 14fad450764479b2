use crate::richtext::sink::tokenize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Tags rendered as a line break in plain text
const BLOCK_TAGS: &[&str] = &["p", "br", "div"];

/// One markup event, in document order
///
/// Tag names are lowercase; text is entity-decoded and untrimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup<'a> {
    Open {
        name: &'a str,
        href: Option<&'a str>,
    },
    Close {
        name: &'a str,
    },
    Text(&'a str),
}

/// A hyperlink found in markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Visible anchor text, trimmed and never empty; inner whitespace is kept
    pub text: String,
    /// The `href` value as written; may be relative or empty
    pub url: String,
}

/// Plain text and links extracted from one markup fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub links: Vec<Link>,
}

#[derive(Debug)]
enum State {
    Default,
    InsideAnchor { target: String, text: String },
}

/// Single-pass markup to text/link converter
///
/// Feed it markup events in document order, then call
/// [`finish`](Self::finish).
/// It never fails: unmatched end tags are ignored and an anchor still open
/// at the end of input produces no link.
#[derive(Debug)]
pub struct RichTextExtractor {
    state: State,
    text: String,
    links: Vec<Link>,
}

impl Default for RichTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Default,
            text: String::new(),
            links: Vec::new(),
        }
    }

    pub fn feed(&mut self, event: Markup<'_>) {
        match event {
            Markup::Open { name: "a", href } => {
                // A nested anchor discards the unfinished outer one.
                self.state = State::InsideAnchor {
                    target: href.unwrap_or_default().to_string(),
                    text: String::new(),
                };
            }
            Markup::Open { name, .. } => {
                if BLOCK_TAGS.contains(&name) {
                    self.text.push('\n');
                }
            }
            Markup::Text(raw) => self.push_text(raw),
            Markup::Close { name: "a" } => self.close_anchor(),
            Markup::Close { .. } => {}
        }
    }

    fn push_text(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }

        // Whitespace inside a text run is never a block boundary.
        for word in trimmed.split_whitespace() {
            self.text.push_str(word);
            self.text.push(' ');
        }

        if let State::InsideAnchor { text, .. } = &mut self.state {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(trimmed);
        }
    }

    fn close_anchor(&mut self) {
        if let State::InsideAnchor { target, text } =
            std::mem::replace(&mut self.state, State::Default)
        {
            let text = text.trim();
            if !text.is_empty() {
                self.links.push(Link {
                    text: text.to_string(),
                    url: target,
                });
            }
        }
    }

    pub fn finish(self) -> Extraction {
        Extraction {
            text: clean_text(&self.text),
            links: self.links,
        }
    }
}

fn inline_whitespace() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\S\n]+").expect("inline whitespace pattern is valid"))
}

fn line_breaks() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*\n\s*").expect("line break pattern is valid"))
}

/// Collapses whitespace runs to one space and line-break runs to one `\n`
fn clean_text(raw: &str) -> String {
    let spaced = inline_whitespace().replace_all(raw, " ");
    let broken = line_breaks().replace_all(&spaced, "\n");
    broken.trim().to_string()
}

/// Extracts plain text and links in one pass
///
/// # Example
///
/// ```
/// use canvas_harvest::richtext::extract;
///
/// let result = extract(r#"<p>Read <a href="/files/1">the syllabus</a></p><p>Thanks</p>"#);
/// assert_eq!(result.text, "Read the syllabus\nThanks");
/// assert_eq!(result.links[0].text, "the syllabus");
/// assert_eq!(result.links[0].url, "/files/1");
/// ```
pub fn extract(markup: &str) -> Extraction {
    tokenize(markup).finish()
}

/// Converts markup to plain text, keeping block boundaries as line breaks
pub fn extract_text(markup: &str) -> String {
    extract(markup).text
}

/// Lists the links in markup, in document order
pub fn extract_links(markup: &str) -> Vec<Link> {
    extract(markup).links
}
