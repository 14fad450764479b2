//! html5ever token sink driving the extractor
//!
//! The html5ever tokenizer is run on its own, without a tree builder, so
//! tokens arrive strictly in document order and nothing is auto-closed.
//! Character references (named and numeric) are decoded by the tokenizer.

use crate::richtext::extractor::{Markup, RichTextExtractor};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Forwards tokenizer output to a [`RichTextExtractor`]
///
/// html5ever splits character data around references and buffer boundaries;
/// adjacent character tokens are joined so the extractor sees one text run
/// per stretch of text between tags.
#[derive(Debug, Default)]
pub struct ExtractorSink {
    extractor: RichTextExtractor,
    pending: String,
}

impl ExtractorSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_text(&mut self) {
        if !self.pending.is_empty() {
            self.extractor.feed(Markup::Text(&self.pending));
            self.pending.clear();
        }
    }

    fn tag(&mut self, tag: &Tag) {
        self.flush_text();

        let name: &str = &tag.name;
        match tag.kind {
            TagKind::StartTag => {
                let href = tag
                    .attrs
                    .iter()
                    .find(|attr| &*attr.name.local == "href")
                    .map(|attr| &*attr.value);
                self.extractor.feed(Markup::Open { name, href });
            }
            TagKind::EndTag => self.extractor.feed(Markup::Close { name }),
        }
    }

    /// Flushes any trailing text and hands back the extractor
    pub fn into_extractor(mut self) -> RichTextExtractor {
        self.flush_text();
        self.extractor
    }
}

impl TokenSink for ExtractorSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => self.pending.push_str(&text),
            Token::TagToken(tag) => self.tag(&tag),
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text()
            }
            Token::NullCharacterToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenizes a whole fragment into a fresh extractor
pub fn tokenize(markup: &str) -> RichTextExtractor {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(markup));

    let mut tokenizer = Tokenizer::new(ExtractorSink::new(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.into_extractor()
}
