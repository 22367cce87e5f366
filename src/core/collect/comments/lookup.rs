//! Documentation lookup for message functions.
//!
//! Not every comment ends up where swc attaches leading comments (a comment
//! after a `,` or between a key and its value may be keyed to another
//! token), so documentation is looked up with an ordered fallback chain:
//!
//! 1. **Structured**: JSDoc blocks swc attached to the property or the
//!    function node.
//! 2. **Raw**: a textual scan of the source between the previous sibling
//!    (or the opening `{`) and the function.
//!
//! Both sources are equally authoritative for `@notranslate`: a marker found
//! by either one exempts the function.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use swc_common::{BytePos, comments::CommentKind};

use super::doc::DocComment;
use crate::core::parsers::source::ExtractedComments;

static RAW_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/|//[^\n]*").unwrap());

static RAW_DOC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\*[\s\S]*?)\*/").unwrap());

static NO_TRANSLATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@notranslate\b").unwrap());

/// Documentation resolved for one message function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDoc {
    pub doc: Option<DocComment>,
    pub no_translate: bool,
}

pub struct CommentLookup<'a> {
    comments: &'a ExtractedComments,
    source: &'a str,
}

impl<'a> CommentLookup<'a> {
    pub fn new(comments: &'a ExtractedComments, source: &'a str) -> Self {
        Self { comments, source }
    }

    /// Resolve documentation for a function.
    ///
    /// # Arguments
    /// * `anchors` - Token positions swc may have keyed leading comments to,
    ///   most specific first (property, then function node).
    /// * `raw_range` - Byte range of the raw leading-comment buffer.
    pub fn resolve(&self, anchors: &[BytePos], raw_range: Range<usize>) -> ResolvedDoc {
        let structured: Vec<DocComment> = anchors
            .iter()
            .filter_map(|pos| self.structured_doc(*pos))
            .collect();

        let raw = self.source.get(raw_range).unwrap_or_default();
        let raw_comments: Vec<&str> = RAW_COMMENT_REGEX
            .find_iter(raw)
            .map(|m| m.as_str())
            .collect();

        let no_translate = structured.iter().any(DocComment::is_no_translate)
            || raw_comments.iter().any(|c| NO_TRANSLATE_REGEX.is_match(c));

        let doc = structured
            .into_iter()
            .next()
            .or_else(|| raw_comments.iter().rev().find_map(|c| raw_doc(c)));

        ResolvedDoc { doc, no_translate }
    }

    /// The JSDoc block closest to the token at `pos`.
    fn structured_doc(&self, pos: BytePos) -> Option<DocComment> {
        self.comments
            .leading_at(pos)
            .iter()
            .rev()
            .filter(|c| c.kind == CommentKind::Block)
            .find_map(|c| DocComment::parse(&c.text))
    }
}

fn raw_doc(comment: &str) -> Option<DocComment> {
    RAW_DOC_REGEX
        .captures(comment)
        .and_then(|cap| cap.get(1))
        .and_then(|m| DocComment::parse(m.as_str()))
}
