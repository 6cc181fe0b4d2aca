//! # Span Parser
//!
//! Second stage: pair opening delimiter tokens with their closes into
//! [`AnnotationSpan`]s.
//!
//! The scan is a single left-to-right pass over the opening delimiters:
//!
//! - an open delimiter pairs with the **first** occurrence of its close in
//!   the text after it (non-greedy), and everything in between is literal
//!   content, so spans never nest;
//! - a substitution needs its `~>` separator before the close;
//! - a highlight immediately followed by a comment takes that comment as
//!   its attachment instead of producing a separate comment span;
//! - an open delimiter with no matching close stays literal text and the
//!   scan carries on with the next token.
//!
//! Spans may contain newlines.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::kinds::{AnnotationKind, SUBSTITUTION_SEPARATOR};
use crate::lexer::{TokenKind, lex_with_spans};

/// One annotation found in a string. `start..end` covers the full markup
/// including delimiters, as byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSpan {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub start: usize,
    pub end: usize,
    pub content: String,
    /// New text of a substitution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Comment attached to a highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl AnnotationSpan {
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Parse every annotation span in `text`, sorted by start offset.
pub fn parse(text: &str) -> Vec<AnnotationSpan> {
    spans(text).collect()
}

/// Lazily iterate the annotation spans in `text`.
pub fn spans(text: &str) -> Spans<'_> {
    let opens = lex_with_spans(text)
        .into_iter()
        .filter_map(|(token, span)| opening_kind(token.kind).map(|kind| (kind, span)))
        .collect();
    Spans {
        source: text,
        opens,
        pos: 0,
        offset: 0,
    }
}

fn opening_kind(kind: TokenKind) -> Option<AnnotationKind> {
    match kind {
        TokenKind::AdditionOpen => Some(AnnotationKind::Addition),
        TokenKind::DeletionOpen => Some(AnnotationKind::Deletion),
        TokenKind::SubstitutionOpen => Some(AnnotationKind::Substitution),
        TokenKind::CommentOpen => Some(AnnotationKind::Comment),
        TokenKind::HighlightOpen => Some(AnnotationKind::Highlight),
        _ => None,
    }
}

/// Iterator returned by [`spans`].
///
/// Opening delimiters come from the lexer. Closing delimiters are searched
/// for in the source text, so content ending in `{` cannot swallow a close.
pub struct Spans<'a> {
    source: &'a str,
    opens: Vec<(AnnotationKind, Range<usize>)>,
    pos: usize,
    /// Byte offset the previous span ended at
    offset: usize,
}

impl Spans<'_> {
    /// Byte range of the first `delimiter` at or after `from`.
    fn find_delimiter(&self, from: usize, delimiter: &str) -> Option<Range<usize>> {
        self.source
            .get(from..)?
            .find(delimiter)
            .map(|i| from + i..from + i + delimiter.len())
    }

    fn close_simple(&self, kind: AnnotationKind, open: &Range<usize>) -> Option<AnnotationSpan> {
        let close = self.find_delimiter(open.end, kind.close())?;
        Some(AnnotationSpan {
            kind,
            start: open.start,
            end: close.end,
            content: self.source[open.end..close.start].to_string(),
            replacement: None,
            comment: None,
        })
    }

    fn close_substitution(&self, open: &Range<usize>) -> Option<AnnotationSpan> {
        let kind = AnnotationKind::Substitution;
        let separator = self.find_delimiter(open.end, SUBSTITUTION_SEPARATOR)?;
        let close = self.find_delimiter(separator.end, kind.close())?;
        Some(AnnotationSpan {
            kind,
            start: open.start,
            end: close.end,
            content: self.source[open.end..separator.start].to_string(),
            replacement: Some(self.source[separator.end..close.start].to_string()),
            comment: None,
        })
    }

    fn close_highlight(&self, open: &Range<usize>) -> Option<AnnotationSpan> {
        let mut span = self.close_simple(AnnotationKind::Highlight, open)?;

        let comment = AnnotationKind::Comment;
        if self.source[span.end..].starts_with(comment.open()) {
            let body = span.end + comment.open().len();
            if let Some(close) = self.find_delimiter(body, comment.close()) {
                span.comment = Some(self.source[body..close.start].to_string());
                span.end = close.end;
            }
        }

        Some(span)
    }
}

impl Iterator for Spans<'_> {
    type Item = AnnotationSpan;

    fn next(&mut self) -> Option<AnnotationSpan> {
        while let Some((kind, open)) = self.opens.get(self.pos).cloned() {
            self.pos += 1;
            // Delimiters inside an earlier span are its content
            if open.start < self.offset {
                continue;
            }

            let span = match kind {
                AnnotationKind::Substitution => self.close_substitution(&open),
                AnnotationKind::Highlight => self.close_highlight(&open),
                _ => self.close_simple(kind, &open),
            };

            if let Some(span) = span {
                self.offset = span.end;
                return Some(span);
            }
        }
        None
    }
}
