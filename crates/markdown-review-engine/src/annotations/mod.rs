//! # Annotation transforms
//!
//! Collapse CriticMarkup to its accepted or rejected form, detect it,
//! and build it. Parsing lives in [`markdown_review_syntax`]; this module
//! decides what each span turns into:
//!
//! | Kind | accept | reject |
//! |------|--------|--------|
//! | addition | content | removed |
//! | deletion | removed | content |
//! | substitution | replacement | content |
//! | highlight | content | content |
//! | comment | removed | removed |
//!
//! A comment attached to a highlight goes with it.

pub mod builders;
pub mod strip;

pub use builders::*;
pub use markdown_review_syntax::{AnnotationKind, AnnotationSpan, parse};
pub use strip::{StripMode, StripOptions, strip_annotations};

/// What `span` becomes when accepted.
pub fn accepted_text(span: &AnnotationSpan) -> &str {
    match span.kind {
        AnnotationKind::Addition | AnnotationKind::Highlight => &span.content,
        AnnotationKind::Substitution => span.replacement.as_deref().unwrap_or_default(),
        AnnotationKind::Deletion | AnnotationKind::Comment => "",
    }
}

/// What `span` becomes when rejected.
pub fn rejected_text(span: &AnnotationSpan) -> &str {
    match span.kind {
        AnnotationKind::Deletion | AnnotationKind::Substitution | AnnotationKind::Highlight => {
            &span.content
        }
        AnnotationKind::Addition | AnnotationKind::Comment => "",
    }
}

fn replace_span(text: &str, span: &AnnotationSpan, with: &str) -> String {
    match text.get(span.start..span.end) {
        Some(_) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..span.start]);
            out.push_str(with);
            out.push_str(&text[span.end..]);
            out
        }
        None => {
            log::warn!("annotation span {:?} does not fit the text", span.range());
            text.to_string()
        }
    }
}

/// Replace one span by its accepted text.
pub fn accept(text: &str, span: &AnnotationSpan) -> String {
    replace_span(text, span, accepted_text(span))
}

/// Replace one span by its rejected text.
pub fn reject(text: &str, span: &AnnotationSpan) -> String {
    replace_span(text, span, rejected_text(span))
}

fn collapse_with(text: &str, pick: impl Fn(&AnnotationSpan) -> &str) -> String {
    let spans = parse(text);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in &spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(pick(span));
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Accept every span in `text`.
pub fn accept_all(text: &str) -> String {
    collapse_with(text, accepted_text)
}

/// Reject every span in `text`.
pub fn reject_all(text: &str) -> String {
    collapse_with(text, rejected_text)
}

/// True when `text` contains at least one complete annotation.
pub fn has_annotations(text: &str) -> bool {
    markdown_review_syntax::spans(text).next().is_some()
}
