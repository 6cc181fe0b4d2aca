//! Exporting annotated text as plain markdown.

use super::{AnnotationKind, AnnotationSpan, accepted_text, parse, rejected_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    #[default]
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StripOptions {
    /// Keep review comments as `<!-- review-comment ... -->` instead of
    /// dropping them
    pub preserve_comments_as_html: bool,
}

fn html_comment(body: &str) -> String {
    let body = body.split_whitespace().collect::<Vec<_>>().join(" ");
    // "--" would end the HTML comment early
    let mut safe = body.replace("--", "- -");
    while safe.contains("--") {
        safe = safe.replace("--", "- -");
    }
    format!("<!-- review-comment {safe} -->")
}

fn resolve(span: &AnnotationSpan, mode: StripMode, options: StripOptions) -> String {
    let text = match mode {
        StripMode::Accept => accepted_text(span),
        StripMode::Reject => rejected_text(span),
    };
    if !options.preserve_comments_as_html {
        return text.to_string();
    }
    match (span.kind, &span.comment) {
        (AnnotationKind::Comment, _) => html_comment(&span.content),
        (AnnotationKind::Highlight, Some(comment)) => format!("{text}{}", html_comment(comment)),
        _ => text.to_string(),
    }
}

/// Remove all markup from `text`, resolving each span per `mode`.
pub fn strip_annotations(text: &str, mode: StripMode, options: StripOptions) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in parse(text) {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&resolve(&span, mode, options));
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
