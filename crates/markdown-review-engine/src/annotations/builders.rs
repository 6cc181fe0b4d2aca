use markdown_review_syntax::{AnnotationKind, wrap_substitution};

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn create_addition(text: &str) -> String {
    AnnotationKind::Addition.wrap(text)
}

pub fn create_deletion(text: &str) -> String {
    AnnotationKind::Deletion.wrap(text)
}

pub fn create_substitution(old: &str, new: &str) -> String {
    wrap_substitution(old, new)
}

/// Comment bodies are single-line: whitespace collapsed and trimmed.
pub fn create_comment(text: &str) -> String {
    AnnotationKind::Comment.wrap(&collapse_whitespace(text))
}

pub fn create_highlight(text: &str, comment: Option<&str>) -> String {
    let mut out = AnnotationKind::Highlight.wrap(text);
    if let Some(comment) = comment {
        out.push_str(&create_comment(comment));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{accept_all, parse, reject_all};
    use pretty_assertions::assert_eq;

    #[test]
    fn builders_write_markup() {
        assert_eq!(create_addition("new"), "{++new++}");
        assert_eq!(create_deletion("old"), "{--old--}");
        assert_eq!(create_substitution("a", "b"), "{~~a~>b~~}");
    }

    #[test]
    fn comment_whitespace_is_collapsed() {
        assert_eq!(create_comment("  needs\n   a   source "), "{>>needs a source<<}");
    }

    #[test]
    fn highlight_with_and_without_comment() {
        assert_eq!(create_highlight("claim", None), "{==claim==}");
        let marked = create_highlight("claim", Some("cite this"));
        assert_eq!(marked, "{==claim==}{>>cite this<<}");

        let spans = parse(&marked);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].comment.as_deref(), Some("cite this"));
    }

    #[test]
    fn built_markup_collapses_back() {
        let text = format!("{} {}", create_deletion("old"), create_addition("new"));
        assert_eq!(accept_all(&text), " new");
        assert_eq!(reject_all(&text), "old ");
    }
}
