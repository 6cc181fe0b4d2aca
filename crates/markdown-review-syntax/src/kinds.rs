//! Annotation kinds and the delimiters each one owns.
//!
//! Every piece of CriticMarkup knowledge about a kind lives here: the
//! opening and closing delimiters and how a span of that kind is written.
//! The lexer and the builders both read from these constants so the grammar
//! is only spelled out once.

use serde::{Deserialize, Serialize};

/// The five inline annotation kinds of the CriticMarkup grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// `{++text++}`
    Addition,
    /// `{--text--}`
    Deletion,
    /// `{~~old~>new~~}`
    Substitution,
    /// `{>>text<<}`
    Comment,
    /// `{==text==}`, optionally followed by an attached comment
    Highlight,
}

/// Separator between the old and new halves of a substitution.
pub const SUBSTITUTION_SEPARATOR: &str = "~>";

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 5] = [
        AnnotationKind::Addition,
        AnnotationKind::Deletion,
        AnnotationKind::Substitution,
        AnnotationKind::Comment,
        AnnotationKind::Highlight,
    ];

    pub const fn open(self) -> &'static str {
        match self {
            AnnotationKind::Addition => "{++",
            AnnotationKind::Deletion => "{--",
            AnnotationKind::Substitution => "{~~",
            AnnotationKind::Comment => "{>>",
            AnnotationKind::Highlight => "{==",
        }
    }

    pub const fn close(self) -> &'static str {
        match self {
            AnnotationKind::Addition => "++}",
            AnnotationKind::Deletion => "--}",
            AnnotationKind::Substitution => "~~}",
            AnnotationKind::Comment => "<<}",
            AnnotationKind::Highlight => "==}",
        }
    }

    /// Lowercase name used in summaries and the CLI listing.
    pub const fn name(self) -> &'static str {
        match self {
            AnnotationKind::Addition => "addition",
            AnnotationKind::Deletion => "deletion",
            AnnotationKind::Substitution => "substitution",
            AnnotationKind::Comment => "comment",
            AnnotationKind::Highlight => "highlight",
        }
    }

    /// Wrap `text` in this kind's delimiters.
    ///
    /// Substitutions need two halves, see [`wrap_substitution`].
    pub fn wrap(self, text: &str) -> String {
        let open = self.open();
        let close = self.close();
        let mut out = String::with_capacity(open.len() + text.len() + close.len());
        out.push_str(open);
        out.push_str(text);
        out.push_str(close);
        out
    }
}

/// Write `{~~old~>new~~}`.
pub fn wrap_substitution(old: &str, new: &str) -> String {
    let kind = AnnotationKind::Substitution;
    format!(
        "{}{old}{SUBSTITUTION_SEPARATOR}{new}{}",
        kind.open(),
        kind.close()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wrap_uses_own_delimiters() {
        assert_eq!(AnnotationKind::Addition.wrap("new"), "{++new++}");
        assert_eq!(AnnotationKind::Deletion.wrap("old"), "{--old--}");
        assert_eq!(AnnotationKind::Comment.wrap("note"), "{>>note<<}");
        assert_eq!(AnnotationKind::Highlight.wrap("look"), "{==look==}");
    }

    #[test]
    fn substitution_has_separator() {
        assert_eq!(wrap_substitution("a", "b"), "{~~a~>b~~}");
    }

    #[test]
    fn every_open_delimiter_starts_with_brace() {
        for kind in AnnotationKind::ALL {
            assert!(kind.open().starts_with('{'), "{kind:?}");
            assert!(kind.close().ends_with('}'), "{kind:?}");
        }
    }
}
