//! # markdown-review-syntax
//!
//! The CriticMarkup grammar used for tracked changes and review comments:
//!
//! | Kind | Markup |
//! |------|--------|
//! | Addition | `{++text++}` |
//! | Deletion | `{--text--}` |
//! | Substitution | `{~~old~>new~~}` |
//! | Comment | `{>>text<<}` |
//! | Highlight | `{==text==}`, optionally followed by `{>>comment<<}` |
//!
//! Parsing happens in two stages:
//!
//! 1. [`lexer`] breaks the text into delimiter tokens and literal runs with
//!    Logos. Lossless: every byte lands in exactly one token.
//! 2. [`parser`] pairs delimiters into [`AnnotationSpan`]s in a single
//!    left-to-right pass.
//!
//! ```
//! use markdown_review_syntax::{AnnotationKind, parse};
//!
//! let spans = parse("The {~~quick~>slow~~} fox{>>really?<<}");
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[0].kind, AnnotationKind::Substitution);
//! assert_eq!(spans[0].replacement.as_deref(), Some("slow"));
//! assert_eq!(spans[1].kind, AnnotationKind::Comment);
//! ```

pub mod kinds;
pub mod lexer;
pub mod parser;

pub use kinds::{AnnotationKind, SUBSTITUTION_SEPARATOR, wrap_substitution};
pub use parser::{AnnotationSpan, Spans, parse, spans};
