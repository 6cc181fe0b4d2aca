//! # Lexer - Tokenizing Annotated Text
//!
//! First stage of span extraction: break source text into delimiter tokens
//! and text runs using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating token texts gives back the input:
//!
//! ```
//! use markdown_review_syntax::lexer::lex;
//!
//! let input = "Hello {++brave ++}world{>>nice<<}\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! The lexer is context-free. It recognises every CriticMarkup delimiter
//! wherever it appears; deciding which delimiters pair up is the parser's
//! job. Characters that can begin a delimiter (`{ + - ~ < =`) stop text
//! runs, and when they do not begin one they come out as single-character
//! [`TokenKind::Punct`] tokens. Everything else is grouped into
//! [`TokenKind::Text`] runs.

use std::ops::Range;

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[token("{++")]
    AdditionOpen,

    #[token("++}")]
    AdditionClose,

    #[token("{--")]
    DeletionOpen,

    #[token("--}")]
    DeletionClose,

    #[token("{~~")]
    SubstitutionOpen,

    /// `~>` between the old and new halves of a substitution
    #[token("~>")]
    SubstitutionSeparator,

    #[token("~~}")]
    SubstitutionClose,

    #[token("{>>")]
    CommentOpen,

    #[token("<<}")]
    CommentClose,

    #[token("{==")]
    HighlightOpen,

    #[token("==}")]
    HighlightClose,

    /// A lone delimiter character that does not start a delimiter
    #[regex(r"[{+~<=-]")]
    Punct,

    /// Plain text - anything that cannot start a delimiter
    #[regex(r"[^{+~<=-]+")]
    Text,
}

impl TokenKind {
    /// True for tokens that carry no markup meaning on their own.
    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::Text | TokenKind::Punct)
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        // Unrecognised input is still text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(kind: TokenKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_text_is_one_run() {
        assert_eq!(
            lex("hello world\nagain"),
            vec![token(TokenKind::Text, "hello world\nagain")]
        );
    }

    #[test]
    fn lex_addition() {
        assert_eq!(
            lex("{++new++}"),
            vec![
                token(TokenKind::AdditionOpen, "{++"),
                token(TokenKind::Text, "new"),
                token(TokenKind::AdditionClose, "++}"),
            ]
        );
    }

    #[test]
    fn lex_substitution() {
        assert_eq!(
            lex("{~~a~>b~~}"),
            vec![
                token(TokenKind::SubstitutionOpen, "{~~"),
                token(TokenKind::Text, "a"),
                token(TokenKind::SubstitutionSeparator, "~>"),
                token(TokenKind::Text, "b"),
                token(TokenKind::SubstitutionClose, "~~}"),
            ]
        );
    }

    #[test]
    fn lex_highlight_with_comment() {
        assert_eq!(
            lex("{==x==}{>>y<<}"),
            vec![
                token(TokenKind::HighlightOpen, "{=="),
                token(TokenKind::Text, "x"),
                token(TokenKind::HighlightClose, "==}"),
                token(TokenKind::CommentOpen, "{>>"),
                token(TokenKind::Text, "y"),
                token(TokenKind::CommentClose, "<<}"),
            ]
        );
    }

    #[test]
    fn lex_stray_delimiter_characters() {
        assert_eq!(
            lex("a-b {x}"),
            vec![
                token(TokenKind::Text, "a"),
                token(TokenKind::Punct, "-"),
                token(TokenKind::Text, "b "),
                token(TokenKind::Punct, "{"),
                token(TokenKind::Text, "x}"),
            ]
        );
    }

    #[test]
    fn lex_list_marker_is_not_a_delimiter() {
        let kinds: Vec<_> = lex("- item").into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Punct, TokenKind::Text]);
    }

    #[test]
    fn lex_with_spans_reports_byte_offsets() {
        let spans: Vec<_> = lex_with_spans("é{--x--}")
            .into_iter()
            .map(|(t, span)| (t.kind, span))
            .collect();
        assert_eq!(
            spans,
            vec![
                (TokenKind::Text, 0..2),
                (TokenKind::DeletionOpen, 2..5),
                (TokenKind::Text, 5..6),
                (TokenKind::DeletionClose, 6..9),
            ]
        );
    }

    #[test]
    fn lex_is_lossless() {
        let input = "- {~~Beta~>Beta2~~}\n| a | {++b++} |\n<!-- x --> ~ = <";
        let rebuilt: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
    }
}
