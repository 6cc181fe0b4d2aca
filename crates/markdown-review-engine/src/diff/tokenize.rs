//! Tokenization strategies and token equality.
//!
//! A [`Tokenizer`] decides what the diff engine compares: characters,
//! words, lines, or pre-segmented units. The engine only talks to the
//! trait, so strategies are swapped without touching the search.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Converts a string into the units the diff engine compares.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>>;

    /// Rebuild text from a slice of tokens.
    fn join(&self, tokens: &[Cow<'_, str>]) -> String {
        tokens.concat()
    }

    fn name(&self) -> &'static str;
}

/// One token per `char`. Used to refine a changed word pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>> {
        text.char_indices()
            .map(|(i, c)| Cow::Borrowed(&text[i..i + c.len_utf8()]))
            .collect()
    }

    fn name(&self) -> &'static str {
        "char"
    }
}

/// Words, whitespace runs, newlines and single punctuation characters.
///
/// - a maximal run of word characters (alphanumeric in any script, `_`)
/// - a maximal run of non-newline whitespace
/// - one newline, `\n` or `\r\n`
/// - any other single character
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Newline,
    Other,
}

fn classify(c: char) -> CharClass {
    if c == '\n' {
        CharClass::Newline
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>> {
        let mut tokens = Vec::new();
        let mut chars = text.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            let mut end = start + c.len_utf8();
            match classify(c) {
                CharClass::Newline | CharClass::Other => {}
                // \r\n is a single newline token
                CharClass::Space if c == '\r' && chars.peek().map(|&(_, n)| n) == Some('\n') => {
                    chars.next();
                    end += 1;
                }
                class => {
                    while let Some(&(i, next)) = chars.peek() {
                        if classify(next) != class
                            || (next == '\r' && text[i..].starts_with("\r\n"))
                        {
                            break;
                        }
                        end = i + next.len_utf8();
                        chars.next();
                    }
                }
            }
            tokens.push(Cow::Borrowed(&text[start..end]));
        }

        tokens
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

/// Whole lines with their terminators.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTokenizer {
    /// Emit each terminator as its own token
    pub newline_is_token: bool,
    /// Compare `\r\n` terminated lines as if they ended in `\n`
    pub strip_trailing_cr: bool,
}

impl Tokenizer for LineTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>> {
        let mut tokens = Vec::new();

        for line in text.split_inclusive('\n') {
            let (body, terminator) = match line.strip_suffix('\n') {
                Some(body) => match body.strip_suffix('\r') {
                    Some(body) if !self.strip_trailing_cr => (body, "\r\n"),
                    Some(body) => (body, "\n"),
                    None => (body, "\n"),
                },
                None => (line, ""),
            };

            if self.newline_is_token {
                tokens.push(Cow::Borrowed(body));
                if !terminator.is_empty() {
                    tokens.push(Cow::Borrowed(terminator));
                }
            } else if terminator.len() == line.len() - body.len() {
                tokens.push(Cow::Borrowed(line));
            } else {
                tokens.push(Cow::Owned(format!("{body}{terminator}")));
            }
        }

        tokens
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

/// No splitting: the whole input is a single token. Pre-segmented
/// sequences go through [`crate::diff::DiffEngine::diff_tokens`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTokenizer;

impl Tokenizer for IdentityTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>> {
        vec![Cow::Borrowed(text)]
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Token equality used by the search.
#[derive(Clone, Default)]
pub enum Comparator {
    #[default]
    Exact,
    IgnoreCase,
    /// Tokens equal after trimming; whitespace runs all compare equal
    IgnoreWhitespace,
    Custom(Arc<dyn Fn(&str, &str) -> bool + Send + Sync>),
}

impl Comparator {
    pub fn custom(f: impl Fn(&str, &str) -> bool + Send + Sync + 'static) -> Self {
        Comparator::Custom(Arc::new(f))
    }

    pub fn equals(&self, left: &str, right: &str) -> bool {
        match self {
            Comparator::Exact => left == right,
            Comparator::IgnoreCase => {
                left == right || left.to_lowercase() == right.to_lowercase()
            }
            Comparator::IgnoreWhitespace => left.trim() == right.trim(),
            Comparator::Custom(f) => f(left, right),
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Exact => f.write_str("Exact"),
            Comparator::IgnoreCase => f.write_str("IgnoreCase"),
            Comparator::IgnoreWhitespace => f.write_str("IgnoreWhitespace"),
            Comparator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tokens(tokenizer: &dyn Tokenizer, text: &str) -> Vec<String> {
        tokenizer
            .tokenize(text)
            .into_iter()
            .map(Cow::into_owned)
            .collect()
    }

    #[rstest]
    #[case("hello world", &["hello", " ", "world"])]
    #[case("a,  b", &["a", ",", "  ", "b"])]
    #[case("line\nnext", &["line", "\n", "next"])]
    #[case("crlf\r\nnext", &["crlf", "\r\n", "next"])]
    #[case("snake_case2 café", &["snake_case2", " ", "café"])]
    #[case("- [x] done", &["-", " ", "[", "x", "]", " ", "done"])]
    #[case("\t \n\n", &["\t ", "\n", "\n"])]
    fn word_tokens(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(tokens(&WordTokenizer, input), expected);
    }

    #[test]
    fn word_tokens_are_lossless() {
        let input = "Mixed: ünïcödé, tabs\tand\r\nCRLF -- done!";
        assert_eq!(tokens(&WordTokenizer, input).concat(), input);
    }

    #[test]
    fn char_tokens_respect_utf8() {
        assert_eq!(tokens(&CharTokenizer, "aé!"), vec!["a", "é", "!"]);
    }

    #[test]
    fn line_tokens_keep_terminators() {
        assert_eq!(
            tokens(&LineTokenizer::default(), "a\nb\r\nc"),
            vec!["a\n", "b\r\n", "c"]
        );
    }

    #[test]
    fn line_tokens_with_separate_newlines() {
        let tokenizer = LineTokenizer {
            newline_is_token: true,
            strip_trailing_cr: false,
        };
        assert_eq!(tokens(&tokenizer, "a\nb\n"), vec!["a", "\n", "b", "\n"]);
    }

    #[test]
    fn line_tokens_strip_carriage_returns() {
        let tokenizer = LineTokenizer {
            newline_is_token: false,
            strip_trailing_cr: true,
        };
        assert_eq!(tokens(&tokenizer, "a\r\nb"), vec!["a\n", "b"]);
    }

    #[test]
    fn identity_does_not_split() {
        assert_eq!(tokens(&IdentityTokenizer, "a b\nc"), vec!["a b\nc"]);
    }

    #[test]
    fn comparators() {
        assert!(Comparator::Exact.equals("a", "a"));
        assert!(!Comparator::Exact.equals("a", "A"));
        assert!(Comparator::IgnoreCase.equals("Straße", "straße"));
        assert!(Comparator::IgnoreWhitespace.equals("  ", "\t"));
        assert!(!Comparator::IgnoreWhitespace.equals("a", "b"));
        let always = Comparator::custom(|_, _| true);
        assert!(always.equals("x", "y"));
    }
}
