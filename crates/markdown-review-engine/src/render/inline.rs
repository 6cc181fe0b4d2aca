use crate::diff::changes::replace_all;
use crate::diff::{Component, DiffEngine, DiffOptions};

use super::markup::{addition, deletion, substitution};

/// Word-level annotation of a single line body, table cell or marker.
pub(crate) struct InlineDiff {
    words: DiffEngine,
    chars: DiffEngine,
}

/// Single runs without whitespace whose lengths are within a factor of two
/// are worth a character-level look.
fn comparable(old: &str, new: &str) -> bool {
    if old.is_empty() || new.is_empty() || old.contains(char::is_whitespace)
        || new.contains(char::is_whitespace)
    {
        return false;
    }
    let (a, b) = (old.chars().count(), new.chars().count());
    a.max(b) <= 2 * a.min(b)
}

impl InlineDiff {
    pub(crate) fn new(options: &DiffOptions) -> Self {
        Self {
            words: DiffEngine::words().with_options(options.clone()),
            chars: DiffEngine::chars().with_options(options.clone()),
        }
    }

    pub(crate) fn render(&self, old: &str, new: &str) -> String {
        if old == new {
            return new.to_string();
        }

        let parts = self
            .words
            .diff(old, new)
            .unwrap_or_else(|| replace_all(old, new));

        let anchored = parts
            .iter()
            .any(|p| p.is_common() && !p.value.trim().is_empty());
        if !anchored {
            return substitution(old, new);
        }

        self.render_parts(&parts, true)
    }

    fn refine(&self, old: &str, new: &str) -> String {
        let parts = self
            .chars
            .diff(old, new)
            .unwrap_or_else(|| replace_all(old, new));
        if !parts.iter().any(Component::is_common) {
            return substitution(old, new);
        }
        self.render_parts(&parts, false)
    }

    fn render_parts(&self, parts: &[Component], refine: bool) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < parts.len() {
            let part = &parts[i];
            if part.removed {
                if let Some(next) = parts.get(i + 1).filter(|next| next.added) {
                    if refine && comparable(&part.value, &next.value) {
                        out.push_str(&self.refine(&part.value, &next.value));
                    } else {
                        out.push_str(&substitution(&part.value, &next.value));
                    }
                    i += 2;
                    continue;
                }
                out.push_str(&deletion(&part.value));
            } else if part.added {
                out.push_str(&addition(&part.value));
            } else {
                out.push_str(&part.value);
            }
            i += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("same", "same", "same")]
    #[case("Beta", "Beta2", "{~~Beta~>Beta2~~}")]
    #[case("Hello wrld", "Hello world", "Hello w{++o++}rld")]
    #[case("the quick fox", "the slow fox", "the {~~quick~>slow~~} fox")]
    #[case("keep this word", "keep word", "keep {--this --}word")]
    #[case("keep word", "keep new word", "keep {++new ++}word")]
    #[case("a  b", "a b", "a b")]
    #[case("Hello, world", "Hello, big world", "Hello, {++big ++}world")]
    #[case("one two", "three four", "{~~one two~>three four~~}")]
    fn inline_rendering(#[case] old: &str, #[case] new: &str, #[case] expected: &str) {
        let inline = InlineDiff::new(&DiffOptions::default());
        assert_eq!(inline.render(old, new), expected);
    }

    #[test]
    fn comparable_pairs() {
        assert!(comparable("wrld", "world"));
        assert!(!comparable("a", "abc"));
        assert!(!comparable("two words", "one"));
        assert!(!comparable("", "x"));
    }
}
