use pulldown_cmark::{Event, Parser, TagEnd};

use crate::annotations::accept_all;

/// Turns element markdown into readable text for labels and previews.
pub trait PlainText: Send + Sync {
    fn to_plain_text(&self, markdown: &str) -> String;
}

/// [`PlainText`] backed by pulldown-cmark. Tracked changes are accepted
/// first; each top-level block ends up on its own line.
#[derive(Debug, Default)]
pub struct MarkdownPlainText;

impl MarkdownPlainText {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlainText for MarkdownPlainText {
    fn to_plain_text(&self, markdown: &str) -> String {
        let accepted = accept_all(markdown);
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();

        for event in Parser::new(&accepted) {
            match event {
                Event::Text(text) | Event::Code(text) => current.push_str(&text),
                Event::SoftBreak | Event::HardBreak => current.push(' '),
                Event::End(
                    TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
                ) => {
                    let block = current.trim();
                    if !block.is_empty() {
                        blocks.push(block.to_string());
                    }
                    current.clear();
                }
                _ => {}
            }
        }
        let rest = current.trim();
        if !rest.is_empty() {
            blocks.push(rest.to_string());
        }

        blocks.join("\n")
    }
}

/// `"<type>: <text>"`, whitespace collapsed and cut to `max_chars`
/// characters with an ellipsis. Just the type when there is no text.
pub fn label(kind: &str, content: &str, plain_text: &dyn PlainText, max_chars: usize) -> String {
    let text = plain_text
        .to_plain_text(content)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return kind.to_string();
    }

    let label = format!("{kind}: {text}");
    if label.chars().count() <= max_chars {
        return label;
    }
    let mut cut: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", "Title")]
    #[case("Some *emphasis* and `code`", "Some emphasis and code")]
    #[case("- one\n- two", "one\ntwo")]
    #[case("first\nsecond", "first second")]
    #[case("keep {++new++}{--old--} text", "keep new text")]
    #[case("", "")]
    fn plain_text(#[case] markdown: &str, #[case] expected: &str) {
        assert_eq!(MarkdownPlainText::new().to_plain_text(markdown), expected);
    }

    #[test]
    fn labels() {
        let plain = MarkdownPlainText::new();
        assert_eq!(label("heading", "## Intro", &plain, 40), "heading: Intro");
        assert_eq!(label("paragraph", "", &plain, 40), "paragraph");
        assert_eq!(
            label("paragraph", "A rather long sentence", &plain, 16),
            "paragraph: A ra…"
        );
    }
}
