//! Display-only whitespace normalization.
//!
//! Editors reflow markdown in ways that carry no meaning: list indentation
//! switches between two and four spaces, markers gain extra spacing, blank
//! lines appear between list items. Normalizing both sides before rendering
//! keeps that noise out of the annotations. The result is for display only;
//! exported text keeps its exact formatting.

use std::sync::OnceLock;

use regex::Regex;

use crate::align::blocks::is_blank;

fn list_item_regex() -> &'static Regex {
    static LIST_ITEM: OnceLock<Regex> = OnceLock::new();
    LIST_ITEM
        .get_or_init(|| Regex::new(r"^(\s*)([-*+]|\d+[.)])\s+(.*)$").expect("Invalid list item regex"))
}

fn quote_regex() -> &'static Regex {
    static QUOTE: OnceLock<Regex> = OnceLock::new();
    QUOTE.get_or_init(|| Regex::new(r"^\s*>\s*").expect("Invalid blockquote regex"))
}

fn is_list_item(line: &str) -> bool {
    list_item_regex().is_match(line)
}

fn is_quote(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

/// Normalize list and blockquote spacing and trim line ends.
///
/// ```
/// use markdown_review_engine::render::normalize_markdown_whitespace;
///
/// assert_eq!(
///     normalize_markdown_whitespace("-   one  \n\n    - two\n"),
///     "- one\n  - two\n"
/// );
/// ```
pub fn normalize_markdown_whitespace(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let quoted = lines.iter().filter(|line| is_quote(line)).count();
    if quoted > 0 && quoted * 2 >= lines.len() {
        return normalize_blockquote(&lines);
    }

    let non_blank: Vec<&str> = lines.iter().copied().filter(|l| !is_blank(l)).collect();
    let items = non_blank.iter().filter(|line| is_list_item(line)).count();
    if !non_blank.is_empty() && items * 2 >= non_blank.len() {
        return normalize_list(&lines);
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_blockquote(lines: &[&str]) -> String {
    let normalized: Vec<String> = lines
        .iter()
        .map(|line| {
            if !is_quote(line) {
                return line.trim_end().to_string();
            }
            let body = quote_regex().replace(line, "");
            if is_blank(&body) {
                String::new()
            } else {
                format!("> {}", body.trim_end())
            }
        })
        .collect();

    // Blank lines survive only between two content lines
    let kept: Vec<&str> = normalized
        .iter()
        .enumerate()
        .filter(|&(i, line)| {
            !line.is_empty()
                || (i > 0
                    && normalized
                        .get(i - 1)
                        .zip(normalized.get(i + 1))
                        .is_some_and(|(prev, next)| !prev.is_empty() && !next.is_empty()))
        })
        .map(|(_, line)| line.as_str())
        .collect();
    kept.join("\n")
}

/// Indent unit of the list: four when the shallowest nested item sits at
/// three or more columns, otherwise two.
fn indent_unit(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter_map(|line| list_item_regex().captures(line))
        .filter_map(|captures| captures.get(1).map(|m| m.as_str().chars().count()))
        .filter(|&indent| indent > 0)
        .min()
        .map_or(2, |min| if min >= 3 { 4 } else { 2 })
}

fn normalize_list(lines: &[&str]) -> String {
    let unit = indent_unit(lines);
    let mut out = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if let Some(captures) = list_item_regex().captures(line) {
            let indent = captures.get(1).map_or(0, |m| m.as_str().chars().count());
            let marker = captures.get(2).map_or("", |m| m.as_str());
            let content = captures.get(3).map_or("", |m| m.as_str()).trim_end();
            // Rounds half up
            let level = (indent * 2 + unit) / (2 * unit);
            out.push(format!("{}{marker} {content}", "  ".repeat(level)));
        } else if is_blank(line) {
            let between_items = i > 0
                && lines.get(i - 1).is_some_and(|prev| is_list_item(prev))
                && lines.get(i + 1).is_some_and(|next| is_list_item(next));
            if !between_items {
                out.push(String::new());
            }
        } else {
            out.push(line.trim_end().to_string());
        }
    }

    out.join("\n")
}
