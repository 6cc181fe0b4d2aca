//! Block splitting and the line helpers shared with the renderer.
//!
//! A block is either a single non-list line, or a list item together with
//! the blank and more-indented lines that follow it. Each block carries a
//! structural signature and a normalized text so that two blocks can be
//! called "the same" despite whitespace and annotation noise.

use std::sync::OnceLock;

use regex::Regex;

use crate::annotations;

fn list_marker_regex() -> &'static Regex {
    static LIST_MARKER: OnceLock<Regex> = OnceLock::new();
    LIST_MARKER
        .get_or_init(|| Regex::new(r"^(\s*)([-*+]|\d+[.)])\s").expect("Invalid list marker regex"))
}

fn list_prefix_regex() -> &'static Regex {
    static LIST_PREFIX: OnceLock<Regex> = OnceLock::new();
    LIST_PREFIX.get_or_init(|| {
        Regex::new(r"^(\s*(?:[-*+]|\d+[.)])[^\S\n]+)(.*)$").expect("Invalid list prefix regex")
    })
}

fn separator_cell_regex() -> &'static Regex {
    static SEPARATOR_CELL: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_CELL.get_or_init(|| Regex::new(r"^:?-+:?$").expect("Invalid table separator regex"))
}

/// Split a line into its content and terminator (`"\n"`, `"\r\n"` or `""`).
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, &line[body.len()..])
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, &line[body.len()..])
    } else {
        (line, "")
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Indentation width and marker of a list item line.
pub fn list_marker(line: &str) -> Option<(usize, &str)> {
    let captures = list_marker_regex().captures(line)?;
    let indent = captures.get(1).map_or(0, |m| m.as_str().chars().count());
    let marker = captures.get(2)?.as_str();
    Some((indent, marker))
}

/// A list line split into prefix (indent, marker, spacing) and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLine<'a> {
    pub prefix: &'a str,
    pub body: &'a str,
}

impl ListLine<'_> {
    /// Indent and marker with the spacing after the marker ignored.
    pub fn marker_key(&self) -> &str {
        self.prefix.trim_end()
    }
}

/// Split a line without terminator into list prefix and body.
pub fn list_line(content: &str) -> Option<ListLine<'_>> {
    let captures = list_prefix_regex().captures(content)?;
    Some(ListLine {
        prefix: captures.get(1)?.as_str(),
        body: captures.get(2)?.as_str(),
    })
}

/// A table row has at least two pipes.
pub fn is_table_row(line: &str) -> bool {
    line.matches('|').count() >= 2
}

/// `|---|:---:|` style alignment row.
pub fn is_table_separator(line: &str) -> bool {
    if !is_table_row(line) {
        return false;
    }
    let cells: Vec<&str> = line
        .trim()
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .collect();
    !cells.is_empty() && cells.iter().all(|cell| separator_cell_regex().is_match(cell))
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace() && *c != '\n').count()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Line,
    ListItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Exact source text including line terminators
    pub text: &'a str,
    pub kind: BlockKind,
    pub signature: String,
    pub normalized: String,
}

impl<'a> Block<'a> {
    pub fn new(text: &'a str, kind: BlockKind) -> Self {
        Self {
            text,
            kind,
            signature: signature(text),
            normalized: normalize(text),
        }
    }

    /// Same structure and same normalized content.
    pub fn matches(&self, other: &Block<'_>) -> bool {
        self.signature == other.signature && self.normalized == other.normalized
    }
}

/// Split `text` into blocks. Concatenating block texts gives back `text`.
pub fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut blocks = Vec::new();
    let mut offset = 0;
    let mut i = 0;

    while i < lines.len() {
        let start = offset;
        let (kind, end) = match list_marker(lines[i]) {
            Some((indent, _)) => {
                let mut end = i + 1;
                while end < lines.len()
                    && (is_blank(lines[end]) || indent_width(lines[end]) > indent)
                {
                    end += 1;
                }
                (BlockKind::ListItem, end)
            }
            None => (BlockKind::Line, i + 1),
        };

        offset += lines[i..end].iter().map(|l| l.len()).sum::<usize>();
        blocks.push(Block::new(&text[start..offset], kind));
        i = end;
    }

    blocks
}

/// Per physical line: `indent:marker` with digits folded to `#`, or
/// `paragraph`; joined with `|`.
pub fn signature(block: &str) -> String {
    block
        .trim_end()
        .split('\n')
        .map(|line| match list_marker(line) {
            Some((indent, marker)) => {
                let marker: String = marker
                    .chars()
                    .map(|c| if c.is_ascii_digit() { '#' } else { c })
                    .collect();
                format!("{indent}:{marker}")
            }
            None => "paragraph".to_string(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Annotation-stripped, whitespace-collapsed text with blank lines dropped.
pub fn normalize(block: &str) -> String {
    block
        .split('\n')
        .filter(|line| !is_blank(line))
        .map(|line| match list_line(line.trim_end()) {
            Some(list) => {
                let indent = if list.prefix.starts_with(char::is_whitespace) {
                    " "
                } else {
                    ""
                };
                let body = collapse_whitespace(&annotations::accept_all(list.body));
                format!("{indent}{} {body}", collapse_whitespace(list.prefix))
                    .trim_end()
                    .to_string()
            }
            None => collapse_whitespace(&annotations::accept_all(line)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
