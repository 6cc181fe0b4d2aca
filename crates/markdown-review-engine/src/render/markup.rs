//! Writing annotation markup with the whitespace rules applied.
//!
//! Whitespace-only additions are written literally and whitespace-only
//! deletions are dropped, so reflowed spacing never produces markup.

use markdown_review_syntax::{AnnotationKind, wrap_substitution};

use crate::align::blocks::is_blank;

pub fn addition(text: &str) -> String {
    if is_blank(text) {
        text.to_string()
    } else {
        AnnotationKind::Addition.wrap(text)
    }
}

pub fn deletion(text: &str) -> String {
    if is_blank(text) {
        String::new()
    } else {
        AnnotationKind::Deletion.wrap(text)
    }
}

fn common_space_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, x), y)| x != y || !x.is_whitespace())
        .map_or(a.len().min(b.len()), |((i, _), _)| i)
}

fn common_space_suffix(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (x, y) in a.chars().rev().zip(b.chars().rev()) {
        if x != y || !x.is_whitespace() {
            break;
        }
        len += x.len_utf8();
    }
    len
}

/// `old` replaced by `new`, with shared surrounding whitespace kept outside
/// the markup.
pub fn substitution(old: &str, new: &str) -> String {
    if is_blank(old) && is_blank(new) {
        return new.to_string();
    }

    let prefix = common_space_prefix(old, new);
    let suffix = common_space_suffix(&old[prefix..], &new[prefix..]);
    let inner_old = &old[prefix..old.len() - suffix];
    let inner_new = &new[prefix..new.len() - suffix];

    let inner = if inner_old.is_empty() {
        addition(inner_new)
    } else if inner_new.is_empty() {
        deletion(inner_old)
    } else {
        wrap_substitution(inner_old, inner_new)
    };
    format!("{}{inner}{}", &new[..prefix], &new[new.len() - suffix..])
}

/// Accumulates rendered output, merging adjacent whole-unit deletions and
/// insertions into single spans.
#[derive(Debug, Default)]
pub struct Markup {
    out: String,
    deleted: String,
    inserted: String,
}

impl Markup {
    pub fn text(&mut self, text: &str) {
        self.flush();
        self.out.push_str(text);
    }

    pub fn delete(&mut self, text: &str) {
        if !self.inserted.is_empty() {
            self.flush();
        }
        self.deleted.push_str(text);
    }

    pub fn insert(&mut self, text: &str) {
        self.inserted.push_str(text);
    }

    fn flush(&mut self) {
        if !self.deleted.is_empty() {
            self.out.push_str(&deletion(&self.deleted));
            self.deleted.clear();
        }
        if !self.inserted.is_empty() {
            self.out.push_str(&addition(&self.inserted));
            self.inserted.clear();
        }
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.out
    }
}
