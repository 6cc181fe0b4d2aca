//! Position-based change lists for edit operations.

use std::cmp::Reverse;

use crate::diff::{Component, DiffEngine, DiffOptions};
use crate::models::{ChangeKind, DiffChange};

/// Compute the changes turning `old` into `new`.
///
/// Lines are diffed first. Each replaced run of lines is diffed by word,
/// and each replaced word pair that is not bounded by whitespace is diffed
/// by character, so a typo fix records one inserted letter rather than a
/// whole new word. Equality is always exact here so that
/// [`apply_changes`] reproduces `new` byte for byte.
pub fn generate_changes(old: &str, new: &str, options: &DiffOptions) -> Vec<DiffChange> {
    if old == new {
        return Vec::new();
    }

    let options = options.exact();
    let lines = DiffEngine::lines().with_options(options.clone());
    let words = DiffEngine::words().with_options(options.clone());
    let chars = DiffEngine::chars().with_options(options);

    let mut changes = Vec::new();
    let mut position = 0;
    let parts = lines.diff(old, new).unwrap_or_else(|| replace_all(old, new));

    let mut i = 0;
    while i < parts.len() {
        let part = &parts[i];
        if part.added {
            changes.push(DiffChange::addition(position, part.value.as_str()));
        } else if part.removed {
            match parts.get(i + 1).filter(|next| next.added) {
                Some(next) => {
                    word_changes(&words, &chars, &part.value, &next.value, position, &mut changes);
                    i += 1;
                }
                None => changes.push(DiffChange::deletion(position, part.value.as_str())),
            }
            position += part.value.len();
        } else {
            position += part.value.len();
        }
        i += 1;
    }

    changes
}

fn word_changes(
    words: &DiffEngine,
    chars: &DiffEngine,
    old: &str,
    new: &str,
    base: usize,
    changes: &mut Vec<DiffChange>,
) {
    let parts = words.diff(old, new).unwrap_or_else(|| replace_all(old, new));
    let mut position = base;

    let mut i = 0;
    while i < parts.len() {
        let part = &parts[i];
        if part.added {
            changes.push(DiffChange::addition(position, part.value.as_str()));
        } else if part.removed {
            let refinable = parts.get(i + 1).filter(|next| {
                next.added && !starts_with_space(&next.value) && !ends_with_space(&part.value)
            });
            match refinable {
                Some(next) => {
                    char_changes(chars, &part.value, &next.value, position, changes);
                    i += 1;
                }
                None => changes.push(DiffChange::deletion(position, part.value.as_str())),
            }
            position += part.value.len();
        } else {
            position += part.value.len();
        }
        i += 1;
    }
}

fn char_changes(chars: &DiffEngine, old: &str, new: &str, base: usize, changes: &mut Vec<DiffChange>) {
    let parts = chars.diff(old, new).unwrap_or_else(|| replace_all(old, new));
    let mut position = base;
    for part in parts {
        if part.added {
            changes.push(DiffChange::addition(position, part.value));
        } else if part.removed {
            let len = part.value.len();
            changes.push(DiffChange::deletion(position, part.value));
            position += len;
        } else {
            position += part.value.len();
        }
    }
}

fn starts_with_space(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_whitespace)
}

fn ends_with_space(text: &str) -> bool {
    text.chars().next_back().is_some_and(char::is_whitespace)
}

/// Fallback when a search runs out of budget: replace everything.
pub(crate) fn replace_all(old: &str, new: &str) -> Vec<Component> {
    let mut parts = Vec::with_capacity(2);
    if !old.is_empty() {
        parts.push(Component::removed(1, old));
    }
    if !new.is_empty() {
        parts.push(Component::added(1, new));
    }
    parts
}

/// Replay `changes` against `old`.
///
/// Changes are applied from the highest position down, deletions before
/// additions at the same position, so earlier offsets stay valid. A change
/// that does not fit `old` is skipped with a warning.
pub fn apply_changes(old: &str, changes: &[DiffChange]) -> String {
    let mut ordered: Vec<&DiffChange> = changes.iter().collect();
    ordered.sort_by_key(|c| (Reverse(c.position), c.kind == ChangeKind::Addition));

    let mut text = old.to_string();
    for change in ordered {
        match change.kind {
            ChangeKind::Addition if text.is_char_boundary(change.position) => {
                text.insert_str(change.position, &change.text);
            }
            ChangeKind::Deletion
                if text.is_char_boundary(change.position)
                    && text.is_char_boundary(change.position + change.length) =>
            {
                text.replace_range(change.position..change.position + change.length, "");
            }
            _ => log::warn!(
                "skipping {:?} at {} that does not fit a {} byte string",
                change.kind,
                change.position,
                text.len()
            ),
        }
    }
    text
}
