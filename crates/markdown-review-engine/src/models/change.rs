use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Addition,
    Deletion,
}

/// A single text change inside an edit.
///
/// `position` is a byte offset into the *old* string. A deletion removes
/// `length` bytes starting there; an addition inserts `text` at that point.
/// Replaying a list of changes in descending position order reconstructs the
/// new string, see [`crate::diff::apply_changes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub position: usize,
    pub length: usize,
    pub text: String,
}

impl DiffChange {
    pub fn addition(position: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: ChangeKind::Addition,
            position,
            length: text.len(),
            text,
        }
    }

    pub fn deletion(position: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: ChangeKind::Deletion,
            position,
            length: text.len(),
            text,
        }
    }

    pub fn is_addition(&self) -> bool {
        self.kind == ChangeKind::Addition
    }

    pub fn is_deletion(&self) -> bool {
        self.kind == ChangeKind::Deletion
    }
}
