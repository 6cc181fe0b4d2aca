use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::models::{DiffChange, ElementMetadata};

/// One recorded mutation of the document. Immutable once appended to the
/// log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub element_id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub data: OperationData,
}

impl Operation {
    /// A new operation with a fresh id, stamped with the current time.
    pub fn new(element_id: impl Into<String>, user_id: Option<String>, data: OperationData) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            element_id: element_id.into(),
            timestamp,
            user_id,
            data,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.data.kind()
    }
}

/// Payload of an operation, discriminated by its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum OperationData {
    Insert(InsertData),
    Delete(DeleteData),
    Edit(EditData),
    Move(MoveData),
}

impl OperationData {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationData::Insert(_) => OperationKind::Insert,
            OperationData::Delete(_) => OperationKind::Delete,
            OperationData::Edit(_) => OperationKind::Edit,
            OperationData::Move(_) => OperationKind::Move,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Insert,
    Delete,
    Edit,
    Move,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Insert => "insert",
            OperationKind::Delete => "delete",
            OperationKind::Edit => "edit",
            OperationKind::Move => "move",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertData {
    pub content: String,
    pub metadata: ElementMetadata,
    pub position: InsertPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Set when the element was produced by a tool rather than typed
    #[serde(default)]
    pub generated: bool,
}

/// Where an inserted element goes. With neither anchor set it is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl InsertPosition {
    pub fn after(id: impl Into<String>) -> Self {
        Self {
            after: Some(id.into()),
            before: None,
        }
    }

    pub fn before(id: impl Into<String>) -> Self {
        Self {
            after: None,
            before: Some(id.into()),
        }
    }

    pub fn end() -> Self {
        Self::default()
    }

    /// The element this position is relative to, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.after.as_deref().or(self.before.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteData {
    pub original_content: String,
    pub original_metadata: ElementMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditData {
    pub old_content: String,
    pub new_content: String,
    pub changes: Vec<DiffChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_metadata: Option<ElementMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_metadata: Option<ElementMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub from_position: usize,
    pub to_position: usize,
}
