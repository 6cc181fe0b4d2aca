use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A block-level unit of the reviewed document: a heading, paragraph,
/// list, table and so on. `id` is unique within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    pub content: String,
    pub metadata: ElementMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_position: Option<SourcePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl Element {
    pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: ElementMetadata) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata,
            source_position: None,
            source_file: None,
        }
    }

    pub fn with_source(mut self, file: impl Into<String>, position: SourcePosition) -> Self {
        self.source_file = Some(file.into());
        self.source_position = Some(position);
        self
    }
}

/// Structural description of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// Element type such as `heading`, `paragraph`, `list`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

impl ElementMetadata {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn paragraph() -> Self {
        Self::new("paragraph")
    }

    pub fn heading(level: u32) -> Self {
        Self {
            level: Some(level),
            ..Self::new("heading")
        }
    }

    pub fn list() -> Self {
        Self::new("list")
    }
}

/// Where an element starts in the file it was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
