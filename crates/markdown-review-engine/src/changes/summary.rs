use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationKind, parse};

/// Review statistics over a document's edit history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    /// Number of edit operations in the log
    pub total_changes: usize,
    pub additions: usize,
    pub deletions: usize,
    pub substitutions: usize,
    /// Edited elements per element type
    pub changes_by_element_type: BTreeMap<String, usize>,
    pub characters_added: usize,
    pub characters_removed: usize,
    pub elements_modified: usize,
    pub comments: usize,
}

impl ChangeSummary {
    /// Count the tracked changes of one edited element.
    pub(crate) fn add_tracked(&mut self, element_type: &str, tracked: &str) {
        for span in parse(tracked) {
            let chars = span.content.chars().count();
            match span.kind {
                AnnotationKind::Addition => {
                    self.additions += 1;
                    self.characters_added += chars;
                }
                AnnotationKind::Deletion => {
                    self.deletions += 1;
                    self.characters_removed += chars;
                }
                AnnotationKind::Substitution => {
                    self.substitutions += 1;
                    self.characters_removed += chars;
                    self.characters_added +=
                        span.replacement.as_deref().map_or(0, |r| r.chars().count());
                }
                AnnotationKind::Comment | AnnotationKind::Highlight => {}
            }
        }
        *self
            .changes_by_element_type
            .entry(element_type.to_string())
            .or_default() += 1;
        self.elements_modified += 1;
    }

    /// Count the review comments present in an element's content.
    pub(crate) fn add_comments(&mut self, content: &str) {
        self.comments += parse(content)
            .iter()
            .filter(|span| span.kind == AnnotationKind::Comment || span.comment.is_some())
            .count();
    }
}
