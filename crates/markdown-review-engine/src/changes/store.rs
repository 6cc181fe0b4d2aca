use std::collections::{HashMap, HashSet};

use crate::align::TieBreak;
use crate::annotations::{StripMode, StripOptions, strip_annotations};
use crate::diff::DiffOptions;
use crate::models::{
    DeleteData, EditData, Element, ElementMetadata, InsertData, InsertPosition, MoveData,
    Operation, OperationData, OperationKind,
};
use crate::plain_text::{PlainText, label};
use crate::render::{AnnotationRenderer, normalize_markdown_whitespace};

use super::{ChangeSummary, ObserverRegistry, OperationLog, OperationObserver, StoreError};

/// Behaviour knobs for a [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Budget and equality for edit diffs and rendering
    pub diff: DiffOptions,
    /// Normalize list and blockquote spacing before rendering tracked changes
    pub normalize_whitespace: bool,
    /// Keep review comments as HTML comments in clean exports
    pub preserve_comments: bool,
    pub tie_break: TieBreak,
}

/// Extra data recorded with an inserted element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOptions {
    pub parent_id: Option<String>,
    /// Inserted by tooling rather than typed by a reviewer
    pub generated: bool,
}

/// One piece of an element that is being split up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub content: String,
    pub metadata: ElementMetadata,
}

impl Segment {
    pub fn new(content: impl Into<String>, metadata: ElementMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// A mutation described as data, for callers that route changes through a
/// single entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRequest {
    Insert {
        content: String,
        metadata: ElementMetadata,
        position: InsertPosition,
        user_id: Option<String>,
    },
    Delete {
        element_id: String,
        user_id: Option<String>,
    },
    Edit {
        element_id: String,
        new_content: String,
        user_id: Option<String>,
        metadata: Option<ElementMetadata>,
    },
    Move {
        element_id: String,
        from: usize,
        to: usize,
        user_id: Option<String>,
    },
}

/// The original elements of a document plus the operations applied to them.
///
/// The original list is never modified; every query replays the log over
/// it. Mutations validate against the current state first, so a failed
/// call leaves both log and state untouched.
///
/// ```
/// use markdown_review_engine::changes::DocumentStore;
/// use markdown_review_engine::models::{Element, ElementMetadata};
///
/// let mut store = DocumentStore::new(vec![Element::new(
///     "p1",
///     "- Alpha\n- Beta\n- Gamma\n",
///     ElementMetadata::list(),
/// )])
/// .unwrap();
///
/// store.edit("p1", "- Alpha\n- Beta2\n- Gamma\n", None, None).unwrap();
/// assert_eq!(
///     store.element_content_with_tracked_changes("p1").unwrap(),
///     "- Alpha\n- {~~Beta~>Beta2~~}\n- Gamma\n"
/// );
///
/// assert!(store.undo());
/// assert_eq!(store.element_content("p1").unwrap(), "- Alpha\n- Beta\n- Gamma\n");
/// ```
pub struct DocumentStore {
    original: Vec<Element>,
    log: OperationLog,
    baselines: HashMap<String, String>,
    observers: ObserverRegistry,
    renderer: AnnotationRenderer,
    options: StoreOptions,
}

impl DocumentStore {
    pub fn new(elements: Vec<Element>) -> Result<Self, StoreError> {
        Self::with_options(elements, StoreOptions::default())
    }

    pub fn with_options(elements: Vec<Element>, options: StoreOptions) -> Result<Self, StoreError> {
        let mut seen = HashSet::new();
        let mut duplicates: Vec<String> = Vec::new();
        for element in &elements {
            if !seen.insert(element.id.as_str()) && !duplicates.contains(&element.id) {
                duplicates.push(element.id.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(StoreError::DuplicateIds(duplicates));
        }

        Ok(Self {
            original: elements,
            log: OperationLog::new(options.diff.clone()),
            baselines: HashMap::new(),
            observers: ObserverRegistry::default(),
            renderer: AnnotationRenderer::new(options.diff.clone()).with_tie_break(options.tie_break),
            options,
        })
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn original_elements(&self) -> &[Element] {
        &self.original
    }

    fn record(&mut self, element_id: &str, user_id: Option<String>, data: OperationData) {
        let operation = Operation::new(element_id, user_id, data);
        log::debug!("recording {} of {}", operation.kind(), operation.element_id);

        self.observers.before(&operation);
        self.log.append(operation);
        if let Some(operation) = self.log.operations().last() {
            self.observers.after(operation);
        }
    }

    fn find(&self, id: &str) -> Result<Element, StoreError> {
        self.element(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Insert a new element and return its temporary id.
    pub fn insert(
        &mut self,
        content: impl Into<String>,
        metadata: ElementMetadata,
        position: InsertPosition,
        user_id: Option<String>,
        options: InsertOptions,
    ) -> Result<String, StoreError> {
        if let Some(anchor) = position.anchor() {
            self.find(anchor)?;
        }

        let id = format!("temp-{}", uuid::Uuid::new_v4());
        let data = InsertData {
            content: content.into(),
            metadata,
            position,
            parent_id: options.parent_id,
            generated: options.generated,
        };
        self.record(&id, user_id, OperationData::Insert(data));
        Ok(id)
    }

    pub fn delete(&mut self, id: &str, user_id: Option<String>) -> Result<(), StoreError> {
        let element = self.find(id)?;
        let data = DeleteData {
            original_content: element.content,
            original_metadata: element.metadata,
        };
        self.record(id, user_id, OperationData::Delete(data));
        Ok(())
    }

    /// Replace an element's content, and its metadata when given.
    ///
    /// An edit that would change neither is not recorded.
    pub fn edit(
        &mut self,
        id: &str,
        new_content: impl Into<String>,
        user_id: Option<String>,
        new_metadata: Option<ElementMetadata>,
    ) -> Result<(), StoreError> {
        let element = self.find(id)?;
        let new_content = new_content.into();

        let content_changed = element.content != new_content;
        let new_metadata = new_metadata.filter(|metadata| *metadata != element.metadata);
        if !content_changed && new_metadata.is_none() {
            log::debug!("edit of {id} changes nothing, skipping");
            return Ok(());
        }

        let changes = self.log.edit_changes(&element.content, &new_content);
        let old_metadata = new_metadata.as_ref().map(|_| element.metadata);
        let data = EditData {
            old_content: element.content,
            new_content,
            changes,
            old_metadata,
            new_metadata,
        };
        self.record(id, user_id, OperationData::Edit(data));
        Ok(())
    }

    /// Move the element at `from` to `to`. Both positions index the current
    /// state and `from` must hold `id`.
    pub fn move_element(
        &mut self,
        id: &str,
        from: usize,
        to: usize,
        user_id: Option<String>,
    ) -> Result<(), StoreError> {
        let state = self.current_state();
        if !state.iter().any(|e| e.id == id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let len = state.len();
        if from >= len || to >= len || state[from].id != id {
            return Err(StoreError::InvalidMove {
                id: id.to_string(),
                from,
                to,
                len,
            });
        }

        let data = MoveData {
            from_position: from,
            to_position: to,
        };
        self.record(id, user_id, OperationData::Move(data));
        Ok(())
    }

    /// Edit the element to the first segment and insert the rest after it,
    /// in order. Returns the ids of all resulting elements.
    pub fn replace_element_with_segments(
        &mut self,
        id: &str,
        segments: Vec<Segment>,
    ) -> Result<Vec<String>, StoreError> {
        let element = self.find(id)?;
        let mut segments = segments.into_iter();
        let first = segments
            .next()
            .unwrap_or_else(|| Segment::new("", element.metadata.clone()));

        self.edit(id, first.content, None, Some(first.metadata))?;
        let mut ids = vec![id.to_string()];
        for segment in segments {
            let after = ids.last().map_or(id, String::as_str).to_string();
            let new_id = self.insert(
                segment.content,
                segment.metadata,
                InsertPosition::after(after),
                None,
                InsertOptions::default(),
            )?;
            ids.push(new_id);
        }
        Ok(ids)
    }

    /// Route a [`ChangeRequest`]. Returns the new id for inserts.
    pub fn apply_change(&mut self, change: ChangeRequest) -> Result<Option<String>, StoreError> {
        match change {
            ChangeRequest::Insert {
                content,
                metadata,
                position,
                user_id,
            } => self
                .insert(content, metadata, position, user_id, InsertOptions::default())
                .map(Some),
            ChangeRequest::Delete {
                element_id,
                user_id,
            } => self.delete(&element_id, user_id).map(|()| None),
            ChangeRequest::Edit {
                element_id,
                new_content,
                user_id,
                metadata,
            } => self
                .edit(&element_id, new_content, user_id, metadata)
                .map(|()| None),
            ChangeRequest::Move {
                element_id,
                from,
                to,
                user_id,
            } => self
                .move_element(&element_id, from, to, user_id)
                .map(|()| None),
        }
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.log.undo();
        if undone {
            self.baselines.clear();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.log.redo();
        if redone {
            self.baselines.clear();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    pub fn current_state(&self) -> Vec<Element> {
        self.log.replay(&self.original, None)
    }

    /// State after the first `count` operations.
    pub fn state_after_operations(&self, count: usize) -> Vec<Element> {
        self.log.replay(&self.original, Some(count))
    }

    pub fn element(&self, id: &str) -> Option<Element> {
        self.current_state().into_iter().find(|e| e.id == id)
    }

    pub fn element_content(&self, id: &str) -> Result<String, StoreError> {
        self.find(id).map(|e| e.content)
    }

    /// Content before the current editing session: an explicit baseline,
    /// else the original content, else empty for inserted elements.
    fn baseline(&self, id: &str) -> &str {
        if let Some(baseline) = self.baselines.get(id) {
            return baseline;
        }
        self.original
            .iter()
            .find(|e| e.id == id)
            .map_or("", |e| e.content.as_str())
    }

    /// Current content with the changes since its baseline annotated.
    pub fn element_content_with_tracked_changes(&self, id: &str) -> Result<String, StoreError> {
        let element = self.find(id)?;
        Ok(self.tracked(&element))
    }

    fn tracked(&self, element: &Element) -> String {
        let baseline = self.baseline(&element.id);
        let touched = self
            .log
            .operations()
            .iter()
            .any(|op| op.element_id == element.id);
        if !touched && baseline == element.content {
            return element.content.clone();
        }

        if self.options.normalize_whitespace {
            let old = normalize_markdown_whitespace(baseline);
            let new = normalize_markdown_whitespace(&element.content);
            if old == new {
                return element.content.clone();
            }
            self.renderer.render(&old, &new)
        } else {
            self.renderer.render(baseline, &element.content)
        }
    }

    pub fn set_element_baseline(&mut self, id: impl Into<String>, content: impl Into<String>) {
        self.baselines.insert(id.into(), content.into());
    }

    pub fn clear_element_baseline(&mut self, id: &str) {
        self.baselines.remove(id);
    }

    pub fn clear_all_baselines(&mut self) {
        self.baselines.clear();
    }

    /// Element contents, trailing whitespace trimmed, separated by blank
    /// lines.
    pub fn to_markdown(&self) -> String {
        join_markdown(&self.current_state())
    }

    pub fn markdown_snapshot(&self, count: usize) -> String {
        join_markdown(&self.state_after_operations(count))
    }

    /// [`Self::to_markdown`] with every annotation accepted.
    pub fn to_clean_markdown(&self) -> String {
        self.clean(&self.to_markdown())
    }

    pub fn clean_markdown_snapshot(&self, count: usize) -> String {
        self.clean(&self.markdown_snapshot(count))
    }

    fn clean(&self, markdown: &str) -> String {
        let options = StripOptions {
            preserve_comments_as_html: self.options.preserve_comments,
        };
        strip_annotations(markdown, StripMode::Accept, options)
    }

    /// Every element with its tracked changes, separated by blank lines.
    pub fn to_tracked_markdown(&self) -> String {
        self.current_state()
            .iter()
            .map(|element| self.tracked(element))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Markdown with a comment appended to each element that has one in
    /// `comments`, keyed by element id.
    pub fn to_markdown_with_comments(&self, comments: &HashMap<String, String>) -> String {
        self.current_state()
            .iter()
            .map(|element| match comments.get(&element.id) {
                Some(comment) if !comment.trim().is_empty() => {
                    format!("{} {comment}", element.content.trim_end())
                }
                _ => element.content.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// E.g. `"Added 1 element(s), Edited 2 element(s)"`, or `"No changes"`.
    pub fn summarize_operations(&self) -> String {
        let count = |kind: OperationKind| {
            self.log
                .operations()
                .iter()
                .filter(|op| op.kind() == kind)
                .count()
        };

        let parts: Vec<String> = [
            (OperationKind::Insert, "Added"),
            (OperationKind::Delete, "Deleted"),
            (OperationKind::Edit, "Edited"),
            (OperationKind::Move, "Moved"),
        ]
        .into_iter()
        .filter_map(|(kind, verb)| match count(kind) {
            0 => None,
            n => Some(format!("{verb} {n} element(s)")),
        })
        .collect();

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Statistics over the edits in the log and the comments in the
    /// current state.
    pub fn change_summary(&self) -> ChangeSummary {
        let state = self.current_state();
        let mut summary = ChangeSummary::default();

        let mut edited: Vec<&str> = Vec::new();
        for op in self.log.operations() {
            if op.kind() == OperationKind::Edit {
                summary.total_changes += 1;
                if !edited.contains(&op.element_id.as_str()) {
                    edited.push(&op.element_id);
                }
            }
        }

        for id in edited {
            if let Some(element) = state.iter().find(|e| e.id == id) {
                summary.add_tracked(&element.metadata.kind, &self.tracked(element));
            }
        }
        for element in &state {
            summary.add_comments(&element.content);
        }
        summary
    }

    /// Short human-readable label such as `"heading: Introduction"`.
    pub fn element_label(
        &self,
        id: &str,
        plain_text: &dyn PlainText,
        max_chars: usize,
    ) -> Result<String, StoreError> {
        let element = self.find(id)?;
        Ok(label(&element.metadata.kind, &element.content, plain_text, max_chars))
    }

    /// Replace the history with previously saved operations.
    pub fn initialize_with_operations(&mut self, operations: Vec<Operation>) {
        log::info!("restoring {} operations", operations.len());
        self.log.restore(operations);
    }

    pub fn operations(&self) -> &[Operation] {
        self.log.operations()
    }

    pub fn has_unsaved_operations(&self) -> bool {
        self.log.has_unsaved()
    }

    pub fn mark_as_saved(&mut self) {
        self.log.mark_saved();
    }

    pub fn register_observer(
        &mut self,
        id: impl Into<String>,
        observer: Box<dyn OperationObserver>,
    ) -> Result<(), StoreError> {
        self.observers.register(id, observer)
    }

    pub fn unregister_observer(&mut self, id: &str) -> bool {
        self.observers.unregister(id)
    }

    /// Drop all operations and baselines.
    pub fn clear(&mut self) {
        self.log.clear();
        self.baselines.clear();
    }
}

fn join_markdown(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| e.content.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n")
}
