use crate::diff::{DiffOptions, generate_changes};
use crate::models::{DiffChange, Element, Operation, OperationData};

/// Append-only operation history with linear undo and redo.
///
/// Undo moves the newest operation onto the redo stack and redo moves it
/// back. Appending a new operation discards whatever could be redone.
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    operations: Vec<Operation>,
    redo: Vec<Operation>,
    saved: bool,
    diff: DiffOptions,
}

impl OperationLog {
    pub fn new(diff: DiffOptions) -> Self {
        Self {
            operations: Vec::new(),
            redo: Vec::new(),
            saved: true,
            diff,
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn append(&mut self, operation: Operation) {
        self.operations.push(operation);
        self.redo.clear();
        self.saved = false;
    }

    pub fn undo(&mut self) -> bool {
        let Some(operation) = self.operations.pop() else {
            return false;
        };
        self.redo.push(operation);
        self.saved = false;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(operation) = self.redo.pop() else {
            return false;
        };
        self.operations.push(operation);
        self.saved = false;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.operations.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Replace the history with a saved one. Nothing can be redone
    /// afterwards and the restored operations count as unsaved.
    pub fn restore(&mut self, operations: Vec<Operation>) {
        self.operations = operations;
        self.redo.clear();
        self.saved = false;
    }

    pub fn clear(&mut self) {
        self.operations.clear();
        self.redo.clear();
        self.saved = true;
    }

    pub fn has_unsaved(&self) -> bool {
        !self.saved && !self.operations.is_empty()
    }

    pub fn mark_saved(&mut self) {
        self.saved = true;
    }

    /// Diff recorded with an edit operation.
    pub fn edit_changes(&self, old: &str, new: &str) -> Vec<DiffChange> {
        generate_changes(old, new, &self.diff)
    }

    /// Fold the first `count` operations (all when `None`) over `original`.
    pub fn replay(&self, original: &[Element], count: Option<usize>) -> Vec<Element> {
        let limit = count.map_or(self.operations.len(), |n| n.min(self.operations.len()));
        self.operations[..limit]
            .iter()
            .fold(original.to_vec(), apply_operation)
    }
}

/// Apply one operation to an element list.
///
/// Replay never fails: an insert whose anchor is gone appends, and a move
/// whose source position is gone is skipped.
pub fn apply_operation(mut elements: Vec<Element>, operation: &Operation) -> Vec<Element> {
    match &operation.data {
        OperationData::Insert(data) => {
            let element = Element::new(&operation.element_id, &data.content, data.metadata.clone());
            let index = match (&data.position.after, &data.position.before) {
                (Some(after), _) => elements.iter().position(|e| &e.id == after).map(|i| i + 1),
                (None, Some(before)) => elements.iter().position(|e| &e.id == before),
                (None, None) => Some(elements.len()),
            };
            match index {
                Some(index) => elements.insert(index, element),
                None => {
                    log::warn!(
                        "insert anchor for {} not found, appending at the end",
                        operation.element_id
                    );
                    elements.push(element);
                }
            }
        }
        OperationData::Delete(_) => elements.retain(|e| e.id != operation.element_id),
        OperationData::Edit(data) => {
            if let Some(element) = elements.iter_mut().find(|e| e.id == operation.element_id) {
                element.content.clone_from(&data.new_content);
                if let Some(metadata) = &data.new_metadata {
                    element.metadata = metadata.clone();
                }
            }
        }
        OperationData::Move(data) => {
            if data.from_position < elements.len() {
                let element = elements.remove(data.from_position);
                let to = data.to_position.min(elements.len());
                elements.insert(to, element);
            } else {
                log::warn!(
                    "move of {} from position {} is out of range, skipping",
                    operation.element_id,
                    data.from_position
                );
            }
        }
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeleteData, ElementMetadata, InsertData, InsertPosition, MoveData};
    use pretty_assertions::assert_eq;

    fn elements() -> Vec<Element> {
        ["a", "b", "c"]
            .into_iter()
            .map(|id| Element::new(id, id.to_uppercase(), ElementMetadata::paragraph()))
            .collect()
    }

    fn ids(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(|e| e.id.as_str()).collect()
    }

    fn delete(id: &str) -> Operation {
        Operation::new(
            id,
            None,
            OperationData::Delete(DeleteData {
                original_content: String::new(),
                original_metadata: ElementMetadata::paragraph(),
            }),
        )
    }

    fn insert(id: &str, position: InsertPosition) -> Operation {
        Operation::new(
            id,
            None,
            OperationData::Insert(InsertData {
                content: "new".to_string(),
                metadata: ElementMetadata::paragraph(),
                position,
                parent_id: None,
                generated: false,
            }),
        )
    }

    fn moved(id: &str, from_position: usize, to_position: usize) -> Operation {
        Operation::new(
            id,
            None,
            OperationData::Move(MoveData {
                from_position,
                to_position,
            }),
        )
    }

    #[test]
    fn undo_and_redo_move_between_stacks() {
        let mut log = OperationLog::default();
        assert!(!log.undo());
        assert!(!log.redo());

        log.append(delete("a"));
        log.append(delete("b"));
        assert!(log.undo());
        assert!(log.can_redo());
        assert_eq!(log.len(), 1);
        assert!(log.redo());
        assert_eq!(log.len(), 2);
        assert!(!log.can_redo());
    }

    #[test]
    fn append_discards_redo() {
        let mut log = OperationLog::default();
        log.append(delete("a"));
        log.append(delete("b"));
        log.undo();
        log.undo();
        log.append(delete("c"));
        assert!(!log.can_redo());
        assert_eq!(ids(&log.replay(&elements(), None)), vec!["a", "b"]);
    }

    #[test]
    fn replay_is_bounded_by_count() {
        let mut log = OperationLog::default();
        log.append(delete("a"));
        log.append(delete("b"));
        assert_eq!(ids(&log.replay(&elements(), Some(0))), vec!["a", "b", "c"]);
        assert_eq!(ids(&log.replay(&elements(), Some(1))), vec!["b", "c"]);
        assert_eq!(ids(&log.replay(&elements(), Some(99))), vec!["c"]);
    }

    #[test]
    fn insert_positions() {
        let state = apply_operation(elements(), &insert("x", InsertPosition::after("a")));
        assert_eq!(ids(&state), vec!["a", "x", "b", "c"]);
        let state = apply_operation(elements(), &insert("x", InsertPosition::before("a")));
        assert_eq!(ids(&state), vec!["x", "a", "b", "c"]);
        let state = apply_operation(elements(), &insert("x", InsertPosition::end()));
        assert_eq!(ids(&state), vec!["a", "b", "c", "x"]);
        let state = apply_operation(elements(), &insert("x", InsertPosition::after("gone")));
        assert_eq!(ids(&state), vec!["a", "b", "c", "x"]);
    }

    #[test]
    fn moves_reorder() {
        let state = apply_operation(elements(), &moved("a", 0, 2));
        assert_eq!(ids(&state), vec!["b", "c", "a"]);
        let state = apply_operation(elements(), &moved("c", 2, 0));
        assert_eq!(ids(&state), vec!["c", "a", "b"]);
        let state = apply_operation(elements(), &moved("c", 7, 0));
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
    }

    #[test]
    fn saved_flag() {
        let mut log = OperationLog::default();
        assert!(!log.has_unsaved());
        log.append(delete("a"));
        assert!(log.has_unsaved());
        log.mark_saved();
        assert!(!log.has_unsaved());
        log.restore(vec![delete("b")]);
        assert!(log.has_unsaved());
        log.clear();
        assert!(!log.has_unsaved());
    }

    #[test]
    fn edit_changes_replay_to_new_content() {
        let log = OperationLog::default();
        let changes = log.edit_changes("one two\n", "one three\n");
        assert_eq!(crate::diff::apply_changes("one two\n", &changes), "one three\n");
    }
}
