use crate::models::Operation;

use super::StoreError;

/// Hooks around every operation appended to a document's history.
pub trait OperationObserver {
    /// Called before `operation` joins the log
    fn before_operation(&mut self, _operation: &Operation) {}

    /// Called once `operation` is in the log
    fn after_operation(&mut self, _operation: &Operation) {}
}

/// Observers keyed by a caller-chosen id, notified in registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(String, Box<dyn OperationObserver>)>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|(id, _)| id))
            .finish()
    }
}

impl ObserverRegistry {
    pub fn register(
        &mut self,
        id: impl Into<String>,
        observer: Box<dyn OperationObserver>,
    ) -> Result<(), StoreError> {
        let id = id.into();
        if self.observers.iter().any(|(existing, _)| *existing == id) {
            return Err(StoreError::DuplicateObserver(id));
        }
        self.observers.push((id, observer));
        Ok(())
    }

    /// Returns whether an observer was registered under `id`.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| existing != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn before(&mut self, operation: &Operation) {
        for (_, observer) in &mut self.observers {
            observer.before_operation(operation);
        }
    }

    pub fn after(&mut self, operation: &Operation) {
        for (_, observer) in &mut self.observers {
            observer.after_operation(operation);
        }
    }
}
