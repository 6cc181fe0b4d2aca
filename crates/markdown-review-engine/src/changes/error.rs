#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Element not found: {0}")]
    NotFound(String),
    #[error("Invalid move of {id} from {from} to {to} in a document of {len} elements")]
    InvalidMove {
        id: String,
        from: usize,
        to: usize,
        len: usize,
    },
    #[error("Duplicate element ids: {}", .0.join(", "))]
    DuplicateIds(Vec<String>),
    #[error("Observer already registered: {0}")]
    DuplicateObserver(String),
}
