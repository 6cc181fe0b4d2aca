//! # Change tracking
//!
//! A [`DocumentStore`] owns the original elements of a document and an
//! [`OperationLog`] of everything reviewers did to them. The current state
//! is never stored: it is the fold of the log over the original elements,
//! which makes undo a matter of popping the log.
//!
//! Edits record a position-based diff alongside the old and new content.
//! Tracked-change views render each element against its baseline through
//! [`crate::render::AnnotationRenderer`].

pub mod error;
pub mod history;
pub mod observer;
pub mod store;
pub mod summary;

pub use error::StoreError;
pub use history::{OperationLog, apply_operation};
pub use observer::{ObserverRegistry, OperationObserver};
pub use store::{ChangeRequest, DocumentStore, InsertOptions, Segment, StoreOptions};
pub use summary::ChangeSummary;
