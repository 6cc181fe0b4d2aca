//! # markdown-review-engine
//!
//! Change tracking for markdown documents under review. Reviewers edit a
//! document made of block-level [`models::Element`]s; every edit lands in an
//! operation log and can be shown inline as CriticMarkup, accepted or
//! rejected.
//!
//! Layers, leaf first:
//!
//! - [`diff`]: tokenizers and a Myers diff engine with time and edit budgets
//! - [`align`]: block splitting and alignment of multi-line content
//! - [`render`]: merging old and new text into one annotated string
//! - [`annotations`]: accepting, rejecting and building annotations
//! - [`changes`]: the operation log, document store and review statistics
//!
//! ```
//! use markdown_review_engine::annotations::{accept_all, reject_all};
//! use markdown_review_engine::render::AnnotationRenderer;
//!
//! let old = "Teh quick fox\n";
//! let new = "The quick brown fox\n";
//! let annotated = AnnotationRenderer::default().render(old, new);
//! assert_eq!(accept_all(&annotated), new);
//! assert_eq!(reject_all(&annotated), old);
//! ```

pub mod align;
pub mod annotations;
pub mod changes;
pub mod diff;
pub mod models;
pub mod plain_text;
pub mod render;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use changes::{ChangeRequest, ChangeSummary, DocumentStore, StoreError, StoreOptions};
pub use diff::{DiffEngine, DiffOptions};
pub use models::*;
pub use plain_text::{MarkdownPlainText, PlainText};
pub use render::AnnotationRenderer;
