//! # Diffing
//!
//! - [`tokenize`]: what gets compared ([`WordTokenizer`], [`LineTokenizer`],
//!   [`CharTokenizer`], [`IdentityTokenizer`]) and how tokens compare
//!   ([`Comparator`]).
//! - [`myers`]: the [`DiffEngine`] and its resumable [`DiffSearch`].
//! - [`changes`]: position-based [`crate::models::DiffChange`] lists recorded
//!   with each edit, and their replay.
//!
//! ```
//! use markdown_review_engine::diff::{Component, DiffEngine};
//!
//! let components = DiffEngine::words().diff("a red car", "a blue car").unwrap();
//! assert_eq!(
//!     components,
//!     vec![
//!         Component::common(2, "a "),
//!         Component::removed(1, "red"),
//!         Component::added(1, "blue"),
//!         Component::common(2, " car"),
//!     ]
//! );
//! ```

pub mod changes;
pub mod myers;
pub mod tokenize;

pub use changes::{apply_changes, generate_changes};
pub use myers::{Component, DiffEngine, DiffOptions, DiffSearch, SearchStatus, coalesce};
pub use tokenize::{
    CharTokenizer, Comparator, IdentityTokenizer, LineTokenizer, Tokenizer, WordTokenizer,
};
