//! # Block alignment
//!
//! Multi-line content is compared block by block before any word-level
//! diffing happens, so that a list item edited in place shows up as one
//! modified item rather than a deleted item plus an inserted one.
//!
//! ```
//! use markdown_review_engine::align::{BlockAligner, BlockVerdict};
//!
//! let alignment = BlockAligner::default().align_text(
//!     "- Alpha\n- Beta\n- Gamma\n",
//!     "- Alpha\n- Beta2\n- Gamma\n",
//! );
//! assert_eq!(
//!     alignment.verdicts(),
//!     vec![BlockVerdict::Unchanged, BlockVerdict::Modified, BlockVerdict::Unchanged]
//! );
//! ```

pub mod aligner;
pub mod blocks;

pub use aligner::{AlignedBlock, Alignment, BlockAligner, BlockVerdict, TieBreak};
pub use blocks::{Block, BlockKind, split_blocks};
