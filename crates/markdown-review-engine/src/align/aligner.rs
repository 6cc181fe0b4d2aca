use serde::{Deserialize, Serialize};

use super::blocks::{Block, split_blocks};
use crate::diff::{Component, DiffEngine, DiffOptions};

/// How a block fared between the old and new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockVerdict {
    Unchanged,
    Inserted,
    Deleted,
    Modified,
}

/// What to do when dropping an old block and dropping a new block would
/// keep the same number of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Pair the two blocks as one modified block
    #[default]
    PreferModified,
    /// Report a deletion followed by an insertion
    PreferDeleteInsert,
}

/// One step of an alignment, with indices into the old and new block lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedBlock {
    pub verdict: BlockVerdict,
    pub old: Option<usize>,
    pub new: Option<usize>,
}

impl AlignedBlock {
    fn unchanged(old: usize, new: usize) -> Self {
        Self {
            verdict: BlockVerdict::Unchanged,
            old: Some(old),
            new: Some(new),
        }
    }

    fn modified(old: usize, new: usize) -> Self {
        Self {
            verdict: BlockVerdict::Modified,
            old: Some(old),
            new: Some(new),
        }
    }

    fn deleted(old: usize) -> Self {
        Self {
            verdict: BlockVerdict::Deleted,
            old: Some(old),
            new: None,
        }
    }

    fn inserted(new: usize) -> Self {
        Self {
            verdict: BlockVerdict::Inserted,
            old: None,
            new: Some(new),
        }
    }
}

/// Two texts split into blocks plus the alignment between them.
#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    pub old: Vec<Block<'a>>,
    pub new: Vec<Block<'a>>,
    pub steps: Vec<AlignedBlock>,
}

impl Alignment<'_> {
    pub fn verdicts(&self) -> Vec<BlockVerdict> {
        self.steps.iter().map(|s| s.verdict).collect()
    }
}

/// Aligns two block sequences.
///
/// Blocks with identical text are matched first with a Myers pass. Each
/// remaining replaced run is aligned by a longest-common-subsequence table
/// in which blocks match when their signature and normalized text agree.
/// Walking the table, a mismatch where skipping either side keeps the same
/// number of matches is settled by the [`TieBreak`] policy.
#[derive(Debug, Clone)]
pub struct BlockAligner {
    options: DiffOptions,
    tie_break: TieBreak,
    max_cells: usize,
}

impl Default for BlockAligner {
    fn default() -> Self {
        Self::new(DiffOptions::default())
    }
}

impl BlockAligner {
    /// Largest LCS table built before a run falls back to delete + insert.
    pub const DEFAULT_MAX_CELLS: usize = 4_000_000;

    pub fn new(options: DiffOptions) -> Self {
        Self {
            options: options.exact(),
            tie_break: TieBreak::default(),
            max_cells: Self::DEFAULT_MAX_CELLS,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn align_text<'a>(&self, old: &'a str, new: &'a str) -> Alignment<'a> {
        let old = split_blocks(old);
        let new = split_blocks(new);
        let steps = self.align(&old, &new);
        Alignment { old, new, steps }
    }

    pub fn align(&self, old: &[Block<'_>], new: &[Block<'_>]) -> Vec<AlignedBlock> {
        let old_texts: Vec<&str> = old.iter().map(|b| b.text).collect();
        let new_texts: Vec<&str> = new.iter().map(|b| b.text).collect();
        let components = DiffEngine::identity()
            .with_options(self.options.clone())
            .diff_tokens(&old_texts, &new_texts)
            .unwrap_or_else(|| {
                let mut parts = Vec::new();
                if !old.is_empty() {
                    parts.push(Component::removed(old.len(), ""));
                }
                if !new.is_empty() {
                    parts.push(Component::added(new.len(), ""));
                }
                parts
            });

        let mut steps = Vec::with_capacity(old.len().max(new.len()));
        let (mut o, mut n) = (0, 0);
        let mut i = 0;
        while i < components.len() {
            let part = &components[i];
            if part.removed {
                let added = components
                    .get(i + 1)
                    .filter(|next| next.added)
                    .map_or(0, |next| next.count);
                if added > 0 {
                    self.align_run(old, o..o + part.count, new, n..n + added, &mut steps);
                    n += added;
                    i += 1;
                } else {
                    steps.extend((o..o + part.count).map(AlignedBlock::deleted));
                }
                o += part.count;
            } else if part.added {
                steps.extend((n..n + part.count).map(AlignedBlock::inserted));
                n += part.count;
            } else {
                steps.extend((0..part.count).map(|k| AlignedBlock::unchanged(o + k, n + k)));
                o += part.count;
                n += part.count;
            }
            i += 1;
        }
        steps
    }

    fn align_run(
        &self,
        old: &[Block<'_>],
        old_range: std::ops::Range<usize>,
        new: &[Block<'_>],
        new_range: std::ops::Range<usize>,
        steps: &mut Vec<AlignedBlock>,
    ) {
        let (m, n) = (old_range.len(), new_range.len());
        if m.saturating_mul(n) > self.max_cells {
            log::debug!("block run of {m}x{n} too large to align, replacing wholesale");
            steps.extend(old_range.map(AlignedBlock::deleted));
            steps.extend(new_range.map(AlignedBlock::inserted));
            return;
        }

        let same = |i: usize, j: usize| old[old_range.start + i].matches(&new[new_range.start + j]);

        // lcs[i][j]: matches available in old[i..] and new[j..]
        let width = n + 1;
        let mut lcs = vec![0usize; (m + 1) * width];
        for i in (0..m).rev() {
            for j in (0..n).rev() {
                lcs[i * width + j] = if same(i, j) {
                    lcs[(i + 1) * width + j + 1] + 1
                } else {
                    lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
                };
            }
        }

        let (mut i, mut j) = (0, 0);
        while i < m && j < n {
            if same(i, j) {
                steps.push(AlignedBlock::unchanged(old_range.start + i, new_range.start + j));
                i += 1;
                j += 1;
                continue;
            }

            let skip_old = lcs[(i + 1) * width + j];
            let skip_new = lcs[i * width + j + 1];
            if skip_old == skip_new && self.tie_break == TieBreak::PreferModified {
                steps.push(AlignedBlock::modified(old_range.start + i, new_range.start + j));
                i += 1;
                j += 1;
            } else if skip_old >= skip_new {
                steps.push(AlignedBlock::deleted(old_range.start + i));
                i += 1;
            } else {
                steps.push(AlignedBlock::inserted(new_range.start + j));
                j += 1;
            }
        }
        steps.extend((old_range.start + i..old_range.end).map(AlignedBlock::deleted));
        steps.extend((new_range.start + j..new_range.end).map(AlignedBlock::inserted));
    }
}
