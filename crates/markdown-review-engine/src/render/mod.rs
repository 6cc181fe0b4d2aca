//! # Tracked-change rendering
//!
//! [`AnnotationRenderer`] merges an old and a new text into one string in
//! which every difference is marked up as an addition, deletion or
//! substitution. Accepting all annotations in the output gives back the new
//! text; rejecting them gives back the old text.
//!
//! Rendering works top down:
//!
//! 1. Both texts are split into blocks (lines and list items) and aligned
//!    by a [`BlockAligner`]. Deleted and inserted blocks are wrapped whole.
//! 2. A modified block is diffed line by line. Leftover lines of a replaced
//!    run are wrapped whole, paired lines are rendered individually.
//! 3. A paired line keeps its list marker or table cell borders outside the
//!    markup and is diffed word by word. A single changed word that still
//!    looks like the old one is diffed once more character by character.
//!
//! ```
//! use markdown_review_engine::render::AnnotationRenderer;
//!
//! let renderer = AnnotationRenderer::default();
//! assert_eq!(
//!     renderer.render("- Alpha\n- Beta\n- Gamma\n", "- Alpha\n- Beta2\n- Gamma\n"),
//!     "- Alpha\n- {~~Beta~>Beta2~~}\n- Gamma\n"
//! );
//! ```

mod inline;
pub mod markup;
pub mod normalize;

pub use markup::{addition, deletion, substitution};
pub use normalize::normalize_markdown_whitespace;

use crate::align::blocks::{
    is_blank, is_table_row, is_table_separator, list_line, split_terminator,
};
use crate::align::{BlockAligner, BlockVerdict, TieBreak};
use crate::diff::{Component, DiffEngine, DiffOptions, apply_changes};
use crate::models::DiffChange;

use inline::InlineDiff;
use markup::Markup;

pub struct AnnotationRenderer {
    aligner: BlockAligner,
    lines: DiffEngine,
    inline: InlineDiff,
}

impl Default for AnnotationRenderer {
    fn default() -> Self {
        Self::new(DiffOptions::default())
    }
}

impl AnnotationRenderer {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            aligner: BlockAligner::new(options.clone()),
            lines: DiffEngine::identity().with_options(options.exact()),
            inline: InlineDiff::new(&options.exact()),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.aligner = self.aligner.with_tie_break(tie_break);
        self
    }

    pub fn with_max_alignment_cells(mut self, max_cells: usize) -> Self {
        self.aligner = self.aligner.with_max_cells(max_cells);
        self
    }

    /// Render `new` with the differences from `old` annotated.
    pub fn render(&self, old: &str, new: &str) -> String {
        if old == new {
            return new.to_string();
        }

        let alignment = self.aligner.align_text(old, new);
        let mut markup = Markup::default();
        for step in &alignment.steps {
            match (step.verdict, step.old, step.new) {
                (BlockVerdict::Deleted, Some(o), _) => markup.delete(alignment.old[o].text),
                (BlockVerdict::Inserted, _, Some(n)) => markup.insert(alignment.new[n].text),
                (_, Some(o), Some(n)) => {
                    let (old_block, new_block) = (alignment.old[o].text, alignment.new[n].text);
                    if old_block == new_block {
                        markup.text(new_block);
                    } else {
                        // Also reached by blocks equal only after normalization
                        self.render_block(&mut markup, old_block, new_block);
                    }
                }
                _ => {}
            }
        }
        markup.finish()
    }

    /// Render the result of replaying `changes` over `old`.
    pub fn render_changes(&self, old: &str, changes: &[DiffChange]) -> String {
        self.render(old, &apply_changes(old, changes))
    }

    fn render_block(&self, markup: &mut Markup, old: &str, new: &str) {
        let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
        let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
        let parts = self
            .lines
            .diff_tokens(&old_lines, &new_lines)
            .unwrap_or_else(|| {
                [
                    Component::removed(old_lines.len(), ""),
                    Component::added(new_lines.len(), ""),
                ]
                .into_iter()
                .filter(|part| part.count > 0)
                .collect()
            });

        let (mut o, mut n) = (0, 0);
        let mut i = 0;
        while i < parts.len() {
            let part = &parts[i];
            if part.removed {
                let added = parts
                    .get(i + 1)
                    .filter(|next| next.added)
                    .map_or(0, |next| next.count);
                let removed_lines = &old_lines[o..o + part.count];
                let added_lines = &new_lines[n..n + added];
                for k in 0..removed_lines.len().max(added_lines.len()) {
                    match (removed_lines.get(k), added_lines.get(k)) {
                        (Some(a), Some(b)) => markup.text(&self.render_line(a, b)),
                        (Some(a), None) => markup.delete(a),
                        (None, Some(b)) => markup.insert(b),
                        (None, None) => {}
                    }
                }
                o += part.count;
                n += added;
                if added > 0 {
                    i += 1;
                }
            } else if part.added {
                for line in &new_lines[n..n + part.count] {
                    markup.insert(line);
                }
                n += part.count;
            } else {
                for line in &new_lines[n..n + part.count] {
                    markup.text(line);
                }
                o += part.count;
                n += part.count;
            }
            i += 1;
        }
    }

    fn render_line(&self, old: &str, new: &str) -> String {
        let (old_body, old_end) = split_terminator(old);
        let (new_body, new_end) = split_terminator(new);

        let mut out = self.render_body(old_body, new_body);
        if old_end == new_end {
            out.push_str(new_end);
        } else {
            out.push_str(&substitution(old_end, new_end));
        }
        out
    }

    fn render_body(&self, old: &str, new: &str) -> String {
        if let (Some(a), Some(b)) = (list_line(old), list_line(new))
            && a.marker_key() == b.marker_key()
        {
            return format!(
                "{}{}",
                self.inline.render(a.prefix, b.prefix),
                self.inline.render(a.body, b.body)
            );
        }

        if is_table_row(old)
            && is_table_row(new)
            && !is_table_separator(old)
            && !is_table_separator(new)
        {
            let old_cells: Vec<&str> = old.split('|').collect();
            let new_cells: Vec<&str> = new.split('|').collect();
            if old_cells.len() == new_cells.len() {
                let last = new_cells.len() - 1;
                return old_cells
                    .iter()
                    .zip(&new_cells)
                    .enumerate()
                    .map(|(i, (a, b))| {
                        // Outer borders are left as written
                        if (i == 0 || i == last) && is_blank(a) && is_blank(b) {
                            b.to_string()
                        } else {
                            self.inline.render(a, b)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("|");
            }
        }

        self.inline.render(old, new)
    }
}
