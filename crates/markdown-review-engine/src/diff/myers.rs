//! Myers O(ND) shortest edit script.
//!
//! The search walks diagonals `k = old_pos - new_pos` in rounds of growing
//! edit distance. In each round every live diagonal extends whichever
//! neighbouring path has made more progress through the old sequence
//! (insertion wins a tie), then slides down the snake of equal tokens. The
//! first path to reach the end of both sequences is a shortest script.
//!
//! Paths share history through an append-only arena of component nodes, so
//! extending a path never copies its past.
//!
//! The search is resumable: [`DiffSearch::step`] runs a bounded number of
//! rounds and hands control back, which lets a caller interleave long diffs
//! with other work. [`DiffEngine::diff`] simply steps until done, so both
//! modes produce identical output.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::tokenize::{
    CharTokenizer, Comparator, IdentityTokenizer, LineTokenizer, Tokenizer, WordTokenizer,
};

/// A run of tokens that were kept, added or removed.
///
/// Common runs carry the new-side text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub count: usize,
    pub added: bool,
    pub removed: bool,
    pub value: String,
}

impl Component {
    pub fn common(count: usize, value: impl Into<String>) -> Self {
        Self {
            count,
            added: false,
            removed: false,
            value: value.into(),
        }
    }

    pub fn added(count: usize, value: impl Into<String>) -> Self {
        Self {
            count,
            added: true,
            removed: false,
            value: value.into(),
        }
    }

    pub fn removed(count: usize, value: impl Into<String>) -> Self {
        Self {
            count,
            added: false,
            removed: true,
            value: value.into(),
        }
    }

    pub fn is_common(&self) -> bool {
        !self.added && !self.removed
    }
}

/// Budget and equality for a diff.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Wall-clock limit on the search
    pub timeout: Option<Duration>,
    /// Give up once the edit distance passes this; defaults to `|A| + |B|`
    pub max_edit_length: Option<usize>,
    pub comparator: Comparator,
}

impl DiffOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_edit_length(mut self, max: usize) -> Self {
        self.max_edit_length = Some(max);
        self
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_ignore_case(self, ignore_case: bool) -> Self {
        if ignore_case {
            self.with_comparator(Comparator::IgnoreCase)
        } else {
            self
        }
    }

    /// Same budget, exact equality.
    pub fn exact(&self) -> Self {
        Self {
            comparator: Comparator::Exact,
            ..self.clone()
        }
    }
}

/// A tokenizer plus options.
pub struct DiffEngine {
    tokenizer: Box<dyn Tokenizer>,
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(tokenizer: impl Tokenizer + 'static) -> Self {
        Self {
            tokenizer: Box::new(tokenizer),
            options: DiffOptions::default(),
        }
    }

    pub fn words() -> Self {
        Self::new(WordTokenizer)
    }

    pub fn lines() -> Self {
        Self::new(LineTokenizer::default())
    }

    pub fn chars() -> Self {
        Self::new(CharTokenizer)
    }

    pub fn identity() -> Self {
        Self::new(IdentityTokenizer)
    }

    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Diff two strings. `None` when the budget ran out.
    pub fn diff(&self, old: &str, new: &str) -> Option<Vec<Component>> {
        self.search(old, new).finish()
    }

    /// Diff two already segmented sequences.
    pub fn diff_tokens<S: AsRef<str>>(&self, old: &[S], new: &[S]) -> Option<Vec<Component>> {
        let old = old.iter().map(|s| Cow::Borrowed(s.as_ref())).collect();
        let new = new.iter().map(|s| Cow::Borrowed(s.as_ref())).collect();
        DiffSearch::start(self, old, new).finish()
    }

    /// Start a resumable search over two strings.
    pub fn search<'a>(&'a self, old: &'a str, new: &'a str) -> DiffSearch<'a> {
        DiffSearch::start(self, self.tokens(old), self.tokens(new))
    }

    fn tokens<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>> {
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Progress report from [`DiffSearch::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Pending,
    /// `None` when the budget ran out before a script was found
    Complete(Option<Vec<Component>>),
}

#[derive(Debug, Clone, Copy)]
struct Node {
    count: usize,
    added: bool,
    removed: bool,
    prev: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Path {
    old_pos: isize,
    last: Option<usize>,
}

/// A Myers search that can be advanced a few rounds at a time.
pub struct DiffSearch<'a> {
    tokenizer: &'a dyn Tokenizer,
    comparator: Comparator,
    old: Vec<Cow<'a, str>>,
    new: Vec<Cow<'a, str>>,
    nodes: Vec<Node>,
    best: Vec<Option<Path>>,
    offset: isize,
    edit_length: usize,
    max_edit_length: usize,
    min_diagonal: isize,
    max_diagonal: isize,
    deadline: Option<Instant>,
    outcome: Option<Option<Vec<Component>>>,
}

impl<'a> DiffSearch<'a> {
    fn start(engine: &'a DiffEngine, old: Vec<Cow<'a, str>>, new: Vec<Cow<'a, str>>) -> Self {
        let options = &engine.options;
        let (old_len, new_len) = (old.len(), new.len());
        let mut search = Self {
            tokenizer: engine.tokenizer.as_ref(),
            comparator: options.comparator.clone(),
            old,
            new,
            nodes: Vec::new(),
            best: vec![None; old_len + new_len + 3],
            offset: new_len as isize + 1,
            edit_length: 1,
            max_edit_length: options.max_edit_length.unwrap_or(old_len + new_len),
            min_diagonal: isize::MIN,
            max_diagonal: isize::MAX,
            deadline: options.timeout.map(|t| Instant::now() + t),
            outcome: None,
        };

        let mut path = Path {
            old_pos: -1,
            last: None,
        };
        let new_pos = search.extract_common(&mut path, 0);
        if search.reached_end(&path, new_pos) {
            search.outcome = Some(Some(search.build(path.last)));
        } else {
            search.set(0, Some(path));
        }
        search
    }

    /// Run at most `rounds` edit-distance rounds.
    pub fn step(&mut self, rounds: usize) -> SearchStatus {
        for _ in 0..rounds {
            if self.outcome.is_some() {
                break;
            }
            if self.edit_length > self.max_edit_length {
                log::debug!(
                    "diff gave up after edit length {} ({} tokenizer)",
                    self.max_edit_length,
                    self.tokenizer.name()
                );
                self.outcome = Some(None);
                break;
            }
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log::debug!("diff timed out at edit length {}", self.edit_length);
                self.outcome = Some(None);
                break;
            }
            self.round();
        }

        match &self.outcome {
            Some(result) => SearchStatus::Complete(result.clone()),
            None => SearchStatus::Pending,
        }
    }

    /// Step until the search completes.
    pub fn finish(mut self) -> Option<Vec<Component>> {
        loop {
            if let SearchStatus::Complete(result) = self.step(usize::MAX) {
                return result;
            }
        }
    }

    fn get(&self, diagonal: isize) -> Option<Path> {
        let index = diagonal + self.offset;
        if index < 0 {
            return None;
        }
        self.best.get(index as usize).copied().flatten()
    }

    fn set(&mut self, diagonal: isize, path: Option<Path>) {
        let index = diagonal + self.offset;
        if index >= 0
            && let Some(slot) = self.best.get_mut(index as usize)
        {
            *slot = path;
        }
    }

    fn reached_end(&self, path: &Path, new_pos: isize) -> bool {
        path.old_pos + 1 >= self.old.len() as isize && new_pos + 1 >= self.new.len() as isize
    }

    fn round(&mut self) {
        let old_len = self.old.len() as isize;
        let new_len = self.new.len() as isize;
        let d = self.edit_length as isize;

        let mut diagonal = self.min_diagonal.max(-d);
        let last = self.max_diagonal.min(d);
        while diagonal <= last {
            let remove_path = self.get(diagonal - 1);
            let add_path = self.get(diagonal + 1);
            if remove_path.is_some() {
                // Nothing reads the lower neighbour again this round
                self.set(diagonal - 1, None);
            }

            let can_add = add_path.is_some_and(|p| {
                let new_pos = p.old_pos - diagonal;
                0 <= new_pos && new_pos < new_len
            });
            let can_remove = remove_path.is_some_and(|p| p.old_pos + 1 < old_len);

            let mut base = match (remove_path, add_path) {
                (Some(remove), Some(add)) if can_add && can_remove => {
                    if remove.old_pos < add.old_pos {
                        self.extend(add, true, false, 0)
                    } else {
                        self.extend(remove, false, true, 1)
                    }
                }
                (_, Some(add)) if can_add => self.extend(add, true, false, 0),
                (Some(remove), _) if can_remove => self.extend(remove, false, true, 1),
                _ => {
                    self.set(diagonal, None);
                    diagonal += 2;
                    continue;
                }
            };

            let new_pos = self.extract_common(&mut base, diagonal);
            if self.reached_end(&base, new_pos) {
                self.outcome = Some(Some(self.build(base.last)));
                return;
            }

            self.set(diagonal, Some(base));
            if base.old_pos + 1 >= old_len {
                self.max_diagonal = self.max_diagonal.min(diagonal - 1);
            }
            if new_pos + 1 >= new_len {
                self.min_diagonal = self.min_diagonal.max(diagonal + 1);
            }
            diagonal += 2;
        }

        self.edit_length += 1;
    }

    fn extend(&mut self, path: Path, added: bool, removed: bool, old_step: isize) -> Path {
        let node = match path.last.map(|i| self.nodes[i]) {
            Some(last) if last.added == added && last.removed == removed => Node {
                count: last.count + 1,
                added,
                removed,
                prev: last.prev,
            },
            _ => Node {
                count: 1,
                added,
                removed,
                prev: path.last,
            },
        };
        self.nodes.push(node);
        Path {
            old_pos: path.old_pos + old_step,
            last: Some(self.nodes.len() - 1),
        }
    }

    /// Follow the snake of equal tokens from `path`; returns the new-side
    /// position reached.
    fn extract_common(&mut self, path: &mut Path, diagonal: isize) -> isize {
        let old_len = self.old.len() as isize;
        let new_len = self.new.len() as isize;
        let mut old_pos = path.old_pos;
        let mut new_pos = old_pos - diagonal;
        let mut count = 0;

        while new_pos + 1 < new_len
            && old_pos + 1 < old_len
            && self.comparator.equals(
                &self.old[(old_pos + 1) as usize],
                &self.new[(new_pos + 1) as usize],
            )
        {
            old_pos += 1;
            new_pos += 1;
            count += 1;
        }

        if count > 0 {
            self.nodes.push(Node {
                count,
                added: false,
                removed: false,
                prev: path.last,
            });
            path.last = Some(self.nodes.len() - 1);
        }
        path.old_pos = old_pos;
        new_pos
    }

    fn build(&self, last: Option<usize>) -> Vec<Component> {
        let mut chain = Vec::new();
        let mut cursor = last;
        while let Some(index) = cursor {
            let node = self.nodes[index];
            chain.push(node);
            cursor = node.prev;
        }
        chain.reverse();

        let mut components = Vec::with_capacity(chain.len());
        let (mut old_pos, mut new_pos) = (0, 0);
        for node in chain {
            let component = if node.removed {
                let value = self.tokenizer.join(&self.old[old_pos..old_pos + node.count]);
                old_pos += node.count;
                Component::removed(node.count, value)
            } else {
                let value = self.tokenizer.join(&self.new[new_pos..new_pos + node.count]);
                new_pos += node.count;
                if node.added {
                    Component::added(node.count, value)
                } else {
                    old_pos += node.count;
                    Component::common(node.count, value)
                }
            };
            components.push(component);
        }

        coalesce(components)
    }
}

/// Normalise every run of changes between common components to at most one
/// removal followed by one addition.
pub fn coalesce(components: Vec<Component>) -> Vec<Component> {
    let mut out = Vec::with_capacity(components.len());
    let mut removed: Option<Component> = None;
    let mut added: Option<Component> = None;

    fn merge(slot: &mut Option<Component>, component: Component) {
        match slot {
            Some(existing) => {
                existing.count += component.count;
                existing.value.push_str(&component.value);
            }
            None => *slot = Some(component),
        }
    }

    for component in components {
        if component.removed {
            merge(&mut removed, component);
        } else if component.added {
            merge(&mut added, component);
        } else {
            out.extend(removed.take());
            out.extend(added.take());
            match out.last_mut() {
                Some(last) if last.is_common() => {
                    last.count += component.count;
                    last.value.push_str(&component.value);
                }
                _ => out.push(component),
            }
        }
    }
    out.extend(removed);
    out.extend(added);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Rebuild the old and new sides from a component list.
    fn sides(components: &[Component]) -> (String, String) {
        let mut old = String::new();
        let mut new = String::new();
        for c in components {
            if !c.added {
                old.push_str(&c.value);
            }
            if !c.removed {
                new.push_str(&c.value);
            }
        }
        (old, new)
    }

    fn changed_tokens(components: &[Component]) -> usize {
        components
            .iter()
            .filter(|c| !c.is_common())
            .map(|c| c.count)
            .sum()
    }

    #[test]
    fn identical_input_is_one_common_component() {
        let result = DiffEngine::words().diff("same words here", "same words here");
        assert_eq!(result, Some(vec![Component::common(5, "same words here")]));
    }

    #[test]
    fn empty_inputs() {
        let engine = DiffEngine::words();
        assert_eq!(engine.diff("", ""), Some(vec![]));
        assert_eq!(engine.diff("", "new"), Some(vec![Component::added(1, "new")]));
        assert_eq!(engine.diff("old", ""), Some(vec![Component::removed(1, "old")]));
    }

    #[test]
    fn word_replacement() {
        let result = DiffEngine::words().diff("the quick fox", "the slow fox");
        assert_eq!(
            result,
            Some(vec![
                Component::common(2, "the "),
                Component::removed(1, "quick"),
                Component::added(1, "slow"),
                Component::common(2, " fox"),
            ])
        );
    }

    #[test]
    fn char_insertion() {
        let result = DiffEngine::chars().diff("wrld", "world");
        assert_eq!(
            result,
            Some(vec![
                Component::common(1, "w"),
                Component::added(1, "o"),
                Component::common(3, "rld"),
            ])
        );
    }

    #[rstest]
    #[case("abcabba", "cbabac", 5)]
    #[case("kitten", "sitting", 5)]
    #[case("", "abc", 3)]
    #[case("abc", "abc", 0)]
    #[case("abcdef", "fedcba", 10)]
    fn char_diff_is_minimal_and_complete(
        #[case] old: &str,
        #[case] new: &str,
        #[case] distance: usize,
    ) {
        let components = DiffEngine::chars().diff(old, new).unwrap();
        assert_eq!(sides(&components), (old.to_string(), new.to_string()));
        assert_eq!(changed_tokens(&components), distance);
    }

    #[test]
    fn removal_precedes_addition_within_a_run() {
        let components = DiffEngine::chars().diff("ab", "ba").unwrap();
        for pair in components.windows(2) {
            assert!(!(pair[0].added && pair[1].removed), "{components:?}");
        }
    }

    #[test]
    fn ignore_case_comparator() {
        let engine = DiffEngine::words()
            .with_options(DiffOptions::default().with_ignore_case(true));
        let result = engine.diff("Hello World", "hello world").unwrap();
        assert_eq!(result, vec![Component::common(3, "hello world")]);
    }

    #[test]
    fn max_edit_length_exhausted() {
        let engine = DiffEngine::chars()
            .with_options(DiffOptions::default().with_max_edit_length(2));
        assert_eq!(engine.diff("abcdef", "uvwxyz"), None);
        assert!(engine.diff("abcdef", "abcdefg").is_some());
    }

    #[test]
    fn zero_timeout_gives_up() {
        let engine = DiffEngine::chars()
            .with_options(DiffOptions::default().with_timeout(Duration::ZERO));
        assert_eq!(engine.diff("abc", "xyz"), None);
        // Identical input never enters the search loop
        assert!(engine.diff("abc", "abc").is_some());
    }

    #[test]
    fn stepping_matches_synchronous_result() {
        let engine = DiffEngine::words();
        let old = "one two three four five six seven";
        let new = "zero one three four 5 six seven eight";

        let mut search = engine.search(old, new);
        let mut turns = 0;
        let stepped = loop {
            turns += 1;
            if let SearchStatus::Complete(result) = search.step(1) {
                break result;
            }
        };

        assert!(turns > 1);
        assert_eq!(stepped, engine.diff(old, new));
    }

    #[test]
    fn diff_tokens_over_segments() {
        let old = ["# Title\n", "- a\n", "- b\n"];
        let new = ["# Title\n", "- b\n"];
        let components = DiffEngine::identity().diff_tokens(&old, &new).unwrap();
        assert_eq!(
            components,
            vec![
                Component::common(1, "# Title\n"),
                Component::removed(1, "- a\n"),
                Component::common(1, "- b\n"),
            ]
        );
    }

    #[test]
    fn coalesce_merges_interleaved_changes() {
        let merged = coalesce(vec![
            Component::common(1, "a"),
            Component::added(1, "x"),
            Component::removed(1, "b"),
            Component::added(1, "y"),
            Component::common(1, "c"),
        ]);
        assert_eq!(
            merged,
            vec![
                Component::common(1, "a"),
                Component::removed(1, "b"),
                Component::added(2, "xy"),
                Component::common(1, "c"),
            ]
        );
    }
}
