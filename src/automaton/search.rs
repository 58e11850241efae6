//! Matching: driving a finalized tree over text.
//!
//! All offsets are character offsets, not byte offsets.

use std::iter::{Enumerate, FusedIterator};
use std::ops::Range;
use std::str::Chars;

use super::error::{AutomatonError, Result};
use super::state::StateId;
use super::KeywordTree;

/// One keyword occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeywordMatch<'a> {
    keyword: &'a str,
    start: usize,
    end: usize,
}

impl<'a> KeywordMatch<'a> {
    /// The keyword as it was added (not case folded).
    #[inline(always)]
    pub fn keyword(&self) -> &'a str {
        self.keyword
    }

    /// Character offset of the first matched character.
    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Character offset one past the last matched character.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    /// `start..end` in characters.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// `(keyword, start)` pair.
    pub fn as_tuple(&self) -> (&'a str, usize) {
        (self.keyword, self.start)
    }
}

/// Lazy iterator over every keyword occurrence in a text.
///
/// Matches come in non-decreasing order of their end offset. Matches that
/// end at the same offset come longest first, following the failure chain
/// of the state reached at that offset. Created by
/// [`KeywordTree::search_all`].
#[derive(Debug, Clone)]
pub struct Matches<'a, 't> {
    tree: &'a KeywordTree,
    chars: Enumerate<Chars<'t>>,
    current: StateId,
    /// Next state on the output chain still to report, with its end offset.
    pending: Option<(StateId, usize)>,
}

impl<'a, 't> Matches<'a, 't> {
    fn new(tree: &'a KeywordTree, text: &'t str) -> Self {
        Self {
            tree,
            chars: text.chars().enumerate(),
            current: StateId::ROOT,
            pending: None,
        }
    }
}

impl<'a> Iterator for Matches<'a, '_> {
    type Item = KeywordMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((id, end)) = self.pending {
                let state = self.tree.node(id);
                self.pending = state.output_link().map(|next| (next, end));
                if let Some(keyword) = state.keyword() {
                    return Some(KeywordMatch {
                        keyword,
                        start: end - state.depth(),
                        end,
                    });
                }
                continue;
            }

            let (position, ch) = self.chars.next()?;
            let symbol = self.tree.folding.fold_char(ch);
            self.current = self.tree.next_state(self.current, symbol);
            if !self.current.is_root() {
                self.pending = Some((self.current, position + 1));
            }
        }
    }
}

impl FusedIterator for Matches<'_, '_> {}

impl KeywordTree {
    /// Returns an iterator over all keyword occurrences in `text`,
    /// overlapping ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::NotFinalized`] before finalization.
    pub fn search_all<'a, 't>(&'a self, text: &'t str) -> Result<Matches<'a, 't>> {
        if !self.finalized {
            return Err(AutomatonError::NotFinalized);
        }
        Ok(Matches::new(self, text))
    }

    /// Returns the first element of [`search_all`](Self::search_all), or
    /// `None` when the text contains no keyword.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::NotFinalized`] before finalization.
    pub fn search_one<'a>(&'a self, text: &str) -> Result<Option<KeywordMatch<'a>>> {
        Ok(self.search_all(text)?.next())
    }

    /// Alias for [`search_one`](Self::search_one).
    pub fn search<'a>(&'a self, text: &str) -> Result<Option<KeywordMatch<'a>>> {
        self.search_one(text)
    }

    /// Whether `text` contains any keyword.
    pub fn is_match(&self, text: &str) -> Result<bool> {
        Ok(self.search_one(text)?.is_some())
    }

    /// The goto function: state after reading `symbol` in `current`.
    #[inline]
    pub(crate) fn next_state(&self, current: StateId, symbol: char) -> StateId {
        if self.shortcuts {
            return self
                .node(current)
                .transition(symbol)
                .or_else(|| self.root().transition(symbol))
                .unwrap_or(StateId::ROOT);
        }

        let mut state = current;
        loop {
            if let Some(next) = self.node(state).transition(symbol) {
                return next;
            }
            if state.is_root() {
                return StateId::ROOT;
            }
            state = self.failure_of(state);
        }
    }
}
