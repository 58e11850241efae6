//! Trie construction (the build phase).

use super::error::{AutomatonError, Result};
use super::state::{State, StateId};
use super::KeywordTree;

impl KeywordTree {
    /// Adds a keyword to the tree.
    ///
    /// Only allowed before [`finalize`](Self::finalize). The empty keyword is
    /// accepted and ignored. Adding a keyword twice (or, in case-insensitive
    /// mode, two keywords that fold to the same string) marks the same
    /// terminal state; the most recently added spelling is reported.
    ///
    /// Every added keyword is matchable on its own, regardless of whether a
    /// prefix or extension of it was added before.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::AlreadyFinalized`] after finalization; the
    /// tree is not modified.
    pub fn add(&mut self, keyword: &str) -> Result<()> {
        if self.finalized {
            return Err(AutomatonError::AlreadyFinalized);
        }
        self.insert(keyword);
        Ok(())
    }

    /// Inserts without the lifecycle check.
    pub(crate) fn insert(&mut self, keyword: &str) {
        if keyword.is_empty() {
            return;
        }

        let folding = self.folding;
        let mut current = StateId::ROOT;
        for ch in keyword.chars().map(|ch| folding.fold_char(ch)) {
            current = match self.node(current).transition(ch) {
                Some(next) => next,
                None => self.push_child(current, ch),
            };
        }

        let state = &mut self.states[current.index()];
        if !state.is_terminal() {
            self.keyword_count += 1;
        }
        state.set_keyword(keyword);
    }

    fn push_child(&mut self, parent: StateId, symbol: char) -> StateId {
        let id = StateId::new(self.states.len());
        let depth = self.node(parent).depth() + 1;
        self.states.push(State::new(id, symbol, parent, depth));
        self.states[parent.index()].add_transition(symbol, id);
        id
    }
}
