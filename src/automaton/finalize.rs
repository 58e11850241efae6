//! Failure link construction (the finalize phase).
//!
//! States are processed in breadth-first order over the trie edges, so a
//! state's failure target (which is strictly shallower) is always complete,
//! shortcuts included, before the state itself is visited.

use std::collections::VecDeque;

use super::error::{AutomatonError, Result};
use super::state::StateId;
use super::KeywordTree;

impl KeywordTree {
    /// Computes failure links and freezes the tree.
    ///
    /// Must be called exactly once, after all keywords have been added and
    /// before any search.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::AlreadyFinalized`] on a second call; the
    /// tree is not modified.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(AutomatonError::AlreadyFinalized);
        }
        self.finalize_links();
        Ok(())
    }

    pub(crate) fn finalize_links(&mut self) {
        self.states[StateId::ROOT.index()].set_failure_link(StateId::ROOT);

        let mut shortcut_count = 0usize;
        let mut queue: VecDeque<StateId> = self.trie_children(StateId::ROOT).collect();

        while let Some(id) = queue.pop_front() {
            // Children must be collected before shortcuts are mixed in.
            queue.extend(self.trie_children(id));

            let failure = self.resolve_failure(id);
            let output = {
                let target = self.node(failure);
                if target.is_terminal() {
                    Some(failure)
                } else {
                    target.output_link()
                }
            };

            if self.shortcuts && !failure.is_root() {
                let inherited: Vec<(char, StateId)> = self.node(failure).transitions().collect();
                let state = &mut self.states[id.index()];
                for (symbol, target) in inherited {
                    if state.add_transition(symbol, target) {
                        shortcut_count += 1;
                    }
                }
            }

            let state = &mut self.states[id.index()];
            state.set_failure_link(failure);
            state.set_output_link(output);
        }

        self.finalized = true;
        log::debug!(
            "finalized keyword tree: {} states, {} keywords, {} shortcut transitions",
            self.states.len(),
            self.keyword_count,
            shortcut_count
        );
    }

    /// Longest strict suffix of `id`, given that every shallower state is
    /// already resolved.
    fn resolve_failure(&self, id: StateId) -> StateId {
        let state = self.node(id);
        let (Some(parent), Some(symbol)) = (state.parent(), state.symbol()) else {
            return StateId::ROOT;
        };
        if parent.is_root() {
            return StateId::ROOT;
        }

        let mut traversed = self.failure_of(parent);
        loop {
            match self.node(traversed).transition(symbol) {
                Some(target) if target != id => return target,
                _ if traversed.is_root() => return StateId::ROOT,
                _ => traversed = self.failure_of(traversed),
            }
        }
    }

    #[inline(always)]
    pub(crate) fn failure_of(&self, id: StateId) -> StateId {
        self.node(id).failure_link().unwrap_or(StateId::ROOT)
    }

    /// Trie edges of `id` (shortcut edges excluded).
    pub(crate) fn trie_children(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.node(id)
            .transitions()
            .filter(move |&(symbol, target)| self.is_trie_edge(id, symbol, target))
            .map(|(_, target)| target)
    }
}
