//! Arena-allocated trie states.
//!
//! All cross references between states (children, parent, failure link,
//! output link) are [`StateId`] indices into the owning tree's state vector,
//! so the cyclic graph formed by failure links never needs shared ownership.

use std::fmt;

use smallvec::SmallVec;

/// Below this many edges a linear scan beats binary search.
const LINEAR_SCAN_THRESHOLD: usize = 16;

/// Dense identifier of a state, assigned in creation order.
///
/// Id 0 is always the zero state (the root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// The zero state.
    pub const ROOT: StateId = StateId(0);

    /// Creates an id from a raw index.
    pub fn new(id: usize) -> Self {
        StateId(id)
    }

    /// Returns the raw index of this id.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns true for the zero state.
    #[inline(always)]
    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single trie node.
///
/// A state owns its direct children (the real trie edges). After
/// finalization its transition table may additionally hold shortcut edges
/// copied from its failure chain; a shortcut never replaces a trie edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,

    /// Symbol on the trie edge from the parent. `None` only for the root.
    symbol: Option<char>,

    /// Owning parent. Only read while computing failure links.
    parent: Option<StateId>,

    /// Outgoing edges, kept sorted by symbol.
    transitions: SmallVec<[(char, StateId); 4]>,

    /// Original (unfolded) keyword ending here, present iff terminal.
    keyword: Option<Box<str>>,

    /// Number of characters on the path from the root.
    depth: usize,

    /// Longest strict suffix. Set by finalize.
    failure_link: Option<StateId>,

    /// Nearest terminal state strictly along the failure chain.
    output_link: Option<StateId>,
}

impl State {
    /// Creates the zero state.
    pub(crate) fn root() -> Self {
        Self {
            id: StateId::ROOT,
            symbol: None,
            parent: None,
            transitions: SmallVec::new(),
            keyword: None,
            depth: 0,
            failure_link: None,
            output_link: None,
        }
    }

    /// Creates a non-root state reached from `parent` via `symbol`.
    pub(crate) fn new(id: StateId, symbol: char, parent: StateId, depth: usize) -> Self {
        Self {
            id,
            symbol: Some(symbol),
            parent: Some(parent),
            transitions: SmallVec::new(),
            keyword: None,
            depth,
            failure_link: None,
            output_link: None,
        }
    }

    /// Identifier of this state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Symbol of the incoming trie edge, `None` for the root.
    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    /// The owning parent, `None` for the root.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Whether some keyword ends exactly at this state.
    pub fn is_terminal(&self) -> bool {
        self.keyword.is_some()
    }

    /// The original keyword stored at this state, if terminal.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Length in characters of the path spelled from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The longest strict suffix state. `None` before finalization.
    pub fn failure_link(&self) -> Option<StateId> {
        self.failure_link
    }

    /// All outgoing edges (trie edges and shortcuts) sorted by symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.transitions.iter().copied()
    }

    /// Number of outgoing edges, shortcuts included.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Returns the target of the edge labelled `symbol`.
    ///
    /// Uses linear search for small edge counts, binary search for larger.
    #[inline]
    pub fn transition(&self, symbol: char) -> Option<StateId> {
        if self.transitions.len() < LINEAR_SCAN_THRESHOLD {
            self.transitions
                .iter()
                .find(|(c, _)| *c == symbol)
                .map(|(_, t)| *t)
        } else {
            self.transitions
                .binary_search_by_key(&symbol, |(c, _)| *c)
                .ok()
                .map(|idx| self.transitions[idx].1)
        }
    }

    /// Add an edge, maintaining sorted order. An existing edge is kept.
    pub(crate) fn add_transition(&mut self, symbol: char, target: StateId) -> bool {
        match self.transitions.binary_search_by_key(&symbol, |(c, _)| *c) {
            Ok(_) => false,
            Err(idx) => {
                self.transitions.insert(idx, (symbol, target));
                true
            }
        }
    }

    pub(crate) fn set_keyword(&mut self, keyword: &str) {
        self.keyword = Some(keyword.into());
    }

    pub(crate) fn set_failure_link(&mut self, link: StateId) {
        self.failure_link = Some(link);
    }

    pub(crate) fn output_link(&self) -> Option<StateId> {
        self.output_link
    }

    pub(crate) fn set_output_link(&mut self, link: Option<StateId>) {
        self.output_link = link;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_stay_sorted() {
        let mut state = State::root();
        for (i, ch) in "zyxabc".chars().enumerate() {
            assert!(state.add_transition(ch, StateId::new(i + 1)));
        }
        let symbols: String = state.transitions().map(|(c, _)| c).collect();
        assert_eq!(symbols, "abcxyz");
        assert_eq!(state.transition('x'), Some(StateId::new(3)));
        assert_eq!(state.transition('q'), None);
    }

    #[test]
    fn test_existing_transition_wins() {
        let mut state = State::root();
        assert!(state.add_transition('a', StateId::new(1)));
        assert!(!state.add_transition('a', StateId::new(7)));
        assert_eq!(state.transition('a'), Some(StateId::new(1)));
    }

    #[test]
    fn test_binary_search_on_large_tables() {
        let mut state = State::root();
        for (i, ch) in ('a'..='z').enumerate() {
            state.add_transition(ch, StateId::new(i + 1));
        }
        assert!(state.transition_count() >= LINEAR_SCAN_THRESHOLD);
        assert_eq!(state.transition('a'), Some(StateId::new(1)));
        assert_eq!(state.transition('m'), Some(StateId::new(13)));
        assert_eq!(state.transition('z'), Some(StateId::new(26)));
        assert_eq!(state.transition('A'), None);
    }

    #[test]
    fn test_root_has_no_parent_or_symbol() {
        let root = State::root();
        assert!(root.id().is_root());
        assert_eq!(root.parent(), None);
        assert_eq!(root.symbol(), None);
        assert!(!root.is_terminal());
    }
}
