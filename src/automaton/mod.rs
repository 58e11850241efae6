//! The keyword tree: an Aho-Corasick automaton over `char` symbols.
//!
//! # Lifecycle
//!
//! A [`KeywordTree`] is built in two phases:
//!
//! 1. **Build** - [`KeywordTree::add`] inserts keywords into a trie.
//! 2. **Finalize** - [`KeywordTree::finalize`] computes failure links once.
//!
//! Afterwards the tree is immutable and [`KeywordTree::search`] /
//! [`KeywordTree::search_all`] may be called any number of times, from any
//! number of threads.
//!
//! ```rust
//! use libahocorasick::automaton::KeywordTree;
//!
//! let mut tree = KeywordTree::new(true);
//! for keyword in ["mallorca", "orca", "mallorca bella", "lacrosse"] {
//!     tree.add(keyword).unwrap();
//! }
//! tree.finalize().unwrap();
//!
//! let matches: Vec<_> = tree
//!     .search_all("malheur on mallorca bellacrosse")
//!     .unwrap()
//!     .map(|m| m.as_tuple())
//!     .collect();
//! assert_eq!(
//!     matches,
//!     vec![("mallorca", 11), ("orca", 15), ("mallorca bella", 11), ("lacrosse", 23)]
//! );
//! ```

pub mod builder;
pub mod case_fold;
pub mod error;
pub mod record;
pub mod search;
pub mod state;

mod finalize;
mod trie;

use std::fmt;

pub use builder::KeywordTreeBuilder;
pub use case_fold::CaseFolding;
pub use error::{AutomatonError, Result};
pub use record::{AutomatonRecord, RecordError, StateRecord};
pub use search::{KeywordMatch, Matches};
pub use state::{State, StateId};

/// Aho-Corasick automaton for multi-keyword search.
///
/// States live in a single arena addressed by [`StateId`]; id 0 is the
/// zero state. See the [module documentation](self) for the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTree {
    states: Vec<State>,
    folding: CaseFolding,
    shortcuts: bool,
    finalized: bool,
    keyword_count: usize,
}

impl KeywordTree {
    /// Creates an empty, unfinalized tree.
    ///
    /// With `case_insensitive` set, keywords and searched text are folded
    /// to lowercase; matches still report the keyword as it was added.
    pub fn new(case_insensitive: bool) -> Self {
        Self::with_options(CaseFolding::from_case_insensitive(case_insensitive), true)
    }

    pub(crate) fn with_options(folding: CaseFolding, shortcuts: bool) -> Self {
        Self {
            states: vec![State::root()],
            folding,
            shortcuts,
            finalized: false,
            keyword_count: 0,
        }
    }

    /// Returns a builder for configuring a tree.
    pub fn builder() -> KeywordTreeBuilder {
        KeywordTreeBuilder::new()
    }

    /// Builds and finalizes a case-sensitive tree from `keywords`.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_keywords_with(CaseFolding::Sensitive, keywords)
    }

    /// Builds and finalizes a case-insensitive tree from `keywords`.
    pub fn from_keywords_case_insensitive<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_keywords_with(CaseFolding::Lowercase, keywords)
    }

    fn from_keywords_with<I, S>(folding: CaseFolding, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::with_options(folding, true);
        for keyword in keywords {
            tree.insert(keyword.as_ref());
        }
        tree.finalize_links();
        tree
    }

    /// Whether [`finalize`](Self::finalize) has completed.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Whether keywords and text are case folded.
    pub fn is_case_insensitive(&self) -> bool {
        self.folding.is_case_insensitive()
    }

    /// The case folding policy.
    pub fn case_folding(&self) -> CaseFolding {
        self.folding
    }

    /// Whether finalize copies shortcut transitions from failure states.
    pub fn has_shortcuts(&self) -> bool {
        self.shortcuts
    }

    /// Number of states, the root included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of distinct keywords (after folding) in the tree.
    pub fn keyword_count(&self) -> usize {
        self.keyword_count
    }

    /// True if no keyword has been added.
    pub fn is_empty(&self) -> bool {
        self.keyword_count == 0
    }

    /// All states in id order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Looks up a state by id.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// The zero state.
    pub fn root(&self) -> &State {
        &self.states[StateId::ROOT.index()]
    }

    /// Stored keywords in state-id order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.iter().filter_map(State::keyword)
    }

    /// Returns true if the trie edge `parent --symbol--> target` exists,
    /// as opposed to a shortcut copied during finalization.
    pub fn is_trie_edge(&self, parent: StateId, symbol: char, target: StateId) -> bool {
        self.state(target)
            .is_some_and(|t| t.parent() == Some(parent) && t.symbol() == Some(symbol))
    }

    #[inline(always)]
    pub(crate) fn node(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }
}

impl Default for KeywordTree {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Display for KeywordTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KeywordTree({} keywords, {} states, {})",
            self.keyword_count,
            self.states.len(),
            if self.finalized { "finalized" } else { "building" }
        )
    }
}
