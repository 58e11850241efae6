//! Flat, acyclic snapshot of a tree.
//!
//! A tree's states refer to each other through parent links, failure links
//! and transitions, so the object graph is cyclic. [`AutomatonRecord`]
//! stores one [`StateRecord`] per state id with every reference written as
//! an id. [`KeywordTree::load`] rebuilds a tree in two passes: it first
//! allocates every state and links it to its parent, then checks every
//! recorded failure link and transition against the ones the trie implies.

use std::collections::BTreeMap;

use thiserror::Error;

use super::case_fold::CaseFolding;
use super::state::{State, StateId};
use super::KeywordTree;

/// Snapshot of one state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StateRecord {
    /// State id; equals the record's position.
    pub id: usize,
    /// Symbol of the incoming trie edge, `None` for the root.
    pub symbol: Option<char>,
    /// Whether a keyword ends here.
    pub terminal: bool,
    /// Original keyword, present iff `terminal`.
    pub keyword: Option<String>,
    /// Parent id, `None` for the root.
    pub parent: Option<usize>,
    /// Failure link id, `None` before finalization.
    pub failure_link: Option<usize>,
    /// Every transition (trie edges and shortcuts) by symbol.
    pub transitions: BTreeMap<char, usize>,
}

/// Snapshot of a whole tree, usable at any lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct AutomatonRecord {
    /// Whether the tree was finalized.
    pub finalized: bool,
    /// Whether keywords and text are case folded.
    pub case_insensitive: bool,
    /// Whether finalize copies shortcut transitions.
    pub shortcuts: bool,
    /// Number of states; must equal `states.len()`.
    pub state_count: usize,
    /// States in id order.
    pub states: Vec<StateRecord>,
}

/// Reasons a record cannot be turned back into a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record holds no states at all.
    #[error("Record has no states; the zero state is required")]
    Empty,

    /// `state_count` disagrees with the number of state records.
    #[error("Record declares {declared} states but holds {actual}")]
    StateCountMismatch {
        /// Declared count
        declared: usize,
        /// Records present
        actual: usize,
    },

    /// A state record is not at the position given by its id.
    #[error("State record at position {position} has id {id}")]
    IdOutOfOrder {
        /// Position in the record list
        position: usize,
        /// Id stored in the record
        id: usize,
    },

    /// The zero state has a parent, symbol or keyword.
    #[error("Zero state must not have a parent, symbol or keyword")]
    InvalidRoot,

    /// A non-root state has no parent or no symbol.
    #[error("State {0} has no parent or no incoming symbol")]
    Orphan(usize),

    /// A state's parent does not precede it.
    #[error("State {state} has parent {parent}, which is not created before it")]
    ParentNotBeforeChild {
        /// Offending state
        state: usize,
        /// Its parent id
        parent: usize,
    },

    /// `terminal` disagrees with the presence of `keyword`.
    #[error("State {0} terminal flag does not match its keyword")]
    TerminalMismatch(usize),

    /// An id reference points outside the record.
    #[error("State {state} has {field} reference to missing state {target}")]
    DanglingReference {
        /// Offending state
        state: usize,
        /// Which reference
        field: &'static str,
        /// Referenced id
        target: usize,
    },

    /// A finalized record has a state without failure link.
    #[error("State {0} has no failure link in a finalized record")]
    MissingFailureLink(usize),

    /// An unfinalized record has a failure link.
    #[error("State {0} has a failure link in an unfinalized record")]
    UnexpectedFailureLink(usize),

    /// A failure link is not the longest strict suffix of its state.
    #[error("State {state} has failure link {found}, expected {expected}")]
    FailureMismatch {
        /// Offending state
        state: usize,
        /// Failure link derived from the trie
        expected: usize,
        /// Failure link in the record
        found: usize,
    },

    /// A stored keyword does not fold to the path spelled by its state.
    #[error("State {0} stores a keyword that does not spell its path")]
    KeywordMismatch(usize),

    /// A transition table differs from the one derived from the trie:
    /// a forged or missing edge, a duplicate child, or a shortcut where the
    /// tree has none.
    #[error("State {state} has an inconsistent transition on {symbol:?}")]
    EdgeMismatch {
        /// Offending state
        state: usize,
        /// Transition symbol
        symbol: char,
    },
}

impl KeywordTree {
    /// Produces a flat snapshot of this tree.
    pub fn dump(&self) -> AutomatonRecord {
        let states = self
            .states
            .iter()
            .map(|state| StateRecord {
                id: state.id().index(),
                symbol: state.symbol(),
                terminal: state.is_terminal(),
                keyword: state.keyword().map(str::to_owned),
                parent: state.parent().map(StateId::index),
                failure_link: state.failure_link().map(StateId::index),
                transitions: state
                    .transitions()
                    .map(|(symbol, target)| (symbol, target.index()))
                    .collect(),
            })
            .collect();

        AutomatonRecord {
            finalized: self.finalized,
            case_insensitive: self.is_case_insensitive(),
            shortcuts: self.shortcuts,
            state_count: self.states.len(),
            states,
        }
    }

    /// Rebuilds a tree from a snapshot produced by [`dump`](Self::dump).
    ///
    /// # Errors
    ///
    /// Fails on any inconsistency: counts, ids, dangling references,
    /// keywords off their path, or failure links and transitions that
    /// differ from the ones finalization derives from the trie edges. No
    /// partial tree is returned.
    pub fn load(record: AutomatonRecord) -> Result<KeywordTree, RecordError> {
        let AutomatonRecord {
            finalized,
            case_insensitive,
            shortcuts,
            state_count,
            states: records,
        } = record;

        if records.is_empty() {
            return Err(RecordError::Empty);
        }
        if state_count != records.len() {
            return Err(RecordError::StateCountMismatch {
                declared: state_count,
                actual: records.len(),
            });
        }

        let mut tree =
            KeywordTree::with_options(CaseFolding::from_case_insensitive(case_insensitive), shortcuts);
        tree.states.clear();
        tree.states.reserve_exact(records.len());

        // First pass: allocate every state and hang it off its parent.
        let mut links = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let state = allocate(&tree.states, position, &record)?;
            if let Some(keyword) = state.keyword() {
                if !spells(&tree.states, &state, keyword, tree.folding) {
                    return Err(RecordError::KeywordMismatch(position));
                }
                tree.keyword_count += 1;
            }
            if let (Some(parent), Some(symbol)) = (state.parent(), state.symbol()) {
                if !tree.states[parent.index()].add_transition(symbol, state.id()) {
                    return Err(RecordError::EdgeMismatch {
                        state: parent.index(),
                        symbol,
                    });
                }
            }
            tree.states.push(state);
            links.push((record.failure_link, record.transitions));
        }

        // Failure links and shortcuts follow from the trie edges alone.
        if finalized {
            tree.finalize_links();
        }

        // Second pass: the recorded references must match the derived ones.
        let count = tree.states.len();
        for (position, (failure_link, transitions)) in links.into_iter().enumerate() {
            let state = &tree.states[position];
            for (&symbol, &target) in &transitions {
                let target = check_reference(position, "transition", target, count)?;
                if state.transition(symbol) != Some(target) {
                    return Err(RecordError::EdgeMismatch { state: position, symbol });
                }
            }
            if let Some((symbol, _)) = state
                .transitions()
                .find(|(symbol, _)| !transitions.contains_key(symbol))
            {
                return Err(RecordError::EdgeMismatch { state: position, symbol });
            }

            match (finalized, failure_link) {
                (true, None) => return Err(RecordError::MissingFailureLink(position)),
                (false, Some(_)) => return Err(RecordError::UnexpectedFailureLink(position)),
                (false, None) => {}
                (true, Some(failure)) => {
                    let found = check_reference(position, "failure", failure, count)?;
                    let expected = tree.failure_of(StateId::new(position));
                    if found != expected {
                        return Err(RecordError::FailureMismatch {
                            state: position,
                            expected: expected.index(),
                            found: found.index(),
                        });
                    }
                }
            }
        }

        log::debug!(
            "loaded keyword tree: {} states, {} keywords, finalized={}",
            tree.states.len(),
            tree.keyword_count,
            tree.finalized
        );
        Ok(tree)
    }
}

fn allocate(allocated: &[State], position: usize, record: &StateRecord) -> Result<State, RecordError> {
    if record.id != position {
        return Err(RecordError::IdOutOfOrder {
            position,
            id: record.id,
        });
    }
    if record.terminal != record.keyword.is_some() {
        return Err(RecordError::TerminalMismatch(position));
    }

    let mut state = if position == 0 {
        if record.parent.is_some() || record.symbol.is_some() || record.terminal {
            return Err(RecordError::InvalidRoot);
        }
        State::root()
    } else {
        let (Some(parent), Some(symbol)) = (record.parent, record.symbol) else {
            return Err(RecordError::Orphan(position));
        };
        let Some(parent_state) = allocated.get(parent) else {
            return Err(RecordError::ParentNotBeforeChild {
                state: position,
                parent,
            });
        };
        State::new(
            StateId::new(position),
            symbol,
            StateId::new(parent),
            parent_state.depth() + 1,
        )
    };

    if let Some(keyword) = &record.keyword {
        state.set_keyword(keyword);
    }
    Ok(state)
}

/// Whether `keyword`, folded, spells the path from the root to `state`.
/// `state` is not yet in `allocated`, its ancestors are.
fn spells(allocated: &[State], state: &State, keyword: &str, folding: CaseFolding) -> bool {
    let mut folded = keyword.chars().rev().map(|ch| folding.fold_char(ch));
    let mut current = Some(state);
    while let Some(node) = current {
        let Some(symbol) = node.symbol() else {
            break;
        };
        if folded.next() != Some(symbol) {
            return false;
        }
        current = node.parent().and_then(|p| allocated.get(p.index()));
    }
    folded.next().is_none()
}

fn check_reference(
    state: usize,
    field: &'static str,
    target: usize,
    count: usize,
) -> Result<StateId, RecordError> {
    if target < count {
        Ok(StateId::new(target))
    } else {
        Err(RecordError::DanglingReference {
            state,
            field,
            target,
        })
    }
}

impl From<&KeywordTree> for AutomatonRecord {
    fn from(tree: &KeywordTree) -> Self {
        tree.dump()
    }
}

impl TryFrom<AutomatonRecord> for KeywordTree {
    type Error = RecordError;

    fn try_from(record: AutomatonRecord) -> Result<Self, Self::Error> {
        KeywordTree::load(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(finalized: bool) -> KeywordTree {
        let builder = KeywordTree::builder()
            .case_insensitive(true)
            .keywords(["peter", "horst", "gandalf", "frodo"]);
        if finalized {
            builder.build_finalized()
        } else {
            builder.build()
        }
    }

    #[test]
    fn test_roundtrip_is_exact() {
        for finalized in [false, true] {
            let tree = sample(finalized);
            let record = tree.dump();
            assert_eq!(record.state_count, tree.state_count());
            let loaded = KeywordTree::load(record.clone()).unwrap();
            assert_eq!(loaded, tree);
            assert_eq!(loaded.dump(), record);
        }
    }

    #[test]
    fn test_load_unfinalized_then_finalize() {
        let mut loaded = KeywordTree::load(sample(false).dump()).unwrap();
        assert!(!loaded.is_finalized());
        loaded.finalize().unwrap();
        let found: Vec<_> = loaded
            .search_all("Gollum did not like frodo. But gandalf did.")
            .unwrap()
            .map(|m| m.as_tuple())
            .collect();
        assert_eq!(found, vec![("frodo", 20), ("gandalf", 31)]);
    }

    #[test]
    fn test_record_shape() {
        let record = KeywordTree::from_keywords(["ab"]).dump();
        assert!(record.finalized);
        assert!(!record.case_insensitive);
        assert_eq!(record.states.len(), 3);
        let root = &record.states[0];
        assert_eq!(root.parent, None);
        assert_eq!(root.failure_link, Some(0));
        assert_eq!(root.transitions.get(&'a'), Some(&1));
        let b = &record.states[2];
        assert!(b.terminal);
        assert_eq!(b.keyword.as_deref(), Some("ab"));
        assert_eq!(b.parent, Some(1));
        assert_eq!(b.failure_link, Some(0));
    }

    #[test]
    fn test_conversions() {
        let tree = sample(true);
        let record = AutomatonRecord::from(&tree);
        let back = KeywordTree::try_from(record).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_rejects_empty_and_count_mismatch() {
        let mut record = sample(true).dump();
        record.state_count += 1;
        assert!(matches!(
            KeywordTree::load(record),
            Err(RecordError::StateCountMismatch { .. })
        ));

        let empty = AutomatonRecord {
            finalized: false,
            case_insensitive: false,
            shortcuts: true,
            state_count: 0,
            states: Vec::new(),
        };
        assert_eq!(KeywordTree::load(empty), Err(RecordError::Empty));
    }

    #[test]
    fn test_rejects_dangling_references() {
        let mut record = sample(true).dump();
        let count = record.state_count;
        record.states[3].failure_link = Some(count + 5);
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::DanglingReference {
                state: 3,
                field: "failure",
                target: count + 5
            })
        );

        let mut record = sample(false).dump();
        record.states[1].transitions.insert('z', 999);
        assert!(matches!(
            KeywordTree::load(record),
            Err(RecordError::DanglingReference { field: "transition", .. })
        ));
    }

    #[test]
    fn test_rejects_lifecycle_inconsistencies() {
        let mut record = sample(true).dump();
        record.states[2].failure_link = None;
        assert_eq!(KeywordTree::load(record), Err(RecordError::MissingFailureLink(2)));

        let mut record = sample(false).dump();
        record.states[2].failure_link = Some(0);
        assert_eq!(KeywordTree::load(record), Err(RecordError::UnexpectedFailureLink(2)));
    }

    #[test]
    fn test_rejects_structural_damage() {
        let mut record = sample(false).dump();
        record.states[2].id = 7;
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::IdOutOfOrder { position: 2, id: 7 })
        );

        let mut record = sample(false).dump();
        record.states[5].terminal = !record.states[5].terminal;
        assert_eq!(KeywordTree::load(record), Err(RecordError::TerminalMismatch(5)));

        let mut record = sample(false).dump();
        record.states[1].parent = None;
        assert_eq!(KeywordTree::load(record), Err(RecordError::Orphan(1)));

        let mut record = sample(false).dump();
        record.states[1].parent = Some(3);
        assert!(matches!(
            KeywordTree::load(record),
            Err(RecordError::ParentNotBeforeChild { state: 1, parent: 3 })
        ));

        let mut record = sample(false).dump();
        record.states[0].symbol = Some('x');
        assert_eq!(KeywordTree::load(record), Err(RecordError::InvalidRoot));
    }

    #[test]
    fn test_rejects_edge_mismatch() {
        // 'p' -> 1 is the root's trie edge; redirect it
        let mut record = sample(false).dump();
        record.states[0].transitions.insert('p', 2);
        assert!(matches!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { .. })
        ));

        // drop a trie edge from its parent
        let mut record = sample(false).dump();
        record.states[1].transitions.clear();
        assert!(matches!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { state: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_cyclic_failure_links() {
        let mut record = KeywordTree::from_keywords(["aa"]).dump();
        // "a" -> "aa" would make the failure chain climb
        record.states[1].failure_link = Some(2);
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::FailureMismatch {
                state: 1,
                expected: 0,
                found: 2
            })
        );
    }

    #[test]
    fn test_rejects_shallower_but_wrong_failure_link() {
        let tree = KeywordTree::builder()
            .shortcuts(false)
            .keywords(["ab", "b"])
            .build_finalized();
        let mut record = tree.dump();
        // "ab" fails to "b" (state 3); the root is shallower but wrong
        assert_eq!(record.states[2].failure_link, Some(3));
        record.states[2].failure_link = Some(0);
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::FailureMismatch {
                state: 2,
                expected: 3,
                found: 0
            })
        );
    }

    #[test]
    fn test_rejects_forged_shortcuts() {
        // out of the root, to a state deeper than any text read so far
        let mut record = KeywordTree::from_keywords(["abcd"]).dump();
        record.states[0].transitions.insert('x', 4);
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { state: 0, symbol: 'x' })
        );

        // across branches: "a" --d--> "cd" would report "cd" in "ad"
        let mut record = KeywordTree::from_keywords(["ab", "cd"]).dump();
        record.states[1].transitions.insert('d', 4);
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { state: 1, symbol: 'd' })
        );

        // redirect a genuine shortcut: "ab" inherits 'c' -> "bc" from "b"
        let tree = KeywordTree::from_keywords(["ab", "bc"]);
        let mut record = tree.dump();
        assert_eq!(record.states[2].transitions.get(&'c'), Some(&4));
        record.states[2].transitions.insert('c', 3);
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { state: 2, symbol: 'c' })
        );
    }

    #[test]
    fn test_rejects_dropped_shortcut() {
        let mut record = KeywordTree::from_keywords(["ab", "bc"]).dump();
        record.states[2].transitions.remove(&'c');
        assert_eq!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { state: 2, symbol: 'c' })
        );
    }

    #[test]
    fn test_rejects_shortcuts_in_unfinalized_record() {
        let mut record = KeywordTree::from_keywords(["ab", "bc"]).dump();
        record.finalized = false;
        for state in record.states.iter_mut() {
            state.failure_link = None;
        }
        assert!(matches!(
            KeywordTree::load(record),
            Err(RecordError::EdgeMismatch { state: 2, symbol: 'c' })
        ));
    }

    #[test]
    fn test_rejects_keyword_off_its_path() {
        let mut record = KeywordTree::from_keywords(["ab", "cd"]).dump();
        record.states[2].keyword = Some("xyz".to_string());
        assert_eq!(KeywordTree::load(record), Err(RecordError::KeywordMismatch(2)));

        // folding applies: "AB" is stored on the path "ab"
        let tree = KeywordTree::from_keywords_case_insensitive(["AB"]);
        assert_eq!(KeywordTree::load(tree.dump()), Ok(tree));
    }

    #[test]
    fn test_loaded_output_links_match_finalize() {
        let tree = KeywordTree::from_keywords(["/bar", "/foo/bar", "bar", "foo", "o/b"]);
        let loaded = KeywordTree::load(tree.dump()).unwrap();
        for (a, b) in loaded.states().iter().zip(tree.states()) {
            assert_eq!(a.output_link(), b.output_link());
        }
    }
}
