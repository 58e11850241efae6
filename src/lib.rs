//! # libahocorasick
//!
//! Multi-pattern substring search using Aho-Corasick keyword automata.
//!
//! Given a set of keywords, a [`KeywordTree`](automaton::KeywordTree) is
//! built once and then scans any text in a single linear pass, reporting
//! every keyword occurrence (overlapping ones included) in the order the
//! occurrences end in the text. The algorithm is described in:
//!
//! > Aho, Alfred V., and Margaret J. Corasick. "Efficient string matching:
//! > an aid to bibliographic search." Communications of the ACM 18.6
//! > (1975): 333-340.
//!
//! ## Example
//!
//! ```rust
//! use libahocorasick::prelude::*;
//!
//! let mut tree = KeywordTree::new(true);
//! tree.add("malaga").unwrap();
//! tree.add("lacrosse").unwrap();
//! tree.add("mallorca").unwrap();
//! tree.add("mallorca bella").unwrap();
//! tree.add("orca").unwrap();
//! tree.finalize().unwrap();
//!
//! let found = tree.search("My favorite islands are malaga and sylt.").unwrap();
//! assert_eq!(found.map(|m| m.as_tuple()), Some(("malaga", 24)));
//!
//! for m in tree.search_all("malheur on mallorca bellacrosse").unwrap() {
//!     println!("{} at {}", m.keyword(), m.start());
//! }
//! ```
//!
//! ## Features
//!
//! - `serialization` (default): serde support for
//!   [`AutomatonRecord`](automaton::AutomatonRecord) plus bincode and JSON
//!   serializers.
//! - `compression`: gzip wrapper for any serializer.
//! - `cli`: the `ahocorasick` command-line tool.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
pub mod dot;

#[cfg(feature = "serialization")]
pub mod serialization;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::automaton::{
        AutomatonError, AutomatonRecord, CaseFolding, KeywordMatch, KeywordTree,
        KeywordTreeBuilder, Matches, RecordError, State, StateId, StateRecord,
    };
    pub use crate::dot::DotRenderer;

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{
        AutomatonSerializer, BincodeSerializer, JsonSerializer, SerializationError,
    };

    #[cfg(feature = "compression")]
    pub use crate::serialization::GzipSerializer;
}
