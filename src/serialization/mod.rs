//! Keyword tree persistence.
//!
//! This module wraps [`KeywordTree::dump`] and [`KeywordTree::load`] with
//! concrete encodings (bincode, JSON) and optional gzip compression. The
//! encoded value is always an [`AutomatonRecord`], so any stage of the
//! lifecycle (finalized or not) round-trips exactly.
//!
//! # Example
//!
//! ```rust
//! use libahocorasick::prelude::*;
//!
//! let tree = KeywordTree::from_keywords(["peter", "horst", "gandalf", "frodo"]);
//!
//! let mut buffer = Vec::new();
//! BincodeSerializer::serialize(&tree, &mut buffer).unwrap();
//!
//! let loaded = BincodeSerializer::deserialize(&buffer[..]).unwrap();
//! assert_eq!(loaded, tree);
//! ```

use std::io::{Read, Write};

use crate::automaton::{AutomatonRecord, KeywordTree, RecordError};

// Serializer implementations
mod bincode_impl;
mod json_impl;

#[cfg(feature = "compression")]
mod compression_impl;

// Re-exports
pub use self::bincode_impl::BincodeSerializer;
pub use self::json_impl::JsonSerializer;

#[cfg(feature = "compression")]
pub use self::compression_impl::GzipSerializer;

/// Trait for serializing and deserializing keyword trees.
pub trait AutomatonSerializer {
    /// Serialize a tree to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn serialize<W: Write>(tree: &KeywordTree, writer: W) -> Result<(), SerializationError> {
        Self::write_record(&tree.dump(), writer)
    }

    /// Deserialize a tree from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or if the decoded
    /// record is inconsistent.
    fn deserialize<R: Read>(reader: R) -> Result<KeywordTree, SerializationError> {
        let record = Self::read_record(reader)?;
        Ok(KeywordTree::load(record)?)
    }

    /// Encode a record.
    fn write_record<W: Write>(record: &AutomatonRecord, writer: W) -> Result<(), SerializationError>;

    /// Decode a record without validating it.
    fn read_record<R: Read>(reader: R) -> Result<AutomatonRecord, SerializationError>;
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during bincode serialization
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    /// Error during JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Decoded record does not describe a valid tree
    #[error("Invalid automaton record: {0}")]
    Record(#[from] RecordError),
}
