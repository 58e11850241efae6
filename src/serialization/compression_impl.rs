//! Gzip compression wrapper for serializers.

use std::io::{Read, Write};

use crate::automaton::AutomatonRecord;

use super::{AutomatonSerializer, SerializationError};

/// Gzip-compressed serializer wrapper.
///
/// This wrapper applies gzip compression to any underlying serializer.
///
/// # Example
///
/// ```rust
/// use libahocorasick::prelude::*;
///
/// let tree = KeywordTree::from_keywords(["test", "testing"]);
///
/// let mut buffer = Vec::new();
/// GzipSerializer::<BincodeSerializer>::serialize(&tree, &mut buffer).unwrap();
///
/// let loaded = GzipSerializer::<BincodeSerializer>::deserialize(&buffer[..]).unwrap();
/// assert_eq!(loaded, tree);
/// ```
pub struct GzipSerializer<S> {
    _inner: std::marker::PhantomData<S>,
}

impl<S: AutomatonSerializer> AutomatonSerializer for GzipSerializer<S> {
    fn write_record<W: Write>(record: &AutomatonRecord, writer: W) -> Result<(), SerializationError> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut encoder = GzEncoder::new(writer, Compression::default());
        S::write_record(record, &mut encoder)?;
        encoder.finish().map_err(SerializationError::Io)?;
        Ok(())
    }

    fn read_record<R: Read>(reader: R) -> Result<AutomatonRecord, SerializationError> {
        use flate2::read::GzDecoder;

        let decoder = GzDecoder::new(reader);
        S::read_record(decoder)
    }
}
