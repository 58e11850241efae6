//! JSON serializer for human-readable format.

use std::io::{Read, Write};

use crate::automaton::AutomatonRecord;

use super::{AutomatonSerializer, SerializationError};

/// JSON serializer for human-readable format.
///
/// This serializer uses JSON for easy debugging and manual inspection.
/// It's less efficient than bincode but useful for development.
pub struct JsonSerializer;

impl AutomatonSerializer for JsonSerializer {
    fn write_record<W: Write>(record: &AutomatonRecord, mut writer: W) -> Result<(), SerializationError> {
        serde_json::to_writer_pretty(&mut writer, record)?;
        Ok(())
    }

    fn read_record<R: Read>(mut reader: R) -> Result<AutomatonRecord, SerializationError> {
        let record: AutomatonRecord = serde_json::from_reader(&mut reader)?;
        log::trace!("decoded JSON record with {} states", record.states.len());
        Ok(record)
    }
}
