//! Bincode serializer for compact binary format.

use std::io::{Read, Write};

use crate::automaton::AutomatonRecord;

use super::{AutomatonSerializer, SerializationError};

/// Bincode serializer for compact binary format.
///
/// This serializer uses bincode for fast, space-efficient serialization.
/// It's ideal for production use where storage space and load time matter.
pub struct BincodeSerializer;

impl AutomatonSerializer for BincodeSerializer {
    fn write_record<W: Write>(record: &AutomatonRecord, mut writer: W) -> Result<(), SerializationError> {
        bincode::serialize_into(&mut writer, record)?;
        Ok(())
    }

    fn read_record<R: Read>(mut reader: R) -> Result<AutomatonRecord, SerializationError> {
        let record: AutomatonRecord = bincode::deserialize_from(&mut reader)?;
        log::trace!("decoded bincode record with {} states", record.states.len());
        Ok(record)
    }
}
