use std::fs;
use std::io::Cursor;
use std::path::Path;

use bincode::ErrorKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::catalog::StarCatalog;

/// Compression level used when encoding serialized records.
///
/// We use a named constant to make the chosen level explicit because the
/// catalog bundles benefit from aggressive compression to reduce
/// distribution size.
const RECORD_COMPRESSION_LEVEL: i32 = 19;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] Box<ErrorKind>),
    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn serialize_record<T: Serialize>(record: &T) -> Result<Vec<u8>, DataError> {
    let encoded = bincode::serialize(record)?;
    let mut cursor = Cursor::new(encoded);
    zstd::stream::encode_all(&mut cursor, RECORD_COMPRESSION_LEVEL).map_err(DataError::Compression)
}

pub fn deserialize_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DataError> {
    let mut cursor = Cursor::new(bytes);
    let decoded = zstd::stream::decode_all(&mut cursor).map_err(DataError::Compression)?;
    Ok(bincode::deserialize(&decoded)?)
}

pub fn write_catalog_to_file<P: AsRef<Path>>(
    catalog: &StarCatalog,
    path: P,
) -> Result<(), DataError> {
    let bytes = serialize_record(catalog)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<StarCatalog, DataError> {
    let bytes = fs::read(path)?;
    let mut catalog: StarCatalog = deserialize_record(&bytes)?;
    catalog.rebuild_indices();
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StarEntry;

    #[test]
    fn catalog_round_trips_with_name_index() {
        let catalog = StarCatalog::new(vec![StarEntry {
            name: "Sirius A".into(),
            pos: [-1.6, 8.1, -2.5],
            distance_ly: 8.6,
            abs_magnitude: 1.45,
            side_data: Default::default(),
        }]);

        let bytes = serialize_record(&catalog).unwrap();
        let mut restored: StarCatalog = deserialize_record(&bytes).unwrap();
        restored.rebuild_indices();

        assert_eq!(restored.len(), 1);
        // The name index is rebuilt, not serialized.
        assert_eq!(restored.index_of_name("Sirius A"), Some(0));
    }
}
