//! Record store (§6): `save(id, record)`, `get(id)`, `latest()`. The core
//! assumes at-most-one record per id and newest-first iteration by creation
//! timestamp; it never catches I/O errors from a real store (§7 "External
//! collaborator failure"). This module defines the trait plus one in-memory
//! reference implementation for tests and the CLI.

use std::collections::HashMap;

use crate::file_header::{self, FileHeader};
use crate::record::SaveRecord;
use crate::save_error::SaveError;

/// A keyed blob store for save records. A real implementation (disk,
/// network) wires this trait to its own I/O and surfaces failures verbatim
/// rather than catching them inside the core (§7).
pub trait RecordStore {
    fn save(&mut self, id: &str, record: &SaveRecord) -> Result<(), SaveError>;
    fn get(&self, id: &str) -> Result<Option<SaveRecord>, SaveError>;
    /// The most recently created record across all ids, or `None` if the
    /// store is empty.
    fn latest(&self) -> Result<Option<SaveRecord>, SaveError>;
}

/// One header-wrapped, encoded save per id. Exercises the exact on-disk
/// byte layout (`file_header::wrap`/`unwrap`) a real file- or network-backed
/// store would use, without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn header_for(&self, id: &str) -> Result<FileHeader, SaveError> {
        let blob = self
            .blobs
            .get(id)
            .ok_or(SaveError::NoData)?;
        file_header::peek(blob).map_err(SaveError::Decode)
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&mut self, id: &str, record: &SaveRecord) -> Result<(), SaveError> {
        let payload = record.encode();
        let wrapped = file_header::wrap(record.version, record.created_at, &payload);
        self.blobs.insert(id.to_string(), wrapped);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<SaveRecord>, SaveError> {
        let Some(blob) = self.blobs.get(id) else {
            return Ok(None);
        };
        let (_header, payload) = file_header::unwrap(blob).map_err(SaveError::Decode)?;
        let record = SaveRecord::decode(payload)?;
        Ok(Some(record))
    }

    fn latest(&self) -> Result<Option<SaveRecord>, SaveError> {
        let mut newest_id: Option<&str> = None;
        let mut newest_created_at = 0u64;
        for id in self.blobs.keys() {
            let header = self.header_for(id)?;
            if newest_id.is_none() || header.created_at > newest_created_at {
                newest_id = Some(id);
                newest_created_at = header.created_at;
            }
        }
        match newest_id {
            Some(id) => self.get(id),
            None => Ok(None),
        }
    }
}
