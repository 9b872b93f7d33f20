//! Save file header: magic bytes, version, timestamp, and an xxHash32
//! checksum of the payload, so the record store can list saves (§6
//! "newest-first iteration... on a numeric creation timestamp") without
//! decoding the full `SaveRecord` body.
//!
//! Layout (24 bytes, fixed-size, little-endian), grounded on the teacher's
//! own save-file header:
//!   [0..4]   Magic bytes: "WGEN"
//!   [4..8]   Save record version (u32)
//!   [8..16]  Creation timestamp, ms since epoch (u64)
//!   [16..20] Payload length in bytes (u32)
//!   [20..24] xxHash32 checksum of the payload (everything after the header)

use xxhash_rust::xxh32::xxh32;

pub const MAGIC: [u8; 4] = *b"WGEN";
pub const HEADER_SIZE: usize = 24;
const XXHASH_SEED: u32 = 0;

/// Parsed file header, readable without decoding the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    pub created_at: u64,
    pub payload_len: u32,
    pub checksum: u32,
}

/// Wrap an already-encoded `SaveRecord` payload with a header.
pub fn wrap(version: u32, created_at: u64, payload: &[u8]) -> Vec<u8> {
    let checksum = xxh32(payload, XXHASH_SEED);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&created_at.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parse and checksum-verify the header, returning it alongside the payload
/// slice. Errors name what is wrong: too short, bad magic, or a checksum
/// mismatch (data corruption).
pub fn unwrap(bytes: &[u8]) -> Result<(FileHeader, &[u8]), String> {
    if bytes.len() < HEADER_SIZE {
        return Err(format!(
            "save file is {} bytes, need at least {HEADER_SIZE} for the header",
            bytes.len()
        ));
    }
    if bytes[..4] != MAGIC {
        return Err("save file is missing the WGEN magic bytes".to_string());
    }

    let version = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let created_at = u64::from_le_bytes(bytes[8..16].try_into().unwrap());
    let payload_len = u32::from_le_bytes(bytes[16..20].try_into().unwrap());
    let checksum = u32::from_le_bytes(bytes[20..24].try_into().unwrap());

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_len as usize {
        return Err(format!(
            "save file declares payload length {payload_len} but has {} bytes remaining",
            payload.len()
        ));
    }

    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(format!(
            "save file is corrupted: checksum mismatch (expected {checksum:#010x}, got {computed:#010x})"
        ));
    }

    Ok((
        FileHeader {
            version,
            created_at,
            payload_len,
            checksum,
        },
        payload,
    ))
}

/// Read just the header — version and creation timestamp — without
/// verifying the checksum or touching the payload. Used by a record store's
/// `latest()`/listing path to sort saves cheaply.
pub fn peek(bytes: &[u8]) -> Result<FileHeader, String> {
    if bytes.len() < HEADER_SIZE {
        return Err(format!(
            "save file is {} bytes, need at least {HEADER_SIZE} for the header",
            bytes.len()
        ));
    }
    if bytes[..4] != MAGIC {
        return Err("save file is missing the WGEN magic bytes".to_string());
    }
    Ok(FileHeader {
        version: u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
        created_at: u64::from_le_bytes(bytes[8..16].try_into().unwrap()),
        payload_len: u32::from_le_bytes(bytes[16..20].try_into().unwrap()),
        checksum: u32::from_le_bytes(bytes[20..24].try_into().unwrap()),
    })
}
