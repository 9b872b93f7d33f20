// ---------------------------------------------------------------------------
// SaveError: typed errors for the save/load codec
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors the save codec and record store can raise.
#[derive(Debug)]
pub enum SaveError {
    /// Bitcode encoding failed.
    Encode(String),
    /// Bitcode decoding failed (corrupt or invalid save data).
    Decode(String),
    /// Save record version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// No record was available for the requested id.
    NoData,
    /// `World::build` rejected the reconstructed configuration.
    InvalidWorld(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Encode(msg) => write!(f, "encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "decoding error: {msg}"),
            SaveError::VersionMismatch { expected_max, found } => write!(
                f,
                "version mismatch: record is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::NoData => write!(f, "no save data available for this id"),
            SaveError::InvalidWorld(msg) => write!(f, "reconstructed world is invalid: {msg}"),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<worldgen::WorldError> for SaveError {
    fn from(e: worldgen::WorldError) -> Self {
        SaveError::InvalidWorld(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_version_mismatch() {
        let err = SaveError::VersionMismatch {
            expected_max: 2,
            found: 9,
        };
        let msg = format!("{err}");
        assert!(msg.contains("v9"), "got: {msg}");
        assert!(msg.contains("v2"), "got: {msg}");
    }

    #[test]
    fn test_display_no_data() {
        assert!(format!("{}", SaveError::NoData).contains("no save data"));
    }

    #[test]
    fn test_is_error_trait() {
        let err = SaveError::NoData;
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_from_world_error() {
        let we = worldgen::WorldError::InvalidTimeSpeed(3);
        let se: SaveError = we.into();
        assert!(matches!(se, SaveError::InvalidWorld(_)));
    }
}
