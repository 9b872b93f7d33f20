// ---------------------------------------------------------------------------
// WorldError: configuration and query failures raised by the core pipeline
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors the core pipeline can raise. Algorithms never recover from bad
/// input silently: they either clamp to a documented invariant or return one
/// of these.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    /// Width or height is zero (or otherwise non-positive before the cast to
    /// `usize`).
    InvalidDimensions { width: usize, height: usize },
    /// `set_time_speed` was called with a value outside `{0, 1, 2, 4}`.
    InvalidTimeSpeed(u8),
    /// A classifier threshold fell outside its documented range, e.g.
    /// `cityShare` not in `[0, 1]` or `minCities > maxCities`.
    InvalidClassifierConfig(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::InvalidDimensions { width, height } => {
                write!(f, "invalid world dimensions: {width}x{height}")
            }
            WorldError::InvalidTimeSpeed(speed) => {
                write!(f, "invalid time speed {speed}: must be one of 0, 1, 2, 4")
            }
            WorldError::InvalidClassifierConfig(msg) => {
                write!(f, "invalid classifier configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for WorldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_display() {
        let err = WorldError::InvalidDimensions {
            width: 0,
            height: 10,
        };
        let msg = format!("{err}");
        assert!(msg.contains("0x10"), "got: {msg}");
    }

    #[test]
    fn test_invalid_time_speed_display() {
        let err = WorldError::InvalidTimeSpeed(3);
        let msg = format!("{err}");
        assert!(msg.contains('3'), "got: {msg}");
    }

    #[test]
    fn test_is_error_trait() {
        let err = WorldError::InvalidTimeSpeed(7);
        let _: &dyn std::error::Error = &err;
    }
}
