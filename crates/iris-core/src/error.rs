//! Error and warning types.
//!
//! Hard errors only occur at data boundaries (raw frame bytes, preset JSON).
//! Configuration problems are advisory [`ConfigWarning`]s: the offending
//! value is clamped or substituted and frame processing continues.

use std::fmt;

use crate::color::Channel;
use crate::transform::params::ZoneId;

/// Why a re-simulation zone's source was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceProblem {
    /// The source index is not a zone id at all.
    OutOfRange,
    /// The zone names itself as its source.
    SelfReference,
    /// The source exists but the active split geometry has fewer zones.
    InactiveUnderGeometry,
    /// The source zone is not in correction mode.
    NotCorrection,
}

impl fmt::Display for SourceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutOfRange => "does not exist",
            Self::SelfReference => "is the zone itself",
            Self::InactiveUnderGeometry => "is not active under the current split",
            Self::NotCorrection => "is not in correction mode",
        })
    }
}

/// A configuration-invariant violation reported once per configuration change.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("zone {zone}: re-simulation source zone {source_zone} {problem}; using Original")]
    InvalidResimulationSource {
        zone: ZoneId,
        source_zone: ZoneId,
        problem: SourceProblem,
    },
    #[error("{field}: {value} is outside [{min}, {max}], clamped to {clamped}")]
    ValueClamped {
        field: String,
        value: f32,
        min: f32,
        max: f32,
        clamped: f32,
    },
    #[error("{channel} channel: malformed color {value:?} in {field}; channel disabled")]
    MalformedColor {
        channel: Channel,
        field: &'static str,
        value: String,
    },
    #[error("{field}: unknown value {value:?}, using {fallback}")]
    UnknownVariant {
        field: &'static str,
        value: String,
        fallback: &'static str,
    },
}

/// Errors constructing a [`Frame`](crate::image::Frame) from raw pixel data.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("frame dimensions {width}x{height} overflow the address space")]
    TooLarge { width: u32, height: u32 },
}

/// Errors reading or writing the persisted preset form.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),
}
