use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Timestamp — canonical time representation (whole seconds since epoch)
// ---------------------------------------------------------------------------

/// A point in time with second resolution.
///
/// The wire format carries expiry as a u32 of unix seconds, so sub-second
/// precision never survives a round-trip and is not modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds_since_epoch: u64,
}

impl Timestamp {
    pub fn now() -> Self {
        Self {
            seconds_since_epoch: chrono::Utc::now().timestamp().max(0) as u64,
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds_since_epoch: seconds,
        }
    }

    pub fn to_rfc3339(&self) -> String {
        chrono::DateTime::from_timestamp(self.seconds_since_epoch as i64, 0)
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "invalid".to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// ProtocolVersion — the sole discriminator for wire-layout changes
// ---------------------------------------------------------------------------

/// Recognized protocol versions.
///
/// The version byte is the only discriminator for incompatible layout
/// changes; decode rejects anything it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[non_exhaustive]
pub enum ProtocolVersion {
    V1 = 1,
}

impl ProtocolVersion {
    pub const CURRENT: ProtocolVersion = ProtocolVersion::V1;

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(ProtocolVersion::V1),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte())
    }
}
