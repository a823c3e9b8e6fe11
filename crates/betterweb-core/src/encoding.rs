//! Bytes<->text transcoding.
//!
//! Token segments (hello payload and signature) use standard base64 with
//! padding. The welcome header's site-id segment uses standard base64 with
//! padding stripped; its decoder tolerates trailing padding so both forms
//! are accepted.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;

use crate::error::{ProtocolError, ProtocolResult};

pub const UUID_BYTES: usize = 16;

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn from_base64(text: &str) -> ProtocolResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| ProtocolError::Encoding(format!("invalid base64: {e}")))
}

/// Encode without trailing padding (site-id segment form).
pub fn to_base64_no_pad(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Decode a segment that may or may not carry trailing padding.
pub fn from_base64_no_pad(text: &str) -> ProtocolResult<Vec<u8>> {
    STANDARD_NO_PAD
        .decode(text.trim_end_matches('='))
        .map_err(|e| ProtocolError::Encoding(format!("invalid base64: {e}")))
}

// ---------------------------------------------------------------------------
// Identity codec — 16-byte UUID <-> canonical text
// ---------------------------------------------------------------------------

/// Parse canonical UUID text into its 16 bytes. Case-insensitive input;
/// hyphenated 8-4-4-4-12 form.
pub fn uuid_to_bytes(text: &str) -> ProtocolResult<[u8; UUID_BYTES]> {
    let parsed = uuid::Uuid::parse_str(text)
        .map_err(|e| ProtocolError::Encoding(format!("invalid UUID '{text}': {e}")))?;
    Ok(*parsed.as_bytes())
}

/// Render 16 bytes as canonical lower-case hyphenated UUID text.
pub fn bytes_to_uuid(bytes: &[u8]) -> ProtocolResult<String> {
    let arr: [u8; UUID_BYTES] = bytes.try_into().map_err(|_| {
        ProtocolError::Encoding(format!(
            "invalid byte length for UUID: expected {UUID_BYTES}, got {}",
            bytes.len()
        ))
    })?;
    Ok(uuid::Uuid::from_bytes(arr).hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_ID: &str = "6418723C-9D55-4B95-B9CE-BC4DBDFFC812";

    #[test]
    fn test_base64_roundtrip() {
        let data = b"better-web header payload";
        assert_eq!(from_base64(&to_base64(data)).unwrap(), data);
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(from_base64("not base64 !!!").is_err());
        assert!(from_base64_no_pad("@@@").is_err());
    }

    #[test]
    fn test_no_pad_matches_known_vector() {
        let bytes = uuid_to_bytes(SITE_ID).unwrap();
        assert_eq!(to_base64_no_pad(&bytes), "ZBhyPJ1VS5W5zrxNvf/IEg");
    }

    #[test]
    fn test_no_pad_decode_tolerates_padding() {
        let unpadded = from_base64_no_pad("ZBhyPJ1VS5W5zrxNvf/IEg").unwrap();
        let padded = from_base64_no_pad("ZBhyPJ1VS5W5zrxNvf/IEg==").unwrap();
        assert_eq!(unpadded, padded);
        assert_eq!(unpadded.len(), UUID_BYTES);
    }

    #[test]
    fn test_uuid_roundtrip_normalizes_case() {
        let bytes = uuid_to_bytes(SITE_ID).unwrap();
        assert_eq!(
            bytes_to_uuid(&bytes).unwrap(),
            SITE_ID.to_ascii_lowercase()
        );
    }

    #[test]
    fn test_uuid_rejects_malformed_text() {
        assert!(uuid_to_bytes("").is_err());
        assert!(uuid_to_bytes("not-a-uuid").is_err());
        assert!(uuid_to_bytes("6418723C9D554B95B9CEBC4DBDFFC812XX").is_err());
    }

    #[test]
    fn test_bytes_to_uuid_requires_16_bytes() {
        assert!(bytes_to_uuid(&[0u8; 15]).is_err());
        assert!(bytes_to_uuid(&[0u8; 17]).is_err());
        assert!(bytes_to_uuid(&[]).is_err());
        assert!(bytes_to_uuid(&[0u8; 16]).is_ok());
    }
}
