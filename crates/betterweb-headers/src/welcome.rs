//! Server-issued welcome header: unsigned, self-describing site identity
//! plus feature bitmask.
//!
//! Wire form is three `^`-separated segments:
//! `base64(siteIdBytes, no padding) ^ decimal(version) ^ decimal(mask)`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use betterweb_core::{
    bytes_to_uuid, features_in_mask, from_base64_no_pad, set_features, to_base64_no_pad,
    uuid_to_bytes, Feature, FeatureMask, ProtocolError, ProtocolResult, ProtocolVersion,
    UUID_BYTES,
};

pub const WELCOME_HEADER_NAME: &str = "X-Better-Web-Welcome";

const SEPARATOR: char = '^';
const SEGMENT_COUNT: usize = 3;

/// Decoded welcome header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeHeader {
    pub version: ProtocolVersion,
    /// Canonical lower-case hyphenated UUID text.
    pub site_id: String,
    /// Registered features advertised by the site, in registry order.
    pub features: Vec<Feature>,
}

/// Build a welcome header value for a site.
///
/// Fails loudly on bad configuration: an empty or malformed site id, or an
/// empty feature list. This is a process-startup mistake, not a request-time
/// condition.
pub fn encode_welcome_header(site_id: &str, features: &[Feature]) -> ProtocolResult<String> {
    if site_id.is_empty() {
        return Err(ProtocolError::InvalidConfig(
            "site id must be a non-empty UUID".into(),
        ));
    }
    if features.is_empty() {
        return Err(ProtocolError::InvalidConfig(
            "at least one site feature must be provided".into(),
        ));
    }

    let site_id_bytes = uuid_to_bytes(site_id)
        .map_err(|e| ProtocolError::InvalidConfig(format!("site id: {e}")))?;
    let mask: FeatureMask = set_features(0, features);

    Ok(format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}",
        to_base64_no_pad(&site_id_bytes),
        ProtocolVersion::CURRENT.as_byte(),
        mask
    ))
}

/// Decode a welcome header value.
///
/// Never errors: any validation failure yields `None` with a warn-level log
/// carrying the reason. A missing or untrusted header is an expected
/// outcome, not an exceptional one.
pub fn decode_welcome_header(header_value: &str) -> Option<WelcomeHeader> {
    if header_value.is_empty() {
        return None;
    }

    let segments: Vec<&str> = header_value.split(SEPARATOR).collect();
    if segments.len() != SEGMENT_COUNT {
        warn!(
            reason = "invalid header value format",
            segments = segments.len(),
            "could not decode welcome header"
        );
        return None;
    }

    let version = match segments[1].parse::<u8>().ok().and_then(ProtocolVersion::from_byte) {
        Some(v) => v,
        None => {
            warn!(
                reason = "invalid or unsupported protocol version",
                segment = segments[1],
                "could not decode welcome header"
            );
            return None;
        }
    };

    // The mask segment must be a canonical decimal: digits only, no sign,
    // no fraction, no leading zeros beyond the number itself.
    let mask = match canonical_mask(segments[2]) {
        Some(m) => m,
        None => {
            warn!(
                reason = "invalid flags number",
                segment = segments[2],
                "could not decode welcome header"
            );
            return None;
        }
    };

    let site_id = match from_base64_no_pad(segments[0])
        .ok()
        .filter(|bytes| bytes.len() == UUID_BYTES)
        .and_then(|bytes| bytes_to_uuid(&bytes).ok())
    {
        Some(id) => id,
        None => {
            warn!(
                reason = "invalid site id value",
                "could not decode welcome header"
            );
            return None;
        }
    };

    Some(WelcomeHeader {
        version,
        site_id,
        features: features_in_mask(mask),
    })
}

fn canonical_mask(segment: &str) -> Option<FeatureMask> {
    let parsed = segment.parse::<FeatureMask>().ok()?;
    (parsed.to_string() == segment).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_ID: &str = "6418723C-9D55-4B95-B9CE-BC4DBDFFC812";

    #[test]
    fn test_encode_matches_known_vector() {
        let value =
            encode_welcome_header(SITE_ID, &[Feature::AdsOff, Feature::SubscriptionAccessOn])
                .unwrap();
        assert_eq!(value, "ZBhyPJ1VS5W5zrxNvf/IEg^1^17");
    }

    #[test]
    fn test_decode_known_vector() {
        let header = decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^1^17").unwrap();
        assert_eq!(header.version, ProtocolVersion::V1);
        assert_eq!(header.site_id, SITE_ID.to_ascii_lowercase());
        assert_eq!(
            header.features,
            vec![Feature::AdsOff, Feature::SubscriptionAccessOn]
        );
    }

    #[test]
    fn test_roundtrip_recovers_site_id_and_features() {
        let features = [Feature::CookieConsentOff, Feature::ContentPaywallOff];
        let value = encode_welcome_header(SITE_ID, &features).unwrap();
        let header = decode_welcome_header(&value).unwrap();
        assert_eq!(header.site_id, SITE_ID.to_ascii_lowercase());
        assert_eq!(header.features, features.to_vec());
    }

    #[test]
    fn test_encode_rejects_empty_site_id() {
        let err = encode_welcome_header("", &[Feature::AdsOff]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfig(_)));
    }

    #[test]
    fn test_encode_rejects_malformed_site_id() {
        let err = encode_welcome_header("not-a-uuid", &[Feature::AdsOff]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfig(_)));
    }

    #[test]
    fn test_encode_rejects_empty_features() {
        let err = encode_welcome_header(SITE_ID, &[]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfig(_)));
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert!(decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^1").is_none());
        assert!(decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^1^17^extra").is_none());
        assert!(decode_welcome_header("no separators at all").is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        assert!(decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^2^17").is_none());
        assert!(decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^0^17").is_none());
        assert!(decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^one^17").is_none());
    }

    #[test]
    fn test_decode_rejects_non_canonical_mask() {
        // Signs, fractions, leading zeros, non-numeric, out of u32 range.
        for mask in ["+17", "-1", "17.0", "017", "1e2", "", "4294967296"] {
            let value = format!("ZBhyPJ1VS5W5zrxNvf/IEg^1^{mask}");
            assert!(decode_welcome_header(&value).is_none(), "mask {mask:?}");
        }
    }

    #[test]
    fn test_decode_rejects_bad_site_id_segment() {
        // Wrong byte length and non-base64 text.
        assert!(decode_welcome_header("AAAA^1^17").is_none());
        assert!(decode_welcome_header("@@@@^1^17").is_none());
    }

    #[test]
    fn test_decode_empty_is_absent() {
        assert!(decode_welcome_header("").is_none());
    }

    #[test]
    fn test_decode_accepts_padded_site_id_segment() {
        let header = decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg==^1^17").unwrap();
        assert_eq!(header.site_id, SITE_ID.to_ascii_lowercase());
    }

    #[test]
    fn test_unregistered_mask_bits_ignored() {
        // Bit 0 plus bits above the registry: only ADS_OFF survives.
        let header = decode_welcome_header("ZBhyPJ1VS5W5zrxNvf/IEg^1^4294967265").unwrap();
        assert_eq!(header.features, vec![Feature::AdsOff]);
    }
}
