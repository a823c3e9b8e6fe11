//! Client-issued hello header: signed, versioned, expiring, optionally
//! bound to a site identity.
//!
//! Wire form is `base64(payload).base64(signature)`. The V1 payload layout
//! is, in order (numeric fields little-endian):
//!
//! ```text
//! version(1B) · nonce(4B) · expiresAt(4B) · featureMask(4B) [· clientId(16B)]
//! ```
//!
//! Decode is a one-way ratchet: the signature must verify against the trust
//! anchor before any field is read out — no field of an unverified payload
//! is ever exposed, even partially. Decode answers "is this well-formed and
//! authentically signed"; expiry and identity are applied afterwards by
//! [`derive_capabilities`], which is total and degrades to the all-false
//! map.

use rand::RngCore;
use tracing::{debug, warn};

use betterweb_core::{
    bytes_to_uuid, concat, from_base64, pack_u32_le, pack_u8, set_features, to_base64,
    unpack_u32_le, uuid_to_bytes, Feature, FeatureMask, HeaderSigner, HeaderVerifier,
    ProtocolError, ProtocolResult, ProtocolVersion, Timestamp, UUID_BYTES,
};

use crate::capability::CapabilityMap;

pub const HELLO_HEADER_NAME: &str = "X-Better-Web-Hello";

const SEPARATOR: char = '.';
const VERSION_BYTES: usize = 1;
const NONCE_BYTES: usize = 4;
const TIMESTAMP_BYTES: usize = 4;
const MASK_BYTES: usize = 4;

const EXPIRY_OFFSET: usize = VERSION_BYTES + NONCE_BYTES;
const MASK_OFFSET: usize = EXPIRY_OFFSET + TIMESTAMP_BYTES;
const CLIENT_ID_OFFSET: usize = MASK_OFFSET + MASK_BYTES;

/// V1 payload length without identity binding.
const V1_PAYLOAD_LEN: usize = CLIENT_ID_OFFSET;
/// V1 payload length with the 16-byte client id appended.
const V1_BOUND_PAYLOAD_LEN: usize = CLIENT_ID_OFFSET + UUID_BYTES;

// ---------------------------------------------------------------------------
// HelloToken — the decoded, authenticated header
// ---------------------------------------------------------------------------

/// A well-formed, authentically signed hello header.
///
/// Holding one of these says nothing about whether it currently grants
/// anything: expiry and identity binding are applied by
/// [`derive_capabilities`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloToken {
    pub version: ProtocolVersion,
    /// Expiry, truncated to whole seconds.
    pub expires_at: Timestamp,
    /// Raw feature bitmask as signed by the issuer.
    pub features: FeatureMask,
    /// Site identity the token is bound to, canonical lower-case UUID text.
    pub client_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Header input — raw value(s) as an HTTP layer hands them over
// ---------------------------------------------------------------------------

/// Raw hello header input. HTTP layers variously supply a missing header,
/// a single value, or a repeated-header list; only the first value of a
/// list is considered.
#[derive(Debug, Clone, Copy)]
pub enum HeaderInput<'a> {
    Missing,
    Single(&'a str),
    Many(&'a [String]),
}

impl<'a> HeaderInput<'a> {
    pub fn first(&self) -> Option<&'a str> {
        match self {
            HeaderInput::Missing => None,
            HeaderInput::Single(value) => Some(value),
            HeaderInput::Many(values) => values.first().map(|s| s.as_str()),
        }
    }
}

impl<'a> From<Option<&'a str>> for HeaderInput<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value {
            Some(v) => HeaderInput::Single(v),
            None => HeaderInput::Missing,
        }
    }
}

impl<'a> From<&'a [String]> for HeaderInput<'a> {
    fn from(values: &'a [String]) -> Self {
        HeaderInput::Many(values)
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Build and sign a hello header value.
///
/// The 4-byte nonce is fresh OS randomness on every call; it exists only so
/// repeated encodes of the same fields do not produce identical
/// payload/signature pairs, and plays no part in replay detection.
///
/// Fails loudly on configuration mistakes: an expiry that does not fit in
/// 32 bits of unix seconds, or a malformed client id.
pub fn encode_hello_header(
    version: ProtocolVersion,
    expires_at: Timestamp,
    features: &[Feature],
    client_id: Option<&str>,
    signer: &HeaderSigner,
) -> ProtocolResult<String> {
    let expiry_secs: u32 = expires_at
        .seconds_since_epoch
        .try_into()
        .map_err(|_| {
            ProtocolError::InvalidConfig(format!(
                "expiry {} does not fit in 32 bits of unix seconds",
                expires_at.seconds_since_epoch
            ))
        })?;

    let client_id_bytes = client_id
        .map(|id| {
            uuid_to_bytes(id).map_err(|e| ProtocolError::InvalidConfig(format!("client id: {e}")))
        })
        .transpose()?;

    let mut nonce = [0u8; NONCE_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let mask: FeatureMask = set_features(0, features);
    let mut parts: Vec<&[u8]> = Vec::with_capacity(5);
    let version_bytes = pack_u8(version.as_byte());
    let expiry_bytes = pack_u32_le(expiry_secs);
    let mask_bytes = pack_u32_le(mask);
    parts.push(&version_bytes);
    parts.push(&nonce);
    parts.push(&expiry_bytes);
    parts.push(&mask_bytes);
    if let Some(id_bytes) = client_id_bytes.as_ref() {
        parts.push(id_bytes);
    }

    let payload = concat(&parts);
    let signature = signer.sign(&payload);

    Ok(format!(
        "{}{SEPARATOR}{}",
        to_base64(&payload),
        to_base64(&signature)
    ))
}

// ---------------------------------------------------------------------------
// Decode — raw string to authenticated token
// ---------------------------------------------------------------------------

/// Decode and authenticate a hello header value.
///
/// Returns `None` for anything that is not a well-formed, correctly signed
/// V1 token: wrong segment count, bad base64, signature mismatch, unknown
/// version byte, or a payload length matching neither recognized layout.
/// Every rejection is logged at warn level with its reason; none raises.
pub fn decode_hello_header(header_value: &str, trusted: &HeaderVerifier) -> Option<HelloToken> {
    if header_value.is_empty() {
        return None;
    }

    let segments: Vec<&str> = header_value.split(SEPARATOR).collect();
    if segments.len() != 2 {
        warn!(
            reason = "invalid header value format",
            segments = segments.len(),
            "could not decode hello header"
        );
        return None;
    }

    let (payload, signature) = match (from_base64(segments[0]), from_base64(segments[1])) {
        (Ok(p), Ok(s)) => (p, s),
        _ => {
            warn!(reason = "invalid base64 segment", "could not decode hello header");
            return None;
        }
    };

    // Signature first: no field of an unverified payload is ever exposed.
    if !trusted.verify(&payload, &signature) {
        warn!(
            reason = "forged header value is provided",
            "could not decode hello header"
        );
        return None;
    }

    let version = match payload.first().copied().and_then(ProtocolVersion::from_byte) {
        Some(v) => v,
        None => {
            warn!(
                reason = "invalid or unsupported protocol version",
                "could not decode hello header"
            );
            return None;
        }
    };

    let client_id = match payload.len() {
        V1_PAYLOAD_LEN => None,
        V1_BOUND_PAYLOAD_LEN => {
            // Authenticated payload, length checked: conversion cannot fail.
            bytes_to_uuid(&payload[CLIENT_ID_OFFSET..]).ok()
        }
        other => {
            warn!(
                reason = "invalid payload length",
                length = other,
                "could not decode hello header"
            );
            return None;
        }
    };

    let expires_at = unpack_u32_le(&payload, EXPIRY_OFFSET).ok()?;
    let features = unpack_u32_le(&payload, MASK_OFFSET).ok()?;

    debug!(version = %version, expires_at, "decoded hello header");

    Some(HelloToken {
        version,
        expires_at: Timestamp::from_seconds(expires_at as u64),
        features,
        client_id,
    })
}

// ---------------------------------------------------------------------------
// Capability derivation — expiry and identity tie-breaks
// ---------------------------------------------------------------------------

/// Turn a decode result into the capability map downstream logic consumes.
///
/// Total function: always a fully-populated map, never an error.
/// All-or-nothing per evaluation — expiry (`expires_at <= now`) and an
/// identity-bound token presented to the wrong party both deny the full
/// mask, never part of it.
pub fn derive_capabilities(
    decoded: Option<&HelloToken>,
    now: Timestamp,
    expected_client_id: Option<&str>,
) -> CapabilityMap {
    let token = match decoded {
        Some(token) => token,
        None => return CapabilityMap::denied(),
    };

    if token.expires_at <= now {
        debug!(expires_at = %token.expires_at, "hello token expired");
        return CapabilityMap::denied();
    }

    if let (Some(bound), Some(expected)) = (token.client_id.as_deref(), expected_client_id) {
        if !bound.eq_ignore_ascii_case(expected) {
            debug!(reason = "client id mismatch", "hello token denied");
            return CapabilityMap::denied();
        }
    }

    CapabilityMap::from_mask(token.features)
}

/// Convenience for request handling: decode, then derive against the
/// current time. Missing/unparseable input is identical to a fully-denied
/// map — this never errors the request.
pub fn parse_client_token(
    input: HeaderInput<'_>,
    expected_client_id: Option<&str>,
    trusted: &HeaderVerifier,
) -> CapabilityMap {
    let decoded = input
        .first()
        .and_then(|value| decode_hello_header(value, trusted));
    derive_capabilities(decoded.as_ref(), Timestamp::now(), expected_client_id)
}
