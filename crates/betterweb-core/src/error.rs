use thiserror::Error;

/// Construction-time failures of the header protocol.
///
/// These are raised to the caller: they indicate a programming or
/// configuration mistake the process should not start with. Decode-time
/// failures are deliberately *not* represented here — a malformed or forged
/// header degrades to an absent result, never to an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// An unpack was attempted past buffer bounds, or a value does not fit
    /// its declared field width.
    #[error("framing error: {0}")]
    Framing(String),

    /// Malformed base64 or UUID text, or a byte array of the wrong length.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Malformed Ed25519 key material.
    #[error("key import error: {0}")]
    KeyImport(String),

    /// An encode was requested but no private key is configured.
    #[error("a private key is required for encoding")]
    MissingKey,

    /// Bad codec configuration: empty site id, empty feature list, etc.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
