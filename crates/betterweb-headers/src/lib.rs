//! Header codecs for the better-web protocol.
//!
//! Two headers carry the protocol:
//!
//! - The **welcome header** ([`welcome`]) is issued by a server, unsigned,
//!   and advertises site identity plus supported features.
//! - The **hello header** ([`hello`]) is issued by a client, Ed25519-signed,
//!   and asserts an expiry and a feature mask, optionally bound to a site
//!   identity.
//!
//! Decoding never errors: a malformed, forged, or stale header degrades to
//! an absent result (and, one level up, to an all-false [`CapabilityMap`]),
//! with the reason logged at warn level. Construction mistakes on the
//! encode side fail loudly with [`betterweb_core::ProtocolError`].

pub mod capability;
pub mod hello;
pub mod welcome;

pub use capability::CapabilityMap;
pub use hello::{
    decode_hello_header, derive_capabilities, encode_hello_header, parse_client_token,
    HeaderInput, HelloToken, HELLO_HEADER_NAME,
};
pub use welcome::{decode_welcome_header, encode_welcome_header, WelcomeHeader, WELCOME_HEADER_NAME};
