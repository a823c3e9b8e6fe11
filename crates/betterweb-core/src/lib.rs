//! Protocol primitives for the better-web header protocol.
//!
//! This crate holds the leaves the header codecs are built from:
//!
//! - [`flags`] — the feature-flag registry and bit-mask arithmetic.
//! - [`framing`] — fixed-layout byte packing for the hello payload.
//! - [`encoding`] — base64 transcoding and the 16-byte UUID identity codec.
//! - [`signing`] — Ed25519 key handling, signing and verification.
//! - [`types`] — `Timestamp` and `ProtocolVersion`.
//!
//! Everything here is a synchronous pure function over its inputs; key
//! material is imported eagerly when a signer or verifier is constructed
//! and held for its lifetime.

pub mod encoding;
pub mod error;
pub mod flags;
pub mod framing;
pub mod signing;
pub mod types;

pub use encoding::*;
pub use error::*;
pub use flags::*;
pub use framing::*;
pub use signing::*;
pub use types::*;
