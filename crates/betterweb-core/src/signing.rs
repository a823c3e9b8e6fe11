//! Ed25519 signing and verification for hello tokens.
//!
//! Keys are provisioned out of band as base64 text. Two material forms are
//! accepted: raw 32-byte keys, and the DER-wrapped forms WebCrypto-based
//! issuers export (SPKI for public keys, PKCS#8 v1 for private keys). The
//! network trust anchor is distributed as base64 SPKI.
//!
//! Import happens eagerly at construction; a signer or verifier is an
//! immutable value thereafter and safe to share across requests.

use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::encoding::{from_base64, to_base64};
use crate::error::{ProtocolError, ProtocolResult};

pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const PRIVATE_KEY_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 64;

// DER prefixes for the Ed25519 OID (RFC 8410).
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];
const PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];

fn strip_der_prefix<'a>(bytes: &'a [u8], prefix: &[u8], what: &str) -> ProtocolResult<&'a [u8]> {
    if bytes.len() == prefix.len() + 32 && bytes.starts_with(prefix) {
        Ok(&bytes[prefix.len()..])
    } else {
        Err(ProtocolError::KeyImport(format!(
            "unrecognized {what} material: expected 32 raw bytes or {}-byte DER",
            prefix.len() + 32
        )))
    }
}

// ---------------------------------------------------------------------------
// HeaderVerifier — trust anchor for inbound hello headers
// ---------------------------------------------------------------------------

/// An imported Ed25519 public key.
#[derive(Debug, Clone)]
pub struct HeaderVerifier {
    verifying_key: VerifyingKey,
}

impl HeaderVerifier {
    /// Import a public key from raw 32 bytes or SPKI DER.
    pub fn import(bytes: &[u8]) -> ProtocolResult<Self> {
        let raw: &[u8] = if bytes.len() == PUBLIC_KEY_LENGTH {
            bytes
        } else {
            strip_der_prefix(bytes, &SPKI_PREFIX, "public key")?
        };
        let arr: [u8; PUBLIC_KEY_LENGTH] = raw
            .try_into()
            .map_err(|_| ProtocolError::KeyImport("public key must be 32 bytes".into()))?;
        let verifying_key = VerifyingKey::from_bytes(&arr)
            .map_err(|e| ProtocolError::KeyImport(format!("invalid public key: {e}")))?;
        Ok(Self { verifying_key })
    }

    /// Import from base64 text (raw or SPKI).
    pub fn import_base64(text: &str) -> ProtocolResult<Self> {
        let bytes = from_base64(text)
            .map_err(|e| ProtocolError::KeyImport(format!("public key is not base64: {e}")))?;
        Self::import(&bytes)
    }

    /// Verify `signature` over `payload`. Returns false for signatures of
    /// the wrong length; never errors.
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        let sig: [u8; SIGNATURE_LENGTH] = match signature.try_into() {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        self.verifying_key
            .verify_strict(payload, &Signature::from_bytes(&sig))
            .is_ok()
    }

    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    /// Base64 SPKI form, the shape the key was provisioned in.
    pub fn export_spki_base64(&self) -> String {
        let mut der = Vec::with_capacity(SPKI_PREFIX.len() + PUBLIC_KEY_LENGTH);
        der.extend_from_slice(&SPKI_PREFIX);
        der.extend_from_slice(&self.verifying_key.to_bytes());
        to_base64(&der)
    }
}

// ---------------------------------------------------------------------------
// HeaderSigner — issuer-side private key
// ---------------------------------------------------------------------------

/// An imported Ed25519 private key, owned by the issuing process for its
/// lifetime. Key bytes are zeroized on drop.
pub struct HeaderSigner {
    signing_key: Zeroizing<[u8; PRIVATE_KEY_LENGTH]>,
    verifying_key: VerifyingKey,
}

impl HeaderSigner {
    /// Generate a fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        Self::from_raw(signing_key.to_bytes())
    }

    fn from_raw(bytes: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(&bytes);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key: Zeroizing::new(bytes),
            verifying_key,
        }
    }

    /// Import a private key from raw 32 bytes or PKCS#8 v1 DER.
    pub fn import(bytes: &[u8]) -> ProtocolResult<Self> {
        let raw: &[u8] = if bytes.len() == PRIVATE_KEY_LENGTH {
            bytes
        } else {
            strip_der_prefix(bytes, &PKCS8_PREFIX, "private key")?
        };
        let arr: [u8; PRIVATE_KEY_LENGTH] = raw
            .try_into()
            .map_err(|_| ProtocolError::KeyImport("private key must be 32 bytes".into()))?;
        Ok(Self::from_raw(arr))
    }

    /// Import from base64 text (raw or PKCS#8).
    pub fn import_base64(text: &str) -> ProtocolResult<Self> {
        let bytes = from_base64(text)
            .map_err(|e| ProtocolError::KeyImport(format!("private key is not base64: {e}")))?;
        Self::import(&bytes)
    }

    /// Sign `payload`. Ed25519 signatures are deterministic and 64 bytes.
    pub fn sign(&self, payload: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        let signing_key = SigningKey::from_bytes(&self.signing_key);
        signing_key.sign(payload).to_bytes()
    }

    /// The verifier for this signer's public half.
    pub fn verifier(&self) -> HeaderVerifier {
        HeaderVerifier {
            verifying_key: self.verifying_key,
        }
    }

    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    /// Base64 PKCS#8 v1 form, matching what the keygen tooling emits.
    pub fn export_pkcs8_base64(&self) -> String {
        let mut der = Vec::with_capacity(PKCS8_PREFIX.len() + PRIVATE_KEY_LENGTH);
        der.extend_from_slice(&PKCS8_PREFIX);
        der.extend_from_slice(self.signing_key.as_ref());
        to_base64(&der)
    }
}

impl std::fmt::Debug for HeaderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print private key material.
        f.debug_struct("HeaderSigner")
            .field("public_key", &to_base64(&self.verifying_key.to_bytes()))
            .finish()
    }
}
