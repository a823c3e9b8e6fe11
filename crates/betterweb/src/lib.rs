//! Site facade for the better-web header protocol.
//!
//! A [`Site`] wires a trust anchor public key (the network default, or a
//! site-specific key distributed out of band) together with the welcome and
//! hello header codecs, and exposes the small surface an HTTP integration
//! needs: the two header names, the precomputed welcome value, and a single
//! [`Site::parse_client_token`] that turns a raw inbound header into a
//! capability map.
//!
//! Keys are imported once at construction; the facade is immutable
//! thereafter and safe to share across concurrent request handlers.
//!
//! # Example
//!
//! ```rust
//! use betterweb::{Site, SiteConfig};
//! use betterweb_core::Feature;
//! use betterweb_headers::HeaderInput;
//!
//! let site = Site::new(SiteConfig::FromSiteFeatures {
//!     site_id: "6418723c-9d55-4b95-b9ce-bc4dbdffc812".into(),
//!     features: vec![Feature::AdsOff, Feature::SubscriptionAccessOn],
//! })
//! .unwrap();
//!
//! // Attach to every response:
//! let (_name, _value) = (site.welcome_header_name(), site.welcome_header_value());
//!
//! // For each request, a missing or bad header is simply all-false:
//! let caps = site.parse_client_token(HeaderInput::Missing);
//! assert!(!caps.any_enabled());
//! ```

pub mod config;
pub mod error;

pub use config::SiteConfig;
pub use error::{SiteError, SiteResult};

// Re-export the codec surface so embedders need only this crate.
pub use betterweb_core::{Feature, FeatureMask, HeaderSigner, HeaderVerifier, Timestamp};
pub use betterweb_headers::{
    CapabilityMap, HeaderInput, HelloToken, WelcomeHeader, HELLO_HEADER_NAME, WELCOME_HEADER_NAME,
};

use betterweb_core::ProtocolVersion;
use betterweb_headers::{
    decode_hello_header, decode_welcome_header, derive_capabilities, encode_hello_header,
    encode_welcome_header,
};

/// The official network public key (base64 SPKI), used to verify hello
/// header values were issued by the network and not tampered with.
pub const NETWORK_PUBLIC_KEY: &str = "MCowBQYDK2VwAyEAignXRaTQtxEDl4ThULucKNQKEEO2Lo5bEO8qKwjSDVs=";

/// A configured site: trust anchor, precomputed welcome value, and
/// (optionally) an issuing key for minting hello tokens.
#[derive(Debug)]
pub struct Site {
    welcome_value: String,
    site_id: Option<String>,
    trusted: HeaderVerifier,
    signer: Option<HeaderSigner>,
}

impl Site {
    /// Construct a site trusting the network public key.
    pub fn new(config: SiteConfig) -> SiteResult<Self> {
        Self::with_keys(config, NETWORK_PUBLIC_KEY, None)
    }

    /// Construct a site with an explicit trust anchor and, if this process
    /// also issues hello tokens, a private key. Keys are base64 text, raw
    /// or DER-wrapped (SPKI / PKCS#8).
    ///
    /// Fails loudly on bad configuration — a process should not start with
    /// key material or a site identity it cannot use.
    pub fn with_keys(
        config: SiteConfig,
        trusted_public_key: &str,
        private_key: Option<&str>,
    ) -> SiteResult<Self> {
        let trusted = HeaderVerifier::import_base64(trusted_public_key)?;
        let signer = private_key.map(HeaderSigner::import_base64).transpose()?;

        let (welcome_value, site_id) = match config {
            SiteConfig::FromWelcomeValue(value) => {
                if value.is_empty() {
                    return Err(SiteError::Config(
                        "a non-empty welcome header value must be provided".into(),
                    ));
                }
                // Site identity for the identity tie-break, when the value
                // yields one. An opaque value still gets attached verbatim.
                let site_id = decode_welcome_header(&value).map(|w| w.site_id);
                (value, site_id)
            }
            SiteConfig::FromSiteFeatures { site_id, features } => {
                let value = encode_welcome_header(&site_id, &features)?;
                (value, Some(site_id.to_ascii_lowercase()))
            }
        };

        Ok(Self {
            welcome_value,
            site_id,
            trusted,
            signer,
        })
    }

    pub fn welcome_header_name(&self) -> &'static str {
        WELCOME_HEADER_NAME
    }

    pub fn hello_header_name(&self) -> &'static str {
        HELLO_HEADER_NAME
    }

    /// The welcome value to attach to every outgoing response. Computed
    /// once at construction.
    pub fn welcome_header_value(&self) -> &str {
        &self.welcome_value
    }

    /// This site's identity, when known.
    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    /// Decode + derive in one step: turn a raw inbound hello header into
    /// the capability map request handling consumes. Identity-bound tokens
    /// are checked against this site's id. Never errors — missing or
    /// unparseable input is identical to a fully-denied map.
    pub fn parse_client_token(&self, input: HeaderInput<'_>) -> CapabilityMap {
        let decoded = input
            .first()
            .and_then(|value| decode_hello_header(value, &self.trusted));
        derive_capabilities(decoded.as_ref(), Timestamp::now(), self.site_id())
    }

    /// Mint a hello token with this site's private key.
    ///
    /// Fails with [`betterweb_core::ProtocolError::MissingKey`] when the
    /// site was constructed without one.
    pub fn issue_client_token(
        &self,
        expires_at: Timestamp,
        features: &[Feature],
        client_id: Option<&str>,
    ) -> SiteResult<String> {
        let signer = self
            .signer
            .as_ref()
            .ok_or(betterweb_core::ProtocolError::MissingKey)?;
        Ok(encode_hello_header(
            ProtocolVersion::CURRENT,
            expires_at,
            features,
            client_id,
            signer,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_ID: &str = "6418723C-9D55-4B95-B9CE-BC4DBDFFC812";

    fn site_with_own_keys() -> (Site, HeaderSigner) {
        let signer = HeaderSigner::generate();
        let site = Site::with_keys(
            SiteConfig::FromSiteFeatures {
                site_id: SITE_ID.into(),
                features: vec![Feature::AdsOff, Feature::SubscriptionAccessOn],
            },
            &signer.verifier().export_spki_base64(),
            Some(&signer.export_pkcs8_base64()),
        )
        .unwrap();
        (site, signer)
    }

    fn future() -> Timestamp {
        Timestamp::from_seconds(Timestamp::now().seconds_since_epoch + 3600)
    }

    #[test]
    fn test_header_names() {
        let (site, _) = site_with_own_keys();
        assert_eq!(site.welcome_header_name(), "X-Better-Web-Welcome");
        assert_eq!(site.hello_header_name(), "X-Better-Web-Hello");
    }

    #[test]
    fn test_welcome_value_precomputed() {
        let (site, _) = site_with_own_keys();
        assert_eq!(site.welcome_header_value(), "ZBhyPJ1VS5W5zrxNvf/IEg^1^17");
        assert_eq!(site.site_id(), Some(SITE_ID.to_ascii_lowercase().as_str()));
    }

    #[test]
    fn test_from_welcome_value_passthrough() {
        let site = Site::new(SiteConfig::FromWelcomeValue(
            "ZBhyPJ1VS5W5zrxNvf/IEg^1^17".into(),
        ))
        .unwrap();
        assert_eq!(site.welcome_header_value(), "ZBhyPJ1VS5W5zrxNvf/IEg^1^17");
        assert_eq!(site.site_id(), Some(SITE_ID.to_ascii_lowercase().as_str()));
    }

    #[test]
    fn test_from_opaque_welcome_value_keeps_value_without_identity() {
        let site = Site::new(SiteConfig::FromWelcomeValue("opaque".into())).unwrap();
        assert_eq!(site.welcome_header_value(), "opaque");
        assert_eq!(site.site_id(), None);
    }

    #[test]
    fn test_empty_welcome_value_fails_loudly() {
        let err = Site::new(SiteConfig::FromWelcomeValue(String::new())).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn test_empty_features_fail_loudly() {
        let err = Site::new(SiteConfig::FromSiteFeatures {
            site_id: SITE_ID.into(),
            features: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, SiteError::Protocol(_)));
    }

    #[test]
    fn test_bad_trust_anchor_fails_loudly() {
        let err = Site::with_keys(
            SiteConfig::FromSiteFeatures {
                site_id: SITE_ID.into(),
                features: vec![Feature::AdsOff],
            },
            "not a key",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SiteError::Protocol(_)));
    }

    #[test]
    fn test_network_public_key_imports() {
        assert!(HeaderVerifier::import_base64(NETWORK_PUBLIC_KEY).is_ok());
    }

    #[test]
    fn test_issue_and_parse_roundtrip() {
        let (site, _) = site_with_own_keys();
        let token = site
            .issue_client_token(future(), &[Feature::AdsOff], None)
            .unwrap();

        let caps = site.parse_client_token(HeaderInput::Single(&token));
        assert!(caps.is_enabled(Feature::AdsOff));
        assert!(!caps.is_enabled(Feature::ContentPaywallOff));
    }

    #[test]
    fn test_parse_checks_site_identity() {
        let (site, _) = site_with_own_keys();

        let bound_to_us = site
            .issue_client_token(future(), &[Feature::AdsOff], Some(SITE_ID))
            .unwrap();
        assert!(site
            .parse_client_token(HeaderInput::Single(&bound_to_us))
            .is_enabled(Feature::AdsOff));

        let other = "11111111-2222-4333-8444-555555555555";
        let bound_elsewhere = site
            .issue_client_token(future(), &[Feature::AdsOff], Some(other))
            .unwrap();
        assert!(!site
            .parse_client_token(HeaderInput::Single(&bound_elsewhere))
            .any_enabled());
    }

    #[test]
    fn test_parse_missing_or_garbage_is_denied() {
        let (site, _) = site_with_own_keys();
        assert!(!site.parse_client_token(HeaderInput::Missing).any_enabled());
        assert!(!site
            .parse_client_token(HeaderInput::Single("garbage"))
            .any_enabled());
    }

    #[test]
    fn test_issue_without_private_key_is_missing_key() {
        let site = Site::new(SiteConfig::FromSiteFeatures {
            site_id: SITE_ID.into(),
            features: vec![Feature::AdsOff],
        })
        .unwrap();
        let err = site
            .issue_client_token(future(), &[Feature::AdsOff], None)
            .unwrap_err();
        assert!(matches!(
            err,
            SiteError::Protocol(betterweb_core::ProtocolError::MissingKey)
        ));
    }

    #[test]
    fn test_foreign_signature_denied_by_default_anchor() {
        // A token signed by some other key must not pass a site trusting
        // the network anchor.
        let rogue = HeaderSigner::generate();
        let value = betterweb_headers::encode_hello_header(
            betterweb_core::ProtocolVersion::V1,
            future(),
            &[Feature::AdsOff],
            None,
            &rogue,
        )
        .unwrap();

        let site = Site::new(SiteConfig::FromSiteFeatures {
            site_id: SITE_ID.into(),
            features: vec![Feature::AdsOff],
        })
        .unwrap();
        assert!(!site
            .parse_client_token(HeaderInput::Single(&value))
            .any_enabled());
    }
}
