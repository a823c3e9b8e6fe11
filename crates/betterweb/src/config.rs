use serde::{Deserialize, Serialize};

use betterweb_core::Feature;

/// How a site obtains its welcome header value.
///
/// Sites either carry a pre-rendered welcome value (handed down from
/// deployment tooling) or describe themselves by identity and feature set
/// and have the value encoded at construction. The variant is resolved at
/// the boundary; codecs only ever see concrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteConfig {
    /// Use a pre-encoded welcome header value as-is.
    FromWelcomeValue(String),
    /// Encode the welcome header from site identity and features.
    FromSiteFeatures {
        /// Site identity as UUID text.
        site_id: String,
        features: Vec<Feature>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let config = SiteConfig::FromSiteFeatures {
            site_id: "6418723c-9d55-4b95-b9ce-bc4dbdffc812".into(),
            features: vec![Feature::AdsOff],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SiteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_welcome_value_variant_serde() {
        let json = r#"{"from_welcome_value":"ZBhyPJ1VS5W5zrxNvf/IEg^1^17"}"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config, SiteConfig::FromWelcomeValue(_)));
    }
}
