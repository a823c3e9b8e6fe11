use serde::{Deserialize, Serialize};
use std::fmt;

/// Bitwise union of active feature flags, one bit per flag.
///
/// Bits beyond the registered flag range may be present on the wire but are
/// ignored on read and never trusted.
pub type FeatureMask = u32;

// ---------------------------------------------------------------------------
// Feature — the canonical capability registry
// ---------------------------------------------------------------------------

/// A named boolean capability, internally a power-of-two bit position within
/// a 32-bit mask.
///
/// Flags are stable across protocol versions; a retired bit position is
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    /// Render no advertisements anywhere on the page.
    AdsOff,
    /// Render no cookie-consent screens, with full opt-out for
    /// non-functional trackers.
    CookieConsentOff,
    /// Render no marketing dialogs or popups (newsletter, promotion, etc.).
    MarketingDialogOff,
    /// Automatic access to otherwise paywalled content.
    ContentPaywallOff,
    /// Automatic access to features behind at least a basic SaaS plan.
    SubscriptionAccessOn,
}

impl Feature {
    /// The flag's bit within a [`FeatureMask`].
    pub const fn bit(self) -> FeatureMask {
        match self {
            Feature::AdsOff => 1 << 0,
            Feature::CookieConsentOff => 1 << 1,
            Feature::MarketingDialogOff => 1 << 2,
            Feature::ContentPaywallOff => 1 << 3,
            Feature::SubscriptionAccessOn => 1 << 4,
        }
    }

    /// Canonical wire/display name.
    pub const fn name(self) -> &'static str {
        match self {
            Feature::AdsOff => "ADS_OFF",
            Feature::CookieConsentOff => "COOKIE_CONSENT_OFF",
            Feature::MarketingDialogOff => "MARKETING_DIALOG_OFF",
            Feature::ContentPaywallOff => "CONTENT_PAYWALL_OFF",
            Feature::SubscriptionAccessOn => "SUBSCRIPTION_ACCESS_ON",
        }
    }

    /// The full registry, ordered by bit position. Stable across calls.
    pub const fn all() -> &'static [Feature] {
        &[
            Feature::AdsOff,
            Feature::CookieConsentOff,
            Feature::MarketingDialogOff,
            Feature::ContentPaywallOff,
            Feature::SubscriptionAccessOn,
        ]
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::all().iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Mask arithmetic — pure bit operations, no error paths
// ---------------------------------------------------------------------------

pub fn has_feature(mask: FeatureMask, feature: Feature) -> bool {
    mask & feature.bit() != 0
}

pub fn set_features(mask: FeatureMask, features: &[Feature]) -> FeatureMask {
    features.iter().fold(mask, |acc, f| acc | f.bit())
}

pub fn clear_feature(mask: FeatureMask, feature: Feature) -> FeatureMask {
    mask & !feature.bit()
}

pub fn toggle_feature(mask: FeatureMask, feature: Feature) -> FeatureMask {
    mask ^ feature.bit()
}

/// Registered features present in `mask`, in registry order. Unregistered
/// bits are ignored.
pub fn features_in_mask(mask: FeatureMask) -> Vec<Feature> {
    Feature::all()
        .iter()
        .copied()
        .filter(|f| has_feature(mask, *f))
        .collect()
}
