use serde::Serialize;
use std::collections::BTreeMap;

use betterweb_core::{has_feature, Feature, FeatureMask};

/// Fully-populated boolean mapping from feature to enabled/disabled.
///
/// This is the only artifact downstream request logic consumes. It always
/// carries one entry per registered flag — never partial, never an error.
/// Absence of trust degrades to the all-false map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityMap(BTreeMap<Feature, bool>);

impl CapabilityMap {
    /// The all-false map: every registered flag denied.
    pub fn denied() -> Self {
        Self(Feature::all().iter().map(|f| (*f, false)).collect())
    }

    /// Per-bit map: a flag is enabled iff its bit is set in `mask`.
    pub fn from_mask(mask: FeatureMask) -> Self {
        Self(
            Feature::all()
                .iter()
                .map(|f| (*f, has_feature(mask, *f)))
                .collect(),
        )
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.0.get(&feature).copied().unwrap_or(false)
    }

    pub fn any_enabled(&self) -> bool {
        self.0.values().any(|v| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }
}
