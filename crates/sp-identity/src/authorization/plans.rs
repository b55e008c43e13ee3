//! Subscription plans
//!
//! Maps a billing tier to the feature it unlocks in each scope. Feature
//! resets replace an end user's features with the tier's feature (plus
//! the scope baseline).

use serde::{Deserialize, Serialize};

use super::catalog::{FeatureLevel, PlatformFeatures, TenantFeatures};
use super::entitlement::Features;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Unsubscribed,
    Standard,
    Professional,
    Enterprise,
}

impl SubscriptionTier {
    pub fn platform_feature(&self) -> FeatureLevel {
        match self {
            Self::Unsubscribed => PlatformFeatures::BASIC,
            Self::Standard => PlatformFeatures::PAID_TRIAL,
            Self::Professional => PlatformFeatures::PAID2,
            Self::Enterprise => PlatformFeatures::PAID3,
        }
    }

    pub fn tenant_feature(&self) -> FeatureLevel {
        match self {
            Self::Unsubscribed => TenantFeatures::BASIC,
            Self::Standard => TenantFeatures::PAID_TRIAL,
            Self::Professional => TenantFeatures::PAID2,
            Self::Enterprise => TenantFeatures::PAID3,
        }
    }

    /// Requested platform features for a reset to this tier.
    pub fn platform_features(&self) -> Features {
        Features::empty().add_feature(self.platform_feature().feature())
    }

    /// Requested membership features for a reset to this tier.
    pub fn tenant_features(&self) -> Features {
        Features::empty().add_feature(self.tenant_feature().feature())
    }
}
