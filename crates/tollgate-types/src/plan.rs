//! Subscription plan types and the entitlement hierarchy

use serde::{Deserialize, Serialize};

use crate::usage::{QuotaLimit, UsageField};

/// Subscription plan tiers, ordered by entitlement
///
/// The derived `Ord` follows declaration order, so `Free < Creator < Pro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    /// Free plan - trial quotas
    Free,
    /// Creator plan - monthly quotas sized for individual creators
    Creator,
    /// Pro plan - unlimited usage
    Pro,
}

impl PlanId {
    /// Numeric hierarchy rank used for access comparison
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Free => 1,
            Self::Creator => 2,
            Self::Pro => 3,
        }
    }

    /// Whether this plan satisfies a feature's plan requirement
    ///
    /// A `None` requirement means the feature is open to every plan.
    pub fn has_access(&self, required: Option<PlanId>) -> bool {
        match required {
            None => true,
            Some(required) => self.rank() >= required.rank(),
        }
    }

    /// Stable string id used in the backing store
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Creator => "creator",
            Self::Pro => "pro",
        }
    }

    /// Compiled default quota limits for this plan
    ///
    /// Mirrors the seeded `subscription_plans` catalog; used as a fallback
    /// when the catalog row is missing.
    pub const fn default_limits(&self) -> PlanLimits {
        match self {
            Self::Free => PlanLimits {
                videos_generated: QuotaLimit::Max(3),
                series_created: QuotaLimit::Max(1),
                videos_exported: QuotaLimit::Max(3),
            },
            Self::Creator => PlanLimits {
                videos_generated: QuotaLimit::Max(15),
                series_created: QuotaLimit::Max(5),
                videos_exported: QuotaLimit::Max(30),
            },
            Self::Pro => PlanLimits {
                videos_generated: QuotaLimit::Unlimited,
                series_created: QuotaLimit::Unlimited,
                videos_exported: QuotaLimit::Unlimited,
            },
        }
    }

    /// All plans in ascending hierarchy order
    pub const ALL: [PlanId; 3] = [Self::Free, Self::Creator, Self::Pro];
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlanId {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "creator" => Ok(Self::Creator),
            "pro" => Ok(Self::Pro),
            _ => Err(PlanParseError(s.to_string())),
        }
    }
}

/// Error parsing a plan string
#[derive(Debug, Clone)]
pub struct PlanParseError(pub String);

impl std::fmt::Display for PlanParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid plan: {}", self.0)
    }
}

impl std::error::Error for PlanParseError {}

/// Per-field quota limits for a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub videos_generated: QuotaLimit,
    pub series_created: QuotaLimit,
    pub videos_exported: QuotaLimit,
}

impl PlanLimits {
    /// Limit for a specific usage field
    pub const fn limit(&self, field: UsageField) -> QuotaLimit {
        match field {
            UsageField::VideosGenerated => self.videos_generated,
            UsageField::SeriesCreated => self.series_created,
            UsageField::VideosExported => self.videos_exported,
        }
    }
}

/// Subscription plan catalog entry
///
/// Seeded out-of-band in the `subscription_plans` table; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    /// Plan identifier
    pub id: PlanId,
    /// Human-readable plan name
    pub name: String,
    /// Per-field quota limits
    pub limits: PlanLimits,
    /// Whether the plan can be subscribed to
    pub is_active: bool,
}
