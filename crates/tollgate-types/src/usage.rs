//! Usage counters and quota types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::PlanId;
use crate::user::UserId;

/// Metered usage counter fields, one per counter column in `user_usage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageField {
    /// Videos rendered by the generation pipeline
    VideosGenerated,
    /// Recurring series created
    SeriesCreated,
    /// Finished videos exported for download
    VideosExported,
}

impl UsageField {
    /// Stable field name used on the wire and in column naming
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VideosGenerated => "videos_generated",
            Self::SeriesCreated => "series_created",
            Self::VideosExported => "videos_exported",
        }
    }

    /// All usage fields
    pub const ALL: [UsageField; 3] = [
        Self::VideosGenerated,
        Self::SeriesCreated,
        Self::VideosExported,
    ];
}

impl std::fmt::Display for UsageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quota limit for a single usage field
///
/// The backing store encodes `Unlimited` as `-1`; that sentinel never leaves
/// the row-conversion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaLimit {
    /// No cap; the field can never be exhausted
    Unlimited,
    /// Hard cap on the counter
    Max(u64),
}

impl QuotaLimit {
    /// Decode the store's integer encoding (`-1` and any negative = unlimited)
    pub const fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            Self::Unlimited
        } else {
            Self::Max(raw as u64)
        }
    }

    /// Encode back to the store's integer encoding
    pub const fn to_raw(&self) -> i64 {
        match self {
            Self::Unlimited => -1,
            Self::Max(limit) => *limit as i64,
        }
    }
}

/// A `(used, limit)` pair governing one metered resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageQuota {
    /// Times the action has run in the current period
    pub used: u64,
    /// Cap for the current period
    pub limit: QuotaLimit,
}

impl UsageQuota {
    /// A zeroed counter with the given limit
    pub const fn fresh(limit: QuotaLimit) -> Self {
        Self { used: 0, limit }
    }

    /// Whether further use is blocked
    ///
    /// The counter is not clamped: `used` may legitimately equal or exceed
    /// the limit, and that is exactly the blocked condition.
    pub const fn is_exhausted(&self) -> bool {
        match self.limit {
            QuotaLimit::Unlimited => false,
            QuotaLimit::Max(limit) => self.used >= limit,
        }
    }

    /// Remaining uses before the limit is reached
    pub const fn remaining(&self) -> Remaining {
        match self.limit {
            QuotaLimit::Unlimited => Remaining::Unlimited,
            QuotaLimit::Max(limit) => Remaining::Count(limit.saturating_sub(self.used)),
        }
    }
}

/// Remaining quota, surfaced in policy results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remaining {
    /// Unlimited plan field
    Unlimited,
    /// Exact remaining count
    Count(u64),
}

/// Per-user usage record
///
/// Created lazily on first access, mutated on every metered action and on
/// plan change, never deleted by this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUsage {
    /// Owning user
    pub user_id: UserId,
    /// Current subscription plan
    pub plan: PlanId,
    /// Videos generated this period
    pub videos_generated: UsageQuota,
    /// Series created this period
    pub series_created: UsageQuota,
    /// Videos exported this period
    pub videos_exported: UsageQuota,
    /// When the counters next reset
    pub reset_at: DateTime<Utc>,
}

impl UserUsage {
    /// Counter for a specific usage field
    pub const fn quota(&self, field: UsageField) -> &UsageQuota {
        match field {
            UsageField::VideosGenerated => &self.videos_generated,
            UsageField::SeriesCreated => &self.series_created,
            UsageField::VideosExported => &self.videos_exported,
        }
    }
}
