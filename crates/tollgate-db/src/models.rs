//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Conversions to the domain types in `tollgate-types` live here so the
//! `-1` unlimited sentinel and plan-string fallbacks never leak upward.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use tollgate_types::{
    Feature, FeatureFlag, PlanId, PlanLimits, QuotaLimit, SubscriptionPlan, UsageQuota, UserId,
    UserUsage,
};

/// Subscription plan row from the `subscription_plans` catalog
#[derive(Debug, Clone, FromRow)]
pub struct PlanRow {
    pub id: String,
    pub name: String,
    pub videos_generated_limit: i64,
    pub series_created_limit: i64,
    pub videos_exported_limit: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanRow {
    /// Quota limits carried by this catalog row
    pub fn limits(&self) -> PlanLimits {
        PlanLimits {
            videos_generated: QuotaLimit::from_raw(self.videos_generated_limit),
            series_created: QuotaLimit::from_raw(self.series_created_limit),
            videos_exported: QuotaLimit::from_raw(self.videos_exported_limit),
        }
    }

    /// Convert to the domain catalog entry
    ///
    /// An unrecognized plan id string falls back to `free`, matching the
    /// usage-row convention.
    pub fn into_domain(self) -> SubscriptionPlan {
        let limits = self.limits();
        SubscriptionPlan {
            id: self.id.parse().unwrap_or(PlanId::Free),
            name: self.name,
            limits,
            is_active: self.is_active,
        }
    }
}

/// Feature flag row from the `feature_flags` table
#[derive(Debug, Clone, FromRow)]
pub struct FeatureFlagRow {
    pub id: String,
    pub required_plan: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl FeatureFlagRow {
    /// Convert to the domain flag; `None` when the stored id is not a known
    /// feature (stale rows left behind by admin tooling).
    pub fn into_domain(self) -> Option<FeatureFlag> {
        let feature: Feature = self.id.parse().ok()?;
        let required_plan = self
            .required_plan
            .as_deref()
            .and_then(|p| p.parse::<PlanId>().ok());
        Some(FeatureFlag {
            feature,
            required_plan,
            is_active: self.is_active,
        })
    }
}

/// Per-user usage row from the `user_usage` table
#[derive(Debug, Clone, FromRow)]
pub struct UserUsageRow {
    pub user_id: Uuid,
    pub plan: String,
    pub videos_generated_used: i64,
    pub videos_generated_limit: i64,
    pub series_created_used: i64,
    pub series_created_limit: i64,
    pub videos_exported_used: i64,
    pub videos_exported_limit: i64,
    pub reset_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserUsageRow {
    /// Convert to the domain record
    ///
    /// Unknown plan strings fall back to `free`; negative counters (which
    /// the store's `GREATEST` floor should prevent) clamp to zero.
    pub fn into_domain(self) -> UserUsage {
        UserUsage {
            user_id: UserId(self.user_id),
            plan: self.plan.parse().unwrap_or(PlanId::Free),
            videos_generated: quota(self.videos_generated_used, self.videos_generated_limit),
            series_created: quota(self.series_created_used, self.series_created_limit),
            videos_exported: quota(self.videos_exported_used, self.videos_exported_limit),
            reset_at: self.reset_at,
        }
    }
}

fn quota(used: i64, limit: i64) -> UsageQuota {
    UsageQuota {
        used: used.max(0) as u64,
        limit: QuotaLimit::from_raw(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_types::UsageField;

    fn usage_row() -> UserUsageRow {
        UserUsageRow {
            user_id: Uuid::new_v4(),
            plan: "creator".to_string(),
            videos_generated_used: 2,
            videos_generated_limit: 15,
            series_created_used: 0,
            series_created_limit: 5,
            videos_exported_used: 4,
            videos_exported_limit: -1,
            reset_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_usage_row_into_domain() {
        let usage = usage_row().into_domain();
        assert_eq!(usage.plan, PlanId::Creator);
        assert_eq!(usage.quota(UsageField::VideosGenerated).used, 2);
        assert_eq!(
            usage.quota(UsageField::VideosGenerated).limit,
            QuotaLimit::Max(15)
        );
        assert_eq!(
            usage.quota(UsageField::VideosExported).limit,
            QuotaLimit::Unlimited
        );
    }

    #[test]
    fn test_unknown_plan_falls_back_to_free() {
        let mut row = usage_row();
        row.plan = "legacy_gold".to_string();
        assert_eq!(row.into_domain().plan, PlanId::Free);
    }

    #[test]
    fn test_flag_row_into_domain() {
        let row = FeatureFlagRow {
            id: "series_creation".to_string(),
            required_plan: Some("creator".to_string()),
            is_active: true,
            updated_at: Utc::now(),
        };
        let flag = row.into_domain().unwrap();
        assert_eq!(flag.feature, Feature::SeriesCreation);
        assert_eq!(flag.required_plan, Some(PlanId::Creator));

        let stale = FeatureFlagRow {
            id: "removed_feature".to_string(),
            required_plan: None,
            is_active: true,
            updated_at: Utc::now(),
        };
        assert!(stale.into_domain().is_none());
    }
}
