//! Repository traits
//!
//! Async store interfaces the policy engine depends on. The engine never
//! talks to SQLx directly; tests substitute in-memory implementations.

use async_trait::async_trait;
use uuid::Uuid;

use tollgate_types::{PlanLimits, UsageField};

use crate::error::DbResult;
use crate::models::{FeatureFlagRow, PlanRow, UserUsageRow};

/// Subscription plan catalog (read-only)
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Find a plan by its string id
    async fn find_by_id(&self, plan_id: &str) -> DbResult<Option<PlanRow>>;

    /// List all active plans in the catalog
    async fn list_active(&self) -> DbResult<Vec<PlanRow>>;
}

/// Feature flag store (read-mostly, admin-mutated)
#[async_trait]
pub trait FeatureFlagRepository: Send + Sync {
    /// Find a feature flag by feature id
    async fn find_by_id(&self, feature_id: &str) -> DbResult<Option<FeatureFlagRow>>;
}

/// Per-user usage store (read/write)
///
/// `increment` and `decrement` must be single atomic store mutations, not a
/// read-modify-write round trip: concurrent callers must not lose updates.
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Find the usage record for a user
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<UserUsageRow>>;

    /// Insert a new usage record with zeroed counters
    async fn create(&self, usage: CreateUsage) -> DbResult<UserUsageRow>;

    /// Overwrite the plan id and limit columns, leaving counters untouched
    async fn update_plan(
        &self,
        user_id: Uuid,
        plan: &str,
        limits: PlanLimits,
    ) -> DbResult<UserUsageRow>;

    /// Atomically add to one counter
    async fn increment(&self, user_id: Uuid, field: UsageField, amount: u64)
        -> DbResult<UserUsageRow>;

    /// Atomically subtract from one counter, flooring at zero
    async fn decrement(&self, user_id: Uuid, field: UsageField, amount: u64)
        -> DbResult<UserUsageRow>;
}

/// Create usage record input
#[derive(Debug, Clone)]
pub struct CreateUsage {
    pub user_id: Uuid,
    pub plan: String,
    pub limits: PlanLimits,
    pub reset_at: chrono::DateTime<chrono::Utc>,
}
