//! Mock repositories for testing

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use tollgate_db::{
    CreateUsage, DbError, DbResult, FeatureFlagRepository, FeatureFlagRow, PlanRepository,
    PlanRow, UsageRepository, UserUsageRow,
};
use tollgate_types::{PlanId, PlanLimits, UsageField};

fn unavailable() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

/// In-memory plan catalog for testing
#[derive(Default, Clone)]
pub struct MockPlanRepository {
    plans: Arc<DashMap<String, PlanRow>>,
    fail: Arc<AtomicBool>,
}

impl MockPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the three standard plans
    pub fn seeded() -> Self {
        let repo = Self::new();
        for plan in PlanId::ALL {
            repo.insert_plan(plan);
        }
        repo
    }

    /// Insert a catalog row for a plan using its compiled default limits
    pub fn insert_plan(&self, plan: PlanId) {
        let limits = plan.default_limits();
        self.plans.insert(
            plan.as_str().to_string(),
            PlanRow {
                id: plan.as_str().to_string(),
                name: plan.as_str().to_string(),
                videos_generated_limit: limits.videos_generated.to_raw(),
                series_created_limit: limits.series_created.to_raw(),
                videos_exported_limit: limits.videos_exported.to_raw(),
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
    }

    /// Make every call fail, simulating an unreachable store
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlanRepository for MockPlanRepository {
    async fn find_by_id(&self, plan_id: &str) -> DbResult<Option<PlanRow>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.plans.get(plan_id).map(|r| r.value().clone()))
    }

    async fn list_active(&self) -> DbResult<Vec<PlanRow>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .plans
            .iter()
            .filter(|r| r.value().is_active)
            .map(|r| r.value().clone())
            .collect())
    }
}

/// In-memory feature flag store for testing
#[derive(Default, Clone)]
pub struct MockFeatureFlagRepository {
    flags: Arc<DashMap<String, FeatureFlagRow>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockFeatureFlagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a flag row
    pub fn insert_flag(&self, feature_id: &str, required_plan: Option<PlanId>, is_active: bool) {
        self.flags.insert(
            feature_id.to_string(),
            FeatureFlagRow {
                id: feature_id.to_string(),
                required_plan: required_plan.map(|p| p.as_str().to_string()),
                is_active,
                updated_at: Utc::now(),
            },
        );
    }

    /// Make every call fail, simulating an unreachable store
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of store lookups observed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureFlagRepository for MockFeatureFlagRepository {
    async fn find_by_id(&self, feature_id: &str) -> DbResult<Option<FeatureFlagRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.flags.get(feature_id).map(|r| r.value().clone()))
    }
}

/// In-memory usage store for testing
#[derive(Default, Clone)]
pub struct MockUsageRepository {
    records: Arc<DashMap<Uuid, UserUsageRow>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a usage row directly
    pub fn insert_usage(&self, row: UserUsageRow) {
        self.records.insert(row.user_id, row);
    }

    /// Build a usage row for a user on a plan with explicit counters
    pub fn usage_row(
        user_id: Uuid,
        plan: PlanId,
        used: [i64; 3],
        limits: PlanLimits,
    ) -> UserUsageRow {
        UserUsageRow {
            user_id,
            plan: plan.as_str().to_string(),
            videos_generated_used: used[0],
            videos_generated_limit: limits.videos_generated.to_raw(),
            series_created_used: used[1],
            series_created_limit: limits.series_created.to_raw(),
            videos_exported_used: used[2],
            videos_exported_limit: limits.videos_exported.to_raw(),
            reset_at: Utc::now() + chrono::Duration::days(30),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Make every call fail, simulating an unreachable store
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of store calls observed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> DbResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn counter_mut(row: &mut UserUsageRow, field: UsageField) -> &mut i64 {
        match field {
            UsageField::VideosGenerated => &mut row.videos_generated_used,
            UsageField::SeriesCreated => &mut row.series_created_used,
            UsageField::VideosExported => &mut row.videos_exported_used,
        }
    }
}

#[async_trait]
impl UsageRepository for MockUsageRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<UserUsageRow>> {
        self.check()?;
        Ok(self.records.get(&user_id).map(|r| r.value().clone()))
    }

    async fn create(&self, usage: CreateUsage) -> DbResult<UserUsageRow> {
        self.check()?;
        let row = UserUsageRow {
            user_id: usage.user_id,
            plan: usage.plan,
            videos_generated_used: 0,
            videos_generated_limit: usage.limits.videos_generated.to_raw(),
            series_created_used: 0,
            series_created_limit: usage.limits.series_created.to_raw(),
            videos_exported_used: 0,
            videos_exported_limit: usage.limits.videos_exported.to_raw(),
            reset_at: usage.reset_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        // First writer wins, like the ON CONFLICT DO NOTHING insert.
        let entry = self
            .records
            .entry(usage.user_id)
            .or_insert_with(|| row.clone());
        Ok(entry.value().clone())
    }

    async fn update_plan(
        &self,
        user_id: Uuid,
        plan: &str,
        limits: PlanLimits,
    ) -> DbResult<UserUsageRow> {
        self.check()?;
        let mut row = self.records.get_mut(&user_id).ok_or(DbError::NotFound)?;
        row.plan = plan.to_string();
        row.videos_generated_limit = limits.videos_generated.to_raw();
        row.series_created_limit = limits.series_created.to_raw();
        row.videos_exported_limit = limits.videos_exported.to_raw();
        row.updated_at = Utc::now();
        Ok(row.value().clone())
    }

    async fn increment(
        &self,
        user_id: Uuid,
        field: UsageField,
        amount: u64,
    ) -> DbResult<UserUsageRow> {
        self.check()?;
        let mut row = self.records.get_mut(&user_id).ok_or(DbError::NotFound)?;
        *Self::counter_mut(&mut row, field) += amount as i64;
        row.updated_at = Utc::now();
        Ok(row.value().clone())
    }

    async fn decrement(
        &self,
        user_id: Uuid,
        field: UsageField,
        amount: u64,
    ) -> DbResult<UserUsageRow> {
        self.check()?;
        let mut row = self.records.get_mut(&user_id).ok_or(DbError::NotFound)?;
        let counter = Self::counter_mut(&mut row, field);
        *counter = (*counter - amount as i64).max(0);
        row.updated_at = Utc::now();
        Ok(row.value().clone())
    }
}
