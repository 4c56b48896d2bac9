//! Per-user usage store with caching and atomic mutation

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use moka::future::Cache;

use tollgate_db::{CreateUsage, DbError, PlanRepository, UsageRepository};
use tollgate_types::{PlanId, PlanLimits, UsageField, UserId, UserUsage};

use crate::config::PolicyConfig;
use crate::error::PolicyError;

/// Authoritative quota counters, fronted by a time-boxed cache
///
/// The backing store owns the counters; the cache is an invalidate-on-write
/// copy and never a second source of truth. Every authenticated user
/// implicitly has usage tracking: a missing record is created on first read,
/// seeded from the `free` plan.
#[derive(Clone)]
pub struct UsageStore<U: UsageRepository, P: PlanRepository> {
    usage_repo: Arc<U>,
    plan_repo: Arc<P>,
    /// Cache of user id -> usage record
    cache: Cache<UserId, UserUsage>,
    reset_period_days: i64,
}

impl<U: UsageRepository, P: PlanRepository> UsageStore<U, P> {
    /// Create a usage store with default configuration
    pub fn new(usage_repo: Arc<U>, plan_repo: Arc<P>) -> Self {
        Self::with_config(usage_repo, plan_repo, &PolicyConfig::default())
    }

    /// Create a usage store with explicit configuration
    pub fn with_config(usage_repo: Arc<U>, plan_repo: Arc<P>, config: &PolicyConfig) -> Self {
        Self {
            usage_repo,
            plan_repo,
            cache: Cache::builder()
                .time_to_live(config.usage_cache_ttl)
                .max_capacity(config.cache_capacity)
                .build(),
            reset_period_days: config.reset_period_days,
        }
    }

    /// Fetch the usage record for a user, creating it on first touch
    pub async fn get(&self, user_id: UserId) -> Result<UserUsage, PolicyError> {
        let usage_repo = Arc::clone(&self.usage_repo);
        let plan_repo = Arc::clone(&self.plan_repo);
        let reset_period_days = self.reset_period_days;

        self.cache
            .try_get_with(user_id, async move {
                if let Some(row) = usage_repo.find_by_user_id(user_id.0).await? {
                    return Ok(row.into_domain());
                }
                create_record(&*usage_repo, &*plan_repo, user_id, PlanId::Free, reset_period_days)
                    .await
            })
            .await
            .map_err(PolicyError::from)
    }

    /// Create a usage record for a user on the given plan
    ///
    /// Counters start at zero with the plan's limits and a reset date one
    /// period out. Racing creates resolve to the existing record.
    pub async fn create(&self, user_id: UserId, plan: PlanId) -> Result<UserUsage, PolicyError> {
        let usage = create_record(
            &*self.usage_repo,
            &*self.plan_repo,
            user_id,
            plan,
            self.reset_period_days,
        )
        .await?;
        self.cache.insert(user_id, usage.clone()).await;
        Ok(usage)
    }

    /// Move a user to a new plan
    ///
    /// Overwrites the plan id and limit fields only; used counters carry
    /// over. Delegates to [`create`](Self::create) when no record exists.
    pub async fn update_plan(
        &self,
        user_id: UserId,
        new_plan: PlanId,
    ) -> Result<UserUsage, PolicyError> {
        if self
            .usage_repo
            .find_by_user_id(user_id.0)
            .await
            .map_err(PolicyError::from)?
            .is_none()
        {
            return self.create(user_id, new_plan).await;
        }

        let limits = plan_limits(&*self.plan_repo, new_plan).await?;
        let row = self
            .usage_repo
            .update_plan(user_id.0, new_plan.as_str(), limits)
            .await?;
        self.cache.invalidate(&user_id).await;
        Ok(row.into_domain())
    }

    /// Atomically charge a counter, then invalidate the user's cache entry
    pub async fn increment(
        &self,
        user_id: UserId,
        field: UsageField,
        amount: u64,
    ) -> Result<UserUsage, PolicyError> {
        let row = self.usage_repo.increment(user_id.0, field, amount).await?;
        self.cache.invalidate(&user_id).await;
        Ok(row.into_domain())
    }

    /// Atomically refund a counter (floors at zero), then invalidate
    pub async fn decrement(
        &self,
        user_id: UserId,
        field: UsageField,
        amount: u64,
    ) -> Result<UserUsage, PolicyError> {
        let row = self.usage_repo.decrement(user_id.0, field, amount).await?;
        self.cache.invalidate(&user_id).await;
        Ok(row.into_domain())
    }

    /// Whether further use of a field is blocked (`true` = limit reached)
    ///
    /// Fails closed: if the record cannot be fetched the field is treated as
    /// exhausted.
    pub async fn check_limit(&self, user_id: UserId, field: UsageField) -> bool {
        match self.get(user_id).await {
            Ok(usage) => usage.quota(field).is_exhausted(),
            Err(_) => true,
        }
    }

    /// Drop the cached record for a user
    pub async fn invalidate(&self, user_id: UserId) {
        self.cache.invalidate(&user_id).await;
    }
}

/// Read a plan's limits from the catalog, falling back to compiled defaults
/// when the catalog row is missing.
async fn plan_limits<P: PlanRepository + ?Sized>(
    plan_repo: &P,
    plan: PlanId,
) -> Result<PlanLimits, DbError> {
    let row = plan_repo.find_by_id(plan.as_str()).await?;
    Ok(row.map_or_else(|| plan.default_limits(), |r| r.limits()))
}

async fn create_record<U: UsageRepository + ?Sized, P: PlanRepository + ?Sized>(
    usage_repo: &U,
    plan_repo: &P,
    user_id: UserId,
    plan: PlanId,
    reset_period_days: i64,
) -> Result<UserUsage, DbError> {
    let limits = plan_limits(plan_repo, plan).await?;
    let row = usage_repo
        .create(CreateUsage {
            user_id: user_id.0,
            plan: plan.as_str().to_string(),
            limits,
            reset_at: Utc::now() + ChronoDuration::days(reset_period_days),
        })
        .await?;
    Ok(row.into_domain())
}

impl<U: UsageRepository, P: PlanRepository> std::fmt::Debug for UsageStore<U, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageStore").finish()
    }
}
