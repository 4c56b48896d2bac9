//! Policy evaluation: access gate before quota gate

use std::sync::Arc;

use async_trait::async_trait;

use tollgate_db::{FeatureFlagRepository, PlanRepository, UsageRepository};
use tollgate_types::{Action, Feature, PolicyResult, UserId, Verdict};

use crate::config::PolicyConfig;
use crate::error::PolicyError;
use crate::registry::FeatureRegistry;
use crate::usage::UsageStore;

/// The seam the request pipeline talks to
///
/// Implemented by [`PolicyEngine`]; tests substitute their own.
#[async_trait]
pub trait PolicyBackend: Send + Sync {
    /// Evaluate whether a user may use a feature right now
    async fn evaluate(&self, user_id: UserId, feature_id: &str)
        -> Result<PolicyResult, PolicyError>;

    /// Record consumption for a completed action
    async fn charge(&self, user_id: UserId, action: Action, amount: u64)
        -> Result<(), PolicyError>;

    /// Undo a recorded charge (floors at zero)
    async fn refund(&self, user_id: UserId, action: Action, amount: u64)
        -> Result<(), PolicyError>;
}

/// Shared handle to a policy backend
pub type SharedPolicy = Arc<dyn PolicyBackend>;

/// The decision engine
///
/// Owns no data; composes snapshots from the [`FeatureRegistry`] and
/// [`UsageStore`] into a single structured verdict. The plan gate runs
/// before the quota gate, so a plan denial never reports quota numbers and a
/// quota denial never re-reports the plan mismatch.
#[derive(Clone)]
pub struct PolicyEngine<F, U, P>
where
    F: FeatureFlagRepository,
    U: UsageRepository,
    P: PlanRepository,
{
    registry: FeatureRegistry<F>,
    usage: UsageStore<U, P>,
}

impl<F, U, P> PolicyEngine<F, U, P>
where
    F: FeatureFlagRepository,
    U: UsageRepository,
    P: PlanRepository,
{
    /// Create an engine from pre-built components
    pub fn new(registry: FeatureRegistry<F>, usage: UsageStore<U, P>) -> Self {
        Self { registry, usage }
    }

    /// Create an engine straight from repositories
    pub fn from_repos(
        flag_repo: Arc<F>,
        usage_repo: Arc<U>,
        plan_repo: Arc<P>,
        config: &PolicyConfig,
    ) -> Self {
        Self {
            registry: FeatureRegistry::with_cache_ttl(flag_repo, config.feature_cache_ttl),
            usage: UsageStore::with_config(usage_repo, plan_repo, config),
        }
    }

    /// The usage store behind this engine
    pub fn usage(&self) -> &UsageStore<U, P> {
        &self.usage
    }

    /// The feature registry behind this engine
    pub fn registry(&self) -> &FeatureRegistry<F> {
        &self.registry
    }

    /// Evaluate access and quota for one feature request
    pub async fn evaluate(
        &self,
        user_id: UserId,
        feature_id: &str,
    ) -> Result<PolicyResult, PolicyError> {
        // Unknown ids are rejected before any store traffic.
        let feature: Feature = feature_id
            .parse()
            .map_err(|_| PolicyError::UnknownFeature(feature_id.to_string()))?;

        let usage = self.usage.get(user_id).await?;

        let flag = self.registry.get_requirement(feature).await?;
        let flag = match flag {
            Some(flag) if flag.is_active => flag,
            // Absent or disabled flags are indistinguishable from unknown
            // features to callers.
            _ => return Err(PolicyError::UnknownFeature(feature_id.to_string())),
        };

        if !usage.plan.has_access(flag.required_plan) {
            // required_plan is Some here: a None requirement always passes.
            let required = flag
                .required_plan
                .ok_or_else(|| PolicyError::Service("requirement vanished".to_string()))?;
            return Ok(PolicyResult {
                feature,
                current_plan: usage.plan,
                verdict: Verdict::PlanRequired { required },
            });
        }

        let field = feature.usage_field();
        let quota = usage.quota(field);
        if quota.is_exhausted() {
            return Ok(PolicyResult {
                feature,
                current_plan: usage.plan,
                verdict: Verdict::QuotaExhausted {
                    field,
                    used: quota.used,
                    limit: quota.limit,
                },
            });
        }

        Ok(PolicyResult {
            feature,
            current_plan: usage.plan,
            verdict: Verdict::Granted {
                field,
                remaining: quota.remaining(),
                limit: quota.limit,
            },
        })
    }
}

#[async_trait]
impl<F, U, P> PolicyBackend for PolicyEngine<F, U, P>
where
    F: FeatureFlagRepository,
    U: UsageRepository,
    P: PlanRepository,
{
    async fn evaluate(
        &self,
        user_id: UserId,
        feature_id: &str,
    ) -> Result<PolicyResult, PolicyError> {
        PolicyEngine::evaluate(self, user_id, feature_id).await
    }

    async fn charge(
        &self,
        user_id: UserId,
        action: Action,
        amount: u64,
    ) -> Result<(), PolicyError> {
        self.usage
            .increment(user_id, action.usage_field(), amount)
            .await?;
        Ok(())
    }

    async fn refund(
        &self,
        user_id: UserId,
        action: Action,
        amount: u64,
    ) -> Result<(), PolicyError> {
        self.usage
            .decrement(user_id, action.usage_field(), amount)
            .await?;
        Ok(())
    }
}

impl<F, U, P> std::fmt::Debug for PolicyEngine<F, U, P>
where
    F: FeatureFlagRepository,
    U: UsageRepository,
    P: PlanRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine").finish()
    }
}
