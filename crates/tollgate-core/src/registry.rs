//! Feature flag registry with caching

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use tollgate_db::{DbError, FeatureFlagRepository, FeatureFlagRow};
use tollgate_types::{Feature, FeatureFlag};

use crate::config::PolicyConfig;
use crate::error::PolicyError;

/// Feature flag lookups fronted by a time-boxed cache
///
/// "Not found" is a cacheable answer like any other; a store fault is not
/// cached, so callers never conflate "feature doesn't exist" with "registry
/// unreachable". Concurrent misses for the same feature share one fetch.
#[derive(Clone)]
pub struct FeatureRegistry<R: FeatureFlagRepository> {
    repo: Arc<R>,
    /// Cache of feature -> flag (None = confirmed absent)
    cache: Cache<Feature, Option<FeatureFlag>>,
}

impl<R: FeatureFlagRepository> FeatureRegistry<R> {
    /// Create a registry with the default 5-minute TTL
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_cache_ttl(repo, PolicyConfig::default().feature_cache_ttl)
    }

    /// Create a registry with a custom cache TTL
    pub fn with_cache_ttl(repo: Arc<R>, ttl: Duration) -> Self {
        Self {
            repo,
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(PolicyConfig::default().cache_capacity)
                .build(),
        }
    }

    /// Look up the plan requirement for a feature
    ///
    /// `Ok(None)` means the flag is absent from the store; `Err` means the
    /// store could not be reached.
    pub async fn get_requirement(
        &self,
        feature: Feature,
    ) -> Result<Option<FeatureFlag>, PolicyError> {
        let repo = Arc::clone(&self.repo);
        self.cache
            .try_get_with(feature, async move {
                let row = repo.find_by_id(feature.as_str()).await?;
                Ok::<_, DbError>(row.and_then(FeatureFlagRow::into_domain))
            })
            .await
            .map_err(PolicyError::from)
    }

    /// Drop the cached flag for a feature (admin mutation hook)
    pub async fn invalidate(&self, feature: Feature) {
        self.cache.invalidate(&feature).await;
    }
}

impl<R: FeatureFlagRepository> std::fmt::Debug for FeatureRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry").finish()
    }
}
