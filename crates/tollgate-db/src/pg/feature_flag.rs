//! PostgreSQL feature flag repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::FeatureFlagRow;
use crate::repo::FeatureFlagRepository;

/// PostgreSQL feature flag repository
#[derive(Clone)]
pub struct PgFeatureFlagRepository {
    pool: PgPool,
}

impl PgFeatureFlagRepository {
    /// Create a new feature flag repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureFlagRepository for PgFeatureFlagRepository {
    async fn find_by_id(&self, feature_id: &str) -> DbResult<Option<FeatureFlagRow>> {
        let flag = sqlx::query_as::<_, FeatureFlagRow>(
            r#"
            SELECT id, required_plan, is_active, updated_at
            FROM feature_flags
            WHERE id = $1
            "#,
        )
        .bind(feature_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flag)
    }
}
