//! PostgreSQL usage repository implementation
//!
//! Counter mutations are single atomic UPDATE statements so concurrent
//! chargers never lose updates; there is no read-modify-write round trip.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tollgate_types::{PlanLimits, UsageField};

use crate::error::{DbError, DbResult};
use crate::models::UserUsageRow;
use crate::repo::{CreateUsage, UsageRepository};

const USAGE_COLUMNS: &str = "user_id, plan, \
    videos_generated_used, videos_generated_limit, \
    series_created_used, series_created_limit, \
    videos_exported_used, videos_exported_limit, \
    reset_at, created_at, updated_at";

/// Counter column for a usage field
///
/// Closed enum to fixed identifier; never interpolates caller input.
const fn used_column(field: UsageField) -> &'static str {
    match field {
        UsageField::VideosGenerated => "videos_generated_used",
        UsageField::SeriesCreated => "series_created_used",
        UsageField::VideosExported => "videos_exported_used",
    }
}

/// PostgreSQL usage repository
#[derive(Clone)]
pub struct PgUsageRepository {
    pool: PgPool,
}

impl PgUsageRepository {
    /// Create a new usage repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PgUsageRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<UserUsageRow>> {
        let usage = sqlx::query_as::<_, UserUsageRow>(&format!(
            "SELECT {USAGE_COLUMNS} FROM user_usage WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usage)
    }

    async fn create(&self, usage: CreateUsage) -> DbResult<UserUsageRow> {
        let row = sqlx::query_as::<_, UserUsageRow>(&format!(
            r#"
            INSERT INTO user_usage (user_id, plan,
                videos_generated_used, videos_generated_limit,
                series_created_used, series_created_limit,
                videos_exported_used, videos_exported_limit,
                reset_at)
            VALUES ($1, $2, 0, $3, 0, $4, 0, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(usage.user_id)
        .bind(&usage.plan)
        .bind(usage.limits.videos_generated.to_raw())
        .bind(usage.limits.series_created.to_raw())
        .bind(usage.limits.videos_exported.to_raw())
        .bind(usage.reset_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row),
            // Lost a create race; the existing record wins.
            None => self
                .find_by_user_id(usage.user_id)
                .await?
                .ok_or(DbError::NotFound),
        }
    }

    async fn update_plan(
        &self,
        user_id: Uuid,
        plan: &str,
        limits: PlanLimits,
    ) -> DbResult<UserUsageRow> {
        let row = sqlx::query_as::<_, UserUsageRow>(&format!(
            r#"
            UPDATE user_usage
            SET plan = $2,
                videos_generated_limit = $3,
                series_created_limit = $4,
                videos_exported_limit = $5,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(plan)
        .bind(limits.videos_generated.to_raw())
        .bind(limits.series_created.to_raw())
        .bind(limits.videos_exported.to_raw())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound)
    }

    async fn increment(
        &self,
        user_id: Uuid,
        field: UsageField,
        amount: u64,
    ) -> DbResult<UserUsageRow> {
        let col = used_column(field);
        let row = sqlx::query_as::<_, UserUsageRow>(&format!(
            r#"
            UPDATE user_usage
            SET {col} = {col} + $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount as i64)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound)
    }

    async fn decrement(
        &self,
        user_id: Uuid,
        field: UsageField,
        amount: u64,
    ) -> DbResult<UserUsageRow> {
        let col = used_column(field);
        let row = sqlx::query_as::<_, UserUsageRow>(&format!(
            r#"
            UPDATE user_usage
            SET {col} = GREATEST({col} - $2, 0), updated_at = NOW()
            WHERE user_id = $1
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount as i64)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound)
    }
}
