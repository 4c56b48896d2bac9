//! PostgreSQL repository implementations

mod feature_flag;
mod plan;
mod usage;

pub use feature_flag::PgFeatureFlagRepository;
pub use plan::PgPlanRepository;
pub use usage::PgUsageRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub plans: PgPlanRepository,
    pub feature_flags: PgFeatureFlagRepository,
    pub usage: PgUsageRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            plans: PgPlanRepository::new(pool.clone()),
            feature_flags: PgFeatureFlagRepository::new(pool.clone()),
            usage: PgUsageRepository::new(pool),
        }
    }
}
