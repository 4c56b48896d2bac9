//! Tollgate DB - Backing-store abstractions
//!
//! SQLx-based store layer for the policy engine. Three logical contracts:
//! the read-only `subscription_plans` catalog, the read-mostly
//! `feature_flags` table, and the read/write `user_usage` table with its
//! atomic increment/decrement primitive.
//!
//! # Example
//!
//! ```rust,ignore
//! use tollgate_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/tollgate").await?;
//! let repos = Repositories::new(pool);
//!
//! let flag = repos.feature_flags.find_by_id("video_generation").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
