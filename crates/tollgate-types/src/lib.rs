//! Tollgate Types - Shared domain types
//!
//! This crate contains domain types used across Tollgate crates:
//! - Subscription plans and the entitlement hierarchy
//! - Features, metered actions, and usage counters
//! - Policy evaluation results and the wire error envelope

pub mod api;
pub mod feature;
pub mod plan;
pub mod policy;
pub mod usage;
pub mod user;

pub use api::*;
pub use feature::*;
pub use plan::*;
pub use policy::*;
pub use usage::*;
pub use user::*;
