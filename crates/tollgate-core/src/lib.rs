//! Tollgate Core - The monetization policy engine
//!
//! Decides, for a given user and requested feature, whether the user's
//! subscription plan grants access and whether quota remains, and records
//! consumption after the protected operation succeeds.
//!
//! - [`FeatureRegistry`] - cached feature flag lookups over the backing store
//! - [`UsageStore`] - cached per-user quota records with atomic mutation
//! - [`PolicyEngine`] - pure decision composition over the two
//! - [`PolicyBackend`] - the seam the request pipeline talks to
//!
//! The engine owns no authoritative data: the backing store does. Caches are
//! time-boxed copies, invalidated synchronously after every successful
//! mutation for the affected user.

pub mod config;
pub mod error;
pub mod policy;
pub mod registry;
pub mod usage;

pub use config::PolicyConfig;
pub use error::PolicyError;
pub use policy::{PolicyBackend, PolicyEngine, SharedPolicy};
pub use registry::FeatureRegistry;
pub use usage::UsageStore;
