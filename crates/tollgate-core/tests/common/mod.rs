//! Common test utilities for tollgate-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{MockFeatureFlagRepository, MockPlanRepository, MockUsageRepository};
