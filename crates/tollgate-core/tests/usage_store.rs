//! Integration tests for the usage store

mod common;

use std::sync::Arc;

use common::{MockPlanRepository, MockUsageRepository};
use tollgate_core::{PolicyConfig, UsageStore};
use tollgate_db::UsageRepository;
use tollgate_types::{PlanId, QuotaLimit, UsageField, UserId};
use uuid::Uuid;

fn store(
    usage: &MockUsageRepository,
    plans: &MockPlanRepository,
) -> UsageStore<MockUsageRepository, MockPlanRepository> {
    UsageStore::with_config(
        Arc::new(usage.clone()),
        Arc::new(plans.clone()),
        &PolicyConfig::default(),
    )
}

#[tokio::test]
async fn get_lazily_creates_free_record() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId::new();

    let usage = store.get(user).await.unwrap();

    assert_eq!(usage.plan, PlanId::Free);
    assert_eq!(usage.quota(UsageField::VideosGenerated).used, 0);
    assert_eq!(
        usage.quota(UsageField::VideosGenerated).limit,
        QuotaLimit::Max(3)
    );
    // The record landed in the backing store, not only in the cache.
    assert!(usage_repo
        .find_by_user_id(user.0)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn create_falls_back_to_compiled_limits_when_catalog_row_missing() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::new(); // empty catalog
    let store = store(&usage_repo, &plans);

    let usage = store.create(UserId::new(), PlanId::Creator).await.unwrap();

    assert_eq!(usage.plan, PlanId::Creator);
    assert_eq!(
        usage.quota(UsageField::VideosGenerated).limit,
        QuotaLimit::Max(15)
    );
}

#[tokio::test]
async fn reads_are_cached_until_invalidated() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId::new();

    store.get(user).await.unwrap();
    let after_create = usage_repo.call_count();
    store.get(user).await.unwrap();
    store.get(user).await.unwrap();
    assert_eq!(usage_repo.call_count(), after_create);

    store.invalidate(user).await;
    store.get(user).await.unwrap();
    assert!(usage_repo.call_count() > after_create);
}

#[tokio::test]
async fn increment_reflected_exactly_once_after_invalidation() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId(Uuid::new_v4());
    usage_repo.insert_usage(MockUsageRepository::usage_row(
        user.0,
        PlanId::Creator,
        [2, 0, 0],
        PlanId::Creator.default_limits(),
    ));

    // Warm the cache, then charge.
    assert_eq!(store.get(user).await.unwrap().videos_generated.used, 2);
    store
        .increment(user, UsageField::VideosGenerated, 1)
        .await
        .unwrap();

    // Increment invalidated the cache: the next read observes used += 1.
    assert_eq!(store.get(user).await.unwrap().videos_generated.used, 3);
}

#[tokio::test]
async fn decrement_floors_at_zero() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId(Uuid::new_v4());
    usage_repo.insert_usage(MockUsageRepository::usage_row(
        user.0,
        PlanId::Creator,
        [1, 0, 0],
        PlanId::Creator.default_limits(),
    ));

    store
        .decrement(user, UsageField::VideosGenerated, 5)
        .await
        .unwrap();

    assert_eq!(store.get(user).await.unwrap().videos_generated.used, 0);
}

#[tokio::test]
async fn update_plan_resyncs_limits_but_keeps_counters() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId(Uuid::new_v4());
    usage_repo.insert_usage(MockUsageRepository::usage_row(
        user.0,
        PlanId::Free,
        [2, 1, 0],
        PlanId::Free.default_limits(),
    ));

    let usage = store.update_plan(user, PlanId::Creator).await.unwrap();

    assert_eq!(usage.plan, PlanId::Creator);
    assert_eq!(usage.quota(UsageField::VideosGenerated).used, 2);
    assert_eq!(usage.quota(UsageField::SeriesCreated).used, 1);
    assert_eq!(
        usage.quota(UsageField::VideosGenerated).limit,
        QuotaLimit::Max(15)
    );
}

#[tokio::test]
async fn update_plan_creates_when_absent() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);

    let usage = store.update_plan(UserId::new(), PlanId::Pro).await.unwrap();

    assert_eq!(usage.plan, PlanId::Pro);
    assert_eq!(usage.quota(UsageField::VideosGenerated).used, 0);
    assert_eq!(
        usage.quota(UsageField::VideosGenerated).limit,
        QuotaLimit::Unlimited
    );
}

#[tokio::test]
async fn check_limit_fails_closed_when_store_unreachable() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId::new();
    usage_repo.set_failing(true);

    assert!(store.check_limit(user, UsageField::VideosGenerated).await);
}

#[tokio::test]
async fn check_limit_never_blocks_unlimited_fields() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let store = store(&usage_repo, &plans);
    let user = UserId(Uuid::new_v4());
    usage_repo.insert_usage(MockUsageRepository::usage_row(
        user.0,
        PlanId::Pro,
        [900_000, 0, 0],
        PlanId::Pro.default_limits(),
    ));

    assert!(!store.check_limit(user, UsageField::VideosGenerated).await);
}

#[tokio::test]
async fn concurrent_creates_resolve_to_one_record() {
    let usage_repo = MockUsageRepository::new();
    let plans = MockPlanRepository::seeded();
    let user = UserId::new();

    let a = store(&usage_repo, &plans);
    let b = store(&usage_repo, &plans);
    let (ra, rb) = tokio::join!(a.get(user), b.get(user));
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.user_id, user);
    assert_eq!(ra, rb);
}
