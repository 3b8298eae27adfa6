use usage_gate_core::actor::{AccountId, Actor};
use usage_gate_core::config::GateConfig;
use usage_gate_core::contract::MockCounterStore;
use usage_gate_core::gate::UsageGate;

#[tokio::test]
async fn test_flags_follow_thresholds_across_all_counts() {
    for stored in 0u32..20 {
        let mut store = MockCounterStore::new();
        store
            .expect_fetch_count()
            .return_once(move |_| Ok(Some(stored)));

        let mut gate = UsageGate::new(GateConfig::default());
        let flags = gate.initialize(&Actor::Anonymous, &store).await;

        assert_eq!(
            flags.requires_email,
            stored >= 5,
            "requires_email wrong for count {stored}"
        );
        assert_eq!(
            flags.requires_subscription,
            stored >= 10,
            "requires_subscription wrong for count {stored}"
        );
        // requires_subscription must always imply requires_email.
        assert!(
            !flags.requires_subscription || flags.requires_email,
            "subscription gating without email gating at count {stored}"
        );
    }
}

#[tokio::test]
async fn test_initialize_is_idempotent_without_increments() {
    let mut store = MockCounterStore::new();
    store
        .expect_fetch_count()
        .times(2)
        .returning(|_| Ok(Some(7)));

    let mut gate = UsageGate::new(GateConfig::default());
    let first = gate.initialize(&Actor::Anonymous, &store).await;
    let second = gate.initialize(&Actor::Anonymous, &store).await;

    assert_eq!(first, second, "Repeated initialize must yield equal flags");
    assert_eq!(gate.count(), 7);
}

#[tokio::test]
async fn test_increments_accumulate_on_top_of_stored_count() {
    let mut store = MockCounterStore::new();
    store.expect_fetch_count().return_once(|_| Ok(Some(3)));
    // One write per increment, each carrying the next count.
    for expected in 4u32..=7 {
        store
            .expect_store_count()
            .withf(move |_, count| *count == expected)
            .times(1)
            .returning(|_, _| Ok(()));
    }

    let mut gate = UsageGate::new(GateConfig::default());
    gate.initialize(&Actor::Anonymous, &store).await;
    for _ in 0..4 {
        gate.increment_usage(&Actor::Anonymous, &store).await;
    }

    assert_eq!(gate.count(), 7, "3 stored + 4 increments");
}

#[tokio::test]
async fn test_fresh_actor_with_no_record_starts_ungated() {
    let mut store = MockCounterStore::new();
    store.expect_fetch_count().return_once(|_| Ok(None));

    let mut gate = UsageGate::new(GateConfig::default());
    let flags = gate.initialize(&Actor::Anonymous, &store).await;

    assert_eq!(gate.count(), 0);
    assert!(!flags.requires_email);
    assert!(!flags.requires_subscription);
}

#[tokio::test]
async fn test_authenticated_actor_without_remote_record_is_not_an_error() {
    let actor = Actor::resolve(Some(AccountId::new("user-42")));
    let mut store = MockCounterStore::new();
    store
        .expect_fetch_count()
        .withf(|key| key == "user-42")
        .return_once(|_| Ok(None));

    let mut gate = UsageGate::new(GateConfig::default());
    let flags = gate.initialize(&actor, &store).await;

    assert_eq!(gate.count(), 0, "Absent remote record reads as zero");
    assert!(!flags.requires_email && !flags.requires_subscription);
}

#[tokio::test]
async fn test_crossing_subscription_threshold_issues_upsert_with_new_count() {
    let actor = Actor::resolve(Some(AccountId::new("user-7")));
    let mut store = MockCounterStore::new();
    store
        .expect_fetch_count()
        .withf(|key| key == "user-7")
        .return_once(|_| Ok(Some(9)));
    store
        .expect_store_count()
        .withf(|key, count| key == "user-7" && *count == 10)
        .return_once(|_, _| Ok(()));

    let mut gate = UsageGate::new(GateConfig::default());
    gate.initialize(&actor, &store).await;
    let flags = gate.increment_usage(&actor, &store).await;

    assert_eq!(gate.count(), 10);
    assert!(flags.requires_email);
    assert!(flags.requires_subscription);
}

#[tokio::test]
async fn test_increment_without_initialize_treats_count_as_zero() {
    let mut store = MockCounterStore::new();
    store
        .expect_store_count()
        .withf(|_, count| *count == 1)
        .return_once(|_, _| Ok(()));

    let mut gate = UsageGate::new(GateConfig::default());
    let flags = gate.increment_usage(&Actor::Anonymous, &store).await;

    assert_eq!(gate.count(), 1);
    assert!(!flags.requires_email);
}

#[tokio::test]
async fn test_custom_thresholds_shift_the_gates() {
    let config = GateConfig {
        email_threshold: 2,
        subscription_threshold: 3,
        ..GateConfig::default()
    };
    let mut store = MockCounterStore::new();
    store.expect_fetch_count().return_once(|_| Ok(Some(2)));

    let mut gate = UsageGate::new(config);
    let flags = gate.initialize(&Actor::Anonymous, &store).await;

    assert!(flags.requires_email);
    assert!(!flags.requires_subscription);
}
