use std::sync::Arc;

use siteconsent::consent::{Category, ConsentChoice, ConsentPhase, normalize};

use crate::consent_harness::{Harness, RecordingLoader, UnavailableStorage};

#[tokio::test]
async fn fresh_session_shows_banner_without_analytics() {
    let harness = Harness::new();

    assert_eq!(harness.controller.phase(), ConsentPhase::Unknown);
    assert_eq!(harness.controller.mount().await, ConsentPhase::Pending);
    assert!(harness.controller.banner_visible());
    harness.controller.settle_analytics().await;
    assert!(!harness.controller.gateway().is_active());
    assert_eq!(harness.loader.injections(), 0);
}

#[tokio::test]
async fn accept_all_stores_all_true_and_activates() {
    let harness = Harness::new();
    harness.controller.mount().await;

    harness.controller.accept_all().await;

    assert_eq!(harness.controller.phase(), ConsentPhase::Decided);
    assert!(!harness.controller.banner_visible());
    harness.controller.settle_analytics().await;
    assert!(harness.controller.gateway().is_active());

    let stored = harness.store().load().unwrap().unwrap();
    assert!(stored.necessary && stored.performance && stored.functional && stored.targeting);
}

#[tokio::test]
async fn essential_only_stores_all_optional_false() {
    let harness = Harness::new();
    harness.controller.mount().await;

    harness.controller.essential_only().await;

    let stored = harness.store().load().unwrap().unwrap();
    assert!(stored.same_preferences(&normalize(&ConsentChoice::essential_only())));
    assert!(stored.necessary);
    harness.controller.settle_analytics().await;
    assert!(!harness.controller.gateway().is_active());
    assert_eq!(harness.loader.injections(), 0);
}

#[tokio::test]
async fn custom_performance_only_activates_analytics() {
    let harness = Harness::new();
    harness.controller.mount().await;

    harness.controller.open_preferences();
    let draft = ConsentChoice::default().with(Category::Performance, true);
    harness.controller.confirm_custom(&draft).await;

    let stored = harness.store().load().unwrap().unwrap();
    assert!(stored.performance);
    assert!(!stored.functional);
    assert!(!stored.targeting);
    harness.controller.settle_analytics().await;
    assert!(harness.controller.gateway().is_active());
}

#[tokio::test]
async fn necessary_false_in_choice_is_ignored() {
    let harness = Harness::new();
    let choice = ConsentChoice::default().with(Category::Necessary, false);

    let outcome = harness.controller.confirm_custom(&choice).await;

    assert!(outcome.record.necessary);
    assert!(harness.store().load().unwrap().unwrap().necessary);
}

#[tokio::test]
async fn gateway_invoked_only_when_performance_granted() {
    for (performance, functional, targeting) in [
        (false, false, false),
        (false, true, true),
        (true, false, false),
        (true, true, true),
    ] {
        let harness = Harness::new();
        let choice = ConsentChoice::default()
            .with(Category::Performance, performance)
            .with(Category::Functional, functional)
            .with(Category::Targeting, targeting);

        let outcome = harness.controller.confirm_custom(&choice).await;

        assert_eq!(outcome.analytics_requested, performance);
        harness.controller.settle_analytics().await;
        assert_eq!(harness.loader.injections(), usize::from(performance));
    }
}

#[tokio::test]
async fn repeated_accepts_inject_once() {
    let harness = Harness::new();
    harness.controller.accept_all().await;
    harness.controller.essential_only().await;
    harness.controller.accept_all().await;

    harness.controller.settle_analytics().await;
    assert_eq!(harness.loader.injections(), 1);
}

#[tokio::test]
async fn stored_permission_replays_on_next_start() {
    let first = Harness::new();
    first.controller.accept_all().await;

    let next = first.reload();
    assert_eq!(next.controller.mount().await, ConsentPhase::Decided);
    assert!(!next.controller.banner_visible());
    next.controller.settle_analytics().await;
    assert!(next.controller.gateway().is_active());
    assert_eq!(next.loader.injections(), 1);
}

#[tokio::test]
async fn revocation_takes_effect_on_next_start() {
    let first = Harness::new();
    first.controller.accept_all().await;
    first.controller.essential_only().await;
    // No runtime deactivation: the tag stays loaded for this session.
    first.controller.settle_analytics().await;
    assert!(first.controller.gateway().is_active());

    let next = first.reload();
    next.controller.mount().await;
    next.controller.settle_analytics().await;
    assert!(!next.controller.gateway().is_active());
    assert_eq!(next.loader.injections(), 0);
}

#[tokio::test]
async fn unavailable_storage_falls_back_to_pending() {
    let harness = Harness::with_storage(Arc::new(UnavailableStorage));

    assert_eq!(harness.controller.mount().await, ConsentPhase::Pending);
    assert!(harness.controller.banner_visible());
    harness.controller.settle_analytics().await;
    assert!(!harness.controller.gateway().is_active());
}

#[tokio::test]
async fn unavailable_storage_keeps_decision_for_session_only() {
    let harness = Harness::with_storage(Arc::new(UnavailableStorage));
    let mut rx = harness.controller.subscribe();

    let outcome = harness.controller.accept_all().await;

    assert!(!outcome.persisted);
    assert_eq!(harness.controller.phase(), ConsentPhase::Decided);
    harness.controller.settle_analytics().await;
    assert!(harness.controller.gateway().is_active());
    assert!(rx.try_recv().is_err(), "failed writes are not broadcast");

    let next = harness.reload();
    assert_eq!(next.controller.mount().await, ConsentPhase::Pending);
}

#[tokio::test]
async fn failed_tag_load_retries_on_later_decision() {
    let loader = Arc::new(RecordingLoader::failing());
    let harness = Harness::with_parts(
        Arc::new(siteconsent::consent::InMemoryStorage::new()),
        Arc::clone(&loader),
    );

    harness.controller.accept_all().await;
    harness.controller.settle_analytics().await;
    assert!(!harness.controller.gateway().is_active());
    assert_eq!(harness.controller.phase(), ConsentPhase::Decided);

    loader.set_failing(false);
    let draft = ConsentChoice::default().with(Category::Performance, true);
    harness.controller.confirm_custom(&draft).await;

    harness.controller.settle_analytics().await;
    assert!(harness.controller.gateway().is_active());
    assert_eq!(loader.injections(), 1);
}
