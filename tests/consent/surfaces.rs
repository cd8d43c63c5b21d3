use std::sync::Arc;
use std::time::Duration;

use siteconsent::consent::{Category, ConsentPhase};
use siteconsent::surfaces::{Banner, ConsentSurface, PreferencePanel, SurfaceAction, SurfaceKind};

use crate::consent_harness::{Harness, RecordingLoader};

#[tokio::test]
async fn banner_visible_on_first_visit() {
    let harness = Harness::new();
    let banner = Banner::attach(Arc::clone(&harness.controller)).await;

    assert_eq!(harness.controller.phase(), ConsentPhase::Pending);
    let view = banner.view().expect("banner should render");
    assert_eq!(
        view.actions,
        vec![
            SurfaceAction::AcceptAll,
            SurfaceAction::EssentialOnly,
            SurfaceAction::Customize
        ]
    );
}

#[tokio::test]
async fn banner_hidden_for_returning_visitor() {
    let first = Harness::new();
    first.controller.essential_only().await;

    let next = first.reload();
    let banner = Banner::attach(Arc::clone(&next.controller)).await;
    assert!(!banner.is_open());
    assert!(banner.view().is_none());
}

#[tokio::test]
async fn banner_accept_all_closes_and_activates() {
    let harness = Harness::new();
    let mut banner = Banner::attach(Arc::clone(&harness.controller)).await;

    let outcome = banner.accept_all().await;

    assert!(outcome.persisted);
    assert!(!banner.is_open());
    harness.controller.settle_analytics().await;
    assert!(harness.controller.gateway().is_active());
    assert!(harness.store().load().unwrap().unwrap().is_accept_all());
}

#[tokio::test]
async fn preference_center_performance_only() {
    let harness = Harness::new();
    let banner = Banner::attach(Arc::clone(&harness.controller)).await;

    let mut panel = banner.customize().await;
    let view = panel.view().expect("panel should render when opened");
    let necessary = view
        .toggles
        .iter()
        .find(|t| t.category == Category::Necessary)
        .unwrap();
    assert!(necessary.enabled);
    assert!(!necessary.interactive);
    assert!(
        view.toggles
            .iter()
            .filter(|t| t.interactive)
            .all(|t| !t.enabled),
        "optional categories must start off"
    );

    assert!(!panel.set(Category::Necessary, false));
    panel.set(Category::Performance, true);
    panel.confirm().await;

    let stored = harness.store().load().unwrap().unwrap();
    assert!(stored.performance);
    assert!(!stored.functional);
    assert!(!stored.targeting);
    harness.controller.settle_analytics().await;
    assert!(harness.controller.gateway().is_active());
}

#[tokio::test]
async fn every_mounted_surface_converges_after_decision() {
    let harness = Harness::new();
    let mut banner = Banner::attach(Arc::clone(&harness.controller)).await;
    let mut side =
        PreferencePanel::attach(Arc::clone(&harness.controller), SurfaceKind::Panel).await;
    let mut modal =
        PreferencePanel::attach(Arc::clone(&harness.controller), SurfaceKind::Modal).await;

    side.open();
    side.set(Category::Functional, true);
    modal.open();
    modal.set(Category::Targeting, true);
    modal.confirm().await;

    banner.sync();
    side.sync();
    modal.sync();

    let surfaces: [&dyn ConsentSurface; 3] = [&banner, &side, &modal];
    assert!(surfaces.iter().all(|s| !s.is_open()));

    assert!(side.draft().get(Category::Targeting));
    assert!(!side.draft().get(Category::Functional));
    assert_eq!(side.draft(), modal.draft());
}

#[tokio::test]
async fn closing_preferences_leaves_banner_up() {
    let harness = Harness::new();
    let mut banner = Banner::attach(Arc::clone(&harness.controller)).await;
    let mut panel = banner.customize().await;

    panel.set(Category::Performance, true);
    panel.close();
    banner.sync();

    assert!(banner.is_open());
    assert!(harness.store().load().unwrap().is_none());
    harness.controller.settle_analytics().await;
    assert!(!harness.controller.gateway().is_active());
}

#[tokio::test]
async fn slow_tag_server_does_not_delay_surfaces() {
    let first = Harness::new();
    first.controller.accept_all().await;

    let slow = Harness::with_parts(
        Arc::clone(&first.storage),
        Arc::new(RecordingLoader::slow(Duration::from_secs(5))),
    );
    let limit = Duration::from_secs(1);

    let banner = tokio::time::timeout(limit, Banner::attach(Arc::clone(&slow.controller)))
        .await
        .expect("banner attach must not wait for the tag");
    assert!(!banner.is_open());

    let mut panel = tokio::time::timeout(
        limit,
        PreferencePanel::attach(Arc::clone(&slow.controller), SurfaceKind::Modal),
    )
    .await
    .expect("panel attach must not wait for the tag");
    panel.open();
    assert!(panel.draft().get(Category::Performance));

    let outcome = tokio::time::timeout(limit, panel.essential_only())
        .await
        .expect("decisions must not wait for the tag");
    assert!(outcome.persisted);
    assert!(!slow.controller.gateway().is_active());
}
