//! Overlay Lifecycle Tests
//!
//! Payload hand-off, occlusion, sort order, the back key, the loading
//! indicator, host failures and teardown.

use scene_core::test_utils::{Harness, HostCall};
use scene_stack::navigation::{Callback, Payload};
use scene_stack::{LoadMode, NavigationError, NavigatorConfig, ShieldState, SurfaceHandle};
use std::time::Duration;

/// The payload given to add reaches the target's on_active
#[tokio::test(start_paused = true)]
async fn test_payload_reaches_screen() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();

    let payload: Payload = std::sync::Arc::new(String::from("item-42"));
    nav.add_async("Detail", Some(payload), None, None)
        .await
        .unwrap();

    let detail = h.screen("Detail").unwrap();
    let received = detail.last_payload().unwrap();
    assert_eq!(received.downcast_ref::<String>().unwrap(), "item-42");

    // Main was activated without data.
    assert!(h.screen("Main").unwrap().last_payload().is_none());
}

/// Each stacked screen is layered at depth - 1
#[tokio::test(start_paused = true)]
async fn test_sort_order_follows_depth() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    nav.load_async("Main", None).await.unwrap();
    nav.add_async("First", None, None, None).await.unwrap();
    nav.add_async("Second", None, None, None).await.unwrap();

    assert_eq!(h.host.sort_order(SurfaceHandle(1)), Some(0));
    assert_eq!(h.host.sort_order(SurfaceHandle(2)), Some(1));
    assert_eq!(h.host.sort_order(SurfaceHandle(3)), Some(2));
    assert_eq!(nav.stack_names(), vec!["Main", "First", "Second"]);
}

/// A full-screen overlay hides the screen below until it closes
#[tokio::test(start_paused = true)]
async fn test_full_screen_overlay_occludes() {
    let h = Harness::new(NavigatorConfig::default());
    h.mark_full_screen("Gallery");
    let nav = &h.navigator;

    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Gallery", None, None, None).await.unwrap();
    assert_eq!(h.host.visibility(SurfaceHandle(1)), Some(false));

    let close = nav.close_async();
    // Restored before the exit animation starts.
    assert_eq!(h.host.visibility(SurfaceHandle(1)), Some(true));
    close.await.unwrap();

    assert_eq!(nav.stack_names(), vec!["Main"]);
}

/// A regular overlay never touches the visibility of the screen below
#[tokio::test(start_paused = true)]
async fn test_regular_overlay_keeps_lower_visible() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Popup", None, None, None).await.unwrap();
    nav.close_async().await.unwrap();

    assert_eq!(h.host.visibility(SurfaceHandle(1)), None);
}

/// The back key closes the top screen by default
#[tokio::test(start_paused = true)]
async fn test_key_back_closes_top() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Popup", None, None, None).await.unwrap();

    nav.key_back();
    assert!(nav.is_input_blocked());
    h.settle().await;

    assert_eq!(h.log.count("Popup:on_key_back"), 1);
    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert!(!nav.is_input_blocked());
}

/// A second back key during the exit does not close the screen twice
#[tokio::test(start_paused = true)]
async fn test_double_key_back_closes_once() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Popup", None, None, None).await.unwrap();

    nav.key_back();
    tokio::time::sleep(Duration::from_millis(50)).await;
    nav.key_back();

    // Still exiting: nothing popped, input still blocked.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(nav.stack_names(), vec!["Main", "Popup"]);
    assert!(nav.is_input_blocked());
    assert!(h.host.unloads().is_empty());

    h.settle().await;

    assert_eq!(h.log.count("Popup:on_key_back"), 2);
    assert_eq!(h.log.count("Popup:on_hidden"), 1);
    assert_eq!(h.log.count("Main:on_refocus"), 1);
    assert_eq!(h.host.unloads(), vec![SurfaceHandle(2)]);
    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert!(!nav.is_input_blocked());
}

/// Closing twice from three screens closes the top two in order
#[tokio::test(start_paused = true)]
async fn test_close_twice_closes_two_screens() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();
    nav.add_async("First", None, None, None).await.unwrap();
    nav.add_async("Second", None, None, None).await.unwrap();

    nav.close_async().await.unwrap();
    nav.close_async().await.unwrap();

    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert_eq!(h.log.count("First:on_refocus"), 1);
    assert_eq!(h.log.count("Main:on_refocus"), 1);
    assert!(!nav.is_input_blocked());
}

/// The back key on an empty stack is ignored
#[tokio::test(start_paused = true)]
async fn test_key_back_on_empty_stack() {
    let h = Harness::new(NavigatorConfig::default());
    h.navigator.key_back();
    h.settle().await;

    assert!(h.log.events().is_empty());
    assert!(h.host.calls().is_empty());
}

/// The first additive screen on an empty stack becomes main and fades in
#[tokio::test(start_paused = true)]
async fn test_first_additive_screen_becomes_main() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    nav.add_async("Hud", None, None, None).await.unwrap();

    assert_eq!(nav.main_screen().as_deref(), Some("Hud"));
    assert_eq!(nav.shield_state(), ShieldState::Off);
    assert_eq!(h.log.events(), vec!["Hud:on_active", "Hud:on_shown"]);
}

/// Overlay callbacks fire around the screen hooks
#[tokio::test(start_paused = true)]
async fn test_overlay_callbacks_order() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();
    h.log.clear();

    let shown_log = h.log.clone();
    let hidden_log = h.log.clone();
    let on_shown: Callback = Box::new(move || shown_log.push("callback:shown"));
    let on_hidden: Callback = Box::new(move || hidden_log.push("callback:hidden"));
    nav.add_async("Popup", None, Some(on_shown), Some(on_hidden))
        .await
        .unwrap();
    nav.close_async().await.unwrap();

    assert_eq!(
        h.log.events(),
        vec![
            "Popup:on_active",
            "Popup:on_shown",
            "callback:shown",
            "Popup:on_hidden",
            "callback:hidden",
            "Main:on_refocus",
        ]
    );
}

/// A host that cannot load the target leaves input unblocked
#[tokio::test(start_paused = true)]
async fn test_host_failure_releases_shield() {
    let h = Harness::new(NavigatorConfig::default());
    h.host.fail_loads_of("Broken");
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();

    let err = nav
        .add_async("Broken", None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, NavigationError::Host(_)));
    assert!(!nav.is_input_blocked());
    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert_eq!(nav.queued_requests(), 0);

    let err = nav.load_async("Broken", None).await.unwrap_err();
    assert!(matches!(err, NavigationError::Host(_)));
    assert_eq!(nav.shield_state(), ShieldState::Off);
    assert!(nav.can_navigate());
}

/// The loading indicator stays off the stack and toggles input blocking
#[tokio::test(start_paused = true)]
async fn test_loading_indicator() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    assert!(matches!(
        nav.loading_animation(true),
        Err(NavigationError::MissingCollaborator(_))
    ));

    nav.set_loading_screen("Spinner").await.unwrap();
    nav.load_async("Main", None).await.unwrap();

    // Spinner took surface 1, Main surface 2.
    assert_eq!(h.host.sort_order(SurfaceHandle(1)), Some(98));
    assert_eq!(h.host.visibility(SurfaceHandle(1)), Some(false));
    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert!(h.log.events().iter().all(|e| !e.starts_with("Spinner:")));

    nav.loading_animation(true).unwrap();
    assert!(nav.is_loading());
    assert!(nav.is_input_blocked());
    assert_eq!(h.host.visibility(SurfaceHandle(1)), Some(true));

    nav.loading_animation(false).unwrap();
    assert!(!nav.is_input_blocked());
}

/// Teardown during a load abandons it and releases the shield
#[tokio::test(start_paused = true)]
async fn test_teardown_during_load() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = h.navigator.clone();

    let load = tokio::spawn(nav.load_async("Main", None));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(nav.shield_state(), ShieldState::FadingOut);

    nav.teardown();

    assert!(matches!(load.await.unwrap(), Err(NavigationError::Abandoned)));
    h.settle().await;

    assert_eq!(nav.depth(), 0);
    assert!(!nav.is_input_blocked());
    assert!(h.host.loads().is_empty());
}

/// Loads are requested from the host with the right mode
#[tokio::test(start_paused = true)]
async fn test_host_sees_load_modes() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Popup", None, None, None).await.unwrap();

    let loads: Vec<HostCall> = h
        .host
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HostCall::Load { .. }))
        .collect();
    assert_eq!(
        loads,
        vec![
            HostCall::Load {
                name: "Main".into(),
                mode: LoadMode::Replace
            },
            HostCall::Load {
                name: "Popup".into(),
                mode: LoadMode::Additive
            },
        ]
    );
}
