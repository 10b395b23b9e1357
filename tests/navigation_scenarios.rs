//! Navigation Scenario Tests
//!
//! End-to-end flows through the navigator, a scripted host and recording
//! screens, on a paused tokio clock.

use scene_core::test_utils::Harness;
use scene_stack::navigation::Callback;
use scene_stack::state::ShieldEvent;
use scene_stack::{NavigatorConfig, ShieldState, SurfaceHandle};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Load from nothing: fade out, stack [Main], fade in, shown once
#[tokio::test(start_paused = true)]
async fn test_load_from_nothing() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    let mut events = nav.shield().subscribe_events();

    nav.load_async("Main", None).await.unwrap();

    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert_eq!(nav.main_screen().as_deref(), Some("Main"));
    assert_eq!(h.log.events(), vec!["Main:on_active", "Main:on_shown"]);
    assert_eq!(h.log.count("Main:on_shown"), 1);
    assert_eq!(h.host.loads(), vec!["Main"]);
    assert_eq!(nav.shield_state(), ShieldState::Off);
    assert!(!nav.is_input_blocked());
    assert_eq!(nav.pending_target(), None);

    let expected = [
        (ShieldState::Off, ShieldState::FadingOut),
        (ShieldState::FadingOut, ShieldState::Loading),
        (ShieldState::Loading, ShieldState::FadingIn),
        (ShieldState::FadingIn, ShieldState::Off),
    ];
    for (from, to) in expected {
        assert_eq!(
            events.recv().await.unwrap(),
            ShieldEvent::StateChanged { from, to }
        );
    }
}

/// A second load during the first one's fade is rejected
#[tokio::test(start_paused = true)]
async fn test_load_during_fade_is_rejected() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    nav.load("A", None);
    assert!(!nav.can_navigate());
    assert_eq!(nav.pending_target().as_deref(), Some("A"));

    let err = nav.load_async("B", None).await.unwrap_err();
    assert!(err.is_rejected());

    // The fire-and-forget form is rejected the same way.
    nav.load("B", None);

    h.settle().await;

    assert_eq!(nav.stack_names(), vec!["A"]);
    assert_eq!(h.host.loads(), vec!["A"]);
    assert!(h.log.events().iter().all(|e| !e.starts_with("B:")));
    assert!(nav.can_navigate());
}

/// Adding an overlay blocks input at once and unblocks after on_shown
#[tokio::test(start_paused = true)]
async fn test_add_overlay() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = h.navigator.clone();
    nav.load_async("Main", None).await.unwrap();
    h.log.clear();

    let blocked_when_shown = Arc::new(AtomicBool::new(false));
    let on_shown: Callback = {
        let log = h.log.clone();
        let nav = nav.clone();
        let flag = Arc::clone(&blocked_when_shown);
        Box::new(move || {
            flag.store(nav.is_input_blocked(), Ordering::SeqCst);
            log.push("Popup:callback_shown");
        })
    };

    let add = tokio::spawn(nav.add_async("Popup", None, Some(on_shown), None));
    assert!(nav.is_input_blocked());
    assert_eq!(nav.shield_state(), ShieldState::On);

    // Activated after 20ms; the 300ms enter is still running.
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(nav.stack_names(), vec!["Main", "Popup"]);
    assert!(nav.is_input_blocked());
    assert_eq!(h.log.count("Popup:on_shown"), 0);

    add.await.unwrap().unwrap();

    assert_eq!(
        h.log.events(),
        vec!["Popup:on_active", "Popup:on_shown", "Popup:callback_shown"]
    );
    assert!(blocked_when_shown.load(Ordering::SeqCst));
    assert!(!nav.is_input_blocked());
    assert_eq!(nav.shield_state(), ShieldState::Off);
    assert_eq!(nav.top_screen().as_deref(), Some("Popup"));
}

/// Closing the overlay: exit, hidden, unload, pop, refocus, unblock
#[tokio::test(start_paused = true)]
async fn test_close_overlay() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = h.navigator.clone();
    nav.load_async("Main", None).await.unwrap();

    let unloaded_before_hidden = Arc::new(AtomicBool::new(true));
    let on_hidden: Callback = {
        let host = Arc::clone(&h.host);
        let flag = Arc::clone(&unloaded_before_hidden);
        Box::new(move || flag.store(!host.unloads().is_empty(), Ordering::SeqCst))
    };
    nav.add_async("Popup", None, None, Some(on_hidden))
        .await
        .unwrap();
    h.log.clear();

    let close = nav.close_async();
    assert!(nav.is_input_blocked());
    close.await.unwrap();

    assert_eq!(h.log.events(), vec!["Popup:on_hidden", "Main:on_refocus"]);
    assert!(!unloaded_before_hidden.load(Ordering::SeqCst));
    assert_eq!(h.host.unloads(), vec![SurfaceHandle(2)]);
    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert!(!nav.is_input_blocked());
    assert_eq!(nav.shield_state(), ShieldState::Off);
}

/// Rapid add, close, add never leaves input blocked
#[tokio::test(start_paused = true)]
async fn test_rapid_add_close_add() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();

    nav.add("P1", None, None, None);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(nav.top_screen().as_deref(), Some("P1"));

    let blocked_when_shown = Arc::new(AtomicBool::new(false));
    let on_shown: Callback = {
        let nav = nav.clone();
        let flag = Arc::clone(&blocked_when_shown);
        Box::new(move || flag.store(nav.is_input_blocked(), Ordering::SeqCst))
    };

    nav.close();
    nav.add("P2", None, Some(on_shown), None);

    h.settle().await;

    assert!(!nav.is_input_blocked());
    assert_eq!(nav.shield_state(), ShieldState::Off);
    assert_eq!(nav.stack_names(), vec!["Main", "P2"]);
    assert_eq!(h.log.count("P1:on_shown"), 0);
    assert_eq!(h.log.count("P1:on_hidden"), 1);
    assert_eq!(h.log.count("P2:on_shown"), 1);

    // P1 was never the top once P2 arrived, so nothing regains focus, and
    // closing P1 must not unblock input under P2's enter.
    assert_eq!(h.log.count("P2:on_refocus"), 0);
    assert_eq!(h.log.count("Main:on_refocus"), 0);
    assert!(blocked_when_shown.load(Ordering::SeqCst));
}

/// Push then pop restores the stack and the shield
#[tokio::test(start_paused = true)]
async fn test_push_pop_round_trip() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();

    let before = nav.stack_names();
    nav.add_async("Popup", None, None, None).await.unwrap();
    assert_eq!(nav.depth(), 2);
    nav.close_async().await.unwrap();

    assert_eq!(nav.stack_names(), before);
    assert_eq!(nav.shield_state(), ShieldState::Off);
}

/// Closing with nothing on the stack does nothing
#[tokio::test(start_paused = true)]
async fn test_close_empty_stack() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;

    nav.close_async().await.unwrap();
    nav.close();
    h.settle().await;

    assert_eq!(nav.depth(), 0);
    assert!(h.host.calls().is_empty());
    assert!(h.log.events().is_empty());
    assert_eq!(nav.shield_state(), ShieldState::Off);
}

/// A full load replaces every overlay and hides the old main screen
#[tokio::test(start_paused = true)]
async fn test_load_replaces_stack() {
    let h = Harness::new(NavigatorConfig::default());
    let nav = &h.navigator;
    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Popup", None, None, None).await.unwrap();
    h.log.clear();

    nav.load_async("Other", None).await.unwrap();

    assert_eq!(nav.stack_names(), vec!["Other"]);
    assert_eq!(nav.main_screen().as_deref(), Some("Other"));
    assert_eq!(
        h.log.events(),
        vec!["Main:on_hidden", "Other:on_active", "Other:on_shown"]
    );
}

/// Zero durations from a config file make every navigation instant
#[tokio::test(start_paused = true)]
async fn test_config_file_zero_durations() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "fadeDurationSecs": 0, "transitionDurationSecs": 0 }}"#
    )
    .unwrap();

    let config = NavigatorConfig::from_file(file.path()).await.unwrap();
    let h = Harness::with_latency(config, Duration::ZERO);
    let nav = &h.navigator;

    let started = Instant::now();
    nav.load_async("Main", None).await.unwrap();
    nav.add_async("Popup", None, None, None).await.unwrap();
    nav.close_async().await.unwrap();

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(nav.stack_names(), vec!["Main"]);
    assert!(!nav.is_input_blocked());
}
