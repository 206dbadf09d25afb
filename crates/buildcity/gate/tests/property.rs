//! Property tests: the gate decides at most once, whatever the host sends.

use std::sync::Arc;

use buildcity_gate::{
    EscapeToApp, FallbackPolicy, GateConfig, GateEffect, GateEvent, GateResolver, GateState,
    RetryThenEscape, StayOnLoader, TimerId,
};
use proptest::prelude::*;

const ENTRY: &str = "https://gate.example/app";

#[derive(Clone, Debug)]
enum Input {
    Event(GateEvent),
    /// Fire the currently armed timer, if any
    FireArmed,
    /// Fire an arbitrary (usually stale) timer id
    FireStale(u64),
    Unmount,
}

fn arb_url() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(Some(ENTRY.to_string())),
        Just(Some("HTTPS://GATE.EXAMPLE/APP/".to_string())),
        Just(Some("http://empty".to_string())),
        Just(Some(" HTTP://EMPTY/ ".to_string())),
        Just(Some("https://example.com/offer".to_string())),
        Just(Some("https://tracker.example/hop?id=7".to_string())),
        Just(None),
        Just(Some(String::new())),
    ]
}

fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        4 => (arb_url(), any::<bool>())
            .prop_map(|(url, is_loading)| Input::Event(GateEvent::Navigation { url, is_loading })),
        1 => arb_url().prop_map(|url| Input::Event(GateEvent::LoadStarted { url })),
        1 => (-20i32..0).prop_map(|code| Input::Event(GateEvent::LoadError {
            code,
            description: "net::ERR".into(),
        })),
        1 => (400u16..600).prop_map(|status| Input::Event(GateEvent::HttpError { status, url: None })),
        2 => Just(Input::FireArmed),
        1 => (0u64..8).prop_map(Input::FireStale),
        1 => Just(Input::Unmount),
    ]
}

#[derive(Clone, Copy, Debug)]
enum PolicyKind {
    Stay,
    Escape,
    Retry(u32),
}

impl PolicyKind {
    fn build(self) -> Arc<dyn FallbackPolicy> {
        match self {
            PolicyKind::Stay => Arc::new(StayOnLoader),
            PolicyKind::Escape => Arc::new(EscapeToApp),
            PolicyKind::Retry(n) => Arc::new(RetryThenEscape::new(n)),
        }
    }
}

fn arb_policy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![
        Just(PolicyKind::Stay),
        Just(PolicyKind::Escape),
        (0u32..3).prop_map(PolicyKind::Retry),
    ]
}

fn arb_cache() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("http://empty/".to_string())),
        Just(Some("https://example.com/cached".to_string())),
    ]
}

proptest! {
    /// `handled` flips at most once and only that flip may touch the cache.
    #[test]
    fn decision_happens_at_most_once(
        policy in arb_policy(),
        cached in arb_cache(),
        inputs in prop::collection::vec(arb_input(), 0..40),
    ) {
        let config = GateConfig { entry_url: ENTRY.into(), ..Default::default() };
        let resolver = GateResolver::with_policy(config, policy.build()).unwrap();

        let start = resolver.start(GateState::new(), cached.as_deref());
        let mut flips = usize::from(start.state.handled());
        let mut cache_writes = start.effects.iter().filter(|e| e.touches_cache()).count();
        let mut state = start.state;

        for input in inputs {
            let before = state.clone();
            let transition = match input {
                Input::Event(event) => resolver.handle(state, event),
                Input::FireArmed => match before.armed_timer() {
                    Some(id) => resolver.timer_fired(state, id),
                    None => resolver.timer_fired(state, TimerId(u64::MAX)),
                },
                Input::FireStale(id) => resolver.timer_fired(state, TimerId(id)),
                Input::Unmount => resolver.unmount(state),
            };

            let touched = transition.effects.iter().filter(|e| e.touches_cache()).count();
            if before.handled() || !before.mounted() {
                // decided or torn down: phase and cache are frozen
                prop_assert_eq!(transition.state.phase(), before.phase());
                prop_assert_eq!(touched, 0);
                prop_assert!(!transition.effects.iter().any(|e| matches!(e, GateEffect::RouteIntoApp)));
            }
            if !before.mounted() {
                prop_assert_eq!(&transition.state, &before);
                prop_assert!(transition.effects.is_empty());
            }
            if !before.handled() && transition.state.handled() {
                flips += 1;
            }
            prop_assert!(!(before.handled() && !transition.state.handled()));

            cache_writes += touched;
            state = transition.state;
        }

        prop_assert!(flips <= 1);
        prop_assert!(cache_writes <= 1);
        if state.handled() {
            prop_assert!(state.phase().is_terminal());
        }
    }

    /// Entry-URL noise alone never decides the gate.
    #[test]
    fn entry_url_noise_never_decides(
        variants in prop::collection::vec(
            prop_oneof![
                Just(ENTRY),
                Just("https://gate.example/app/"),
                Just("  HTTPS://Gate.Example/App "),
            ],
            1..20,
        ),
    ) {
        let config = GateConfig { entry_url: ENTRY.into(), ..Default::default() };
        let resolver = GateResolver::new(config).unwrap();
        let mut state = resolver.start(GateState::new(), None).state;

        for url in variants {
            let transition = resolver.handle(state, GateEvent::navigation(url, false));
            prop_assert!(transition.effects.is_empty());
            state = transition.state;
        }

        prop_assert!(!state.handled());
        prop_assert_eq!(state.phase(), buildcity_gate::GatePhase::AwaitingRedirect);
    }
}
