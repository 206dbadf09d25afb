use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::error::GateError;
use crate::event::{GateEffect, GateEvent};
use crate::policy::{FallbackAction, FallbackPolicy, StayOnLoader};
use crate::state::{GatePhase, GateState, TimerId, WebViewError};
use crate::url::normalize_url;

/// Result of feeding one input to the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: GateState,
    pub effects: Vec<GateEffect>,
}

impl Transition {
    fn new(state: GateState, effects: Vec<GateEffect>) -> Self {
        Self { state, effects }
    }

    fn unchanged(state: GateState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// True when no effect was requested.
    pub fn is_quiet(&self) -> bool {
        self.effects.is_empty()
    }
}

/// The gate state machine.
///
/// Pure: every operation takes a [`GateState`] by value and hands back the
/// next state plus the effects the host must perform. Nothing here blocks
/// or touches I/O.
pub struct GateResolver {
    config: GateConfig,
    policy: Arc<dyn FallbackPolicy>,
    entry_key: String,
    sentinel_key: String,
}

impl GateResolver {
    /// Resolver with the default [`StayOnLoader`] fallback.
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        Self::with_policy(config, Arc::new(StayOnLoader))
    }

    pub fn with_policy(
        config: GateConfig,
        policy: Arc<dyn FallbackPolicy>,
    ) -> Result<Self, GateError> {
        config.validate()?;
        Ok(Self {
            entry_key: normalize_url(Some(config.entry_url.as_str())),
            sentinel_key: normalize_url(Some(config.empty_redirect.as_str())),
            config,
            policy,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Whether `url` is the empty-redirect sentinel.
    pub fn is_empty_redirect(&self, url: &str) -> bool {
        normalize_url(Some(url)) == self.sentinel_key
    }

    /// Whether `url` is still the entry URL.
    pub fn is_entry_url(&self, url: &str) -> bool {
        normalize_url(Some(url)) == self.entry_key
    }

    /// Leave `Uninitialized` using the cached URL read at startup.
    ///
    /// A usable cache resolves immediately without loading the entry URL.
    pub fn start(&self, mut state: GateState, cached_url: Option<&str>) -> Transition {
        if !state.mounted || state.phase != GatePhase::Uninitialized {
            debug!(phase = %state.phase, "Gate already started, ignoring start");
            return Transition::unchanged(state);
        }

        let usable = cached_url.filter(|url| {
            !normalize_url(Some(*url)).is_empty() && !self.is_empty_redirect(url)
        });

        if let Some(url) = usable {
            info!(url = %url, "Loading cached gate URL");
            state.phase = GatePhase::Resolved;
            state.handled = true;
            state.current_url = Some(url.to_string());
            return Transition::new(
                state,
                vec![GateEffect::LoadUrl {
                    url: url.to_string(),
                    visible: true,
                }],
            );
        }

        info!(entry_url = %self.config.entry_url, "Starting fresh with gate URL");
        state.phase = GatePhase::LoadingGate;
        state.handled = false;
        state.current_url = Some(self.config.entry_url.clone());
        state.page_loading = true;
        let timer = state.arm_timer();

        Transition::new(
            state,
            vec![
                GateEffect::LoadUrl {
                    url: self.config.entry_url.clone(),
                    visible: false,
                },
                GateEffect::ArmTimer {
                    timer,
                    after: self.config.redirect_timeout,
                },
            ],
        )
    }

    /// Feed one web-view event.
    pub fn handle(&self, mut state: GateState, event: GateEvent) -> Transition {
        if !state.mounted {
            debug!("Component unmounted, ignoring event");
            return Transition::unchanged(state);
        }
        if state.phase == GatePhase::Uninitialized {
            debug!("Gate not started, ignoring event");
            return Transition::unchanged(state);
        }

        match event {
            GateEvent::LoadStarted { url } => {
                debug!(url = ?url, "WebView started loading");
                if !state.handled && state.phase == GatePhase::LoadingGate {
                    state.phase = GatePhase::AwaitingRedirect;
                }
                Transition::unchanged(state)
            }
            GateEvent::Navigation { url, is_loading } => {
                self.on_navigation(state, url, is_loading)
            }
            event @ (GateEvent::LoadError { .. } | GateEvent::HttpError { .. }) => {
                match event.as_error() {
                    Some(error) => self.on_error(state, error),
                    None => Transition::unchanged(state),
                }
            }
        }
    }

    /// The timer `timer` elapsed. Stale or cancelled timers are ignored.
    pub fn timer_fired(&self, mut state: GateState, timer: TimerId) -> Transition {
        if !state.mounted || state.handled || state.timer != Some(timer) {
            debug!(timer = %timer, "Ignoring stale redirect timer");
            return Transition::unchanged(state);
        }

        state.timer = None;
        state.timed_out = true;
        let action = self.policy.on_timeout(&state);
        warn!(
            timer = %timer,
            policy = self.policy.name(),
            action = ?action,
            "TIMEOUT - Redirect took too long"
        );
        self.apply_fallback(state, action, Vec::new())
    }

    /// Tear down: cancel the timer and refuse every later input.
    pub fn unmount(&self, mut state: GateState) -> Transition {
        if !state.mounted {
            return Transition::unchanged(state);
        }
        state.mounted = false;
        let effects = state
            .timer
            .take()
            .map(|timer| vec![GateEffect::CancelTimer { timer }])
            .unwrap_or_default();
        debug!(phase = %state.phase, "Gate unmounted");
        Transition::new(state, effects)
    }

    fn on_navigation(
        &self,
        mut state: GateState,
        url: Option<String>,
        is_loading: bool,
    ) -> Transition {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            debug!("No URL in navigation state");
            return Transition::unchanged(state);
        };

        debug!(
            url = %url,
            loading = is_loading,
            handled = state.handled,
            "Navigation state change"
        );

        if state.handled {
            state.page_loading = false;
            debug!(url = %url, "Gate already handled, ignoring navigation");
            return Transition::unchanged(state);
        }

        if state.phase == GatePhase::LoadingGate {
            state.phase = GatePhase::AwaitingRedirect;
        }

        if is_loading {
            let mut effects = Vec::with_capacity(2);
            if let Some(timer) = state.timer.take() {
                effects.push(GateEffect::CancelTimer { timer });
            }
            let timer = state.arm_timer();
            effects.push(GateEffect::ArmTimer {
                timer,
                after: self.config.redirect_timeout,
            });
            debug!(url = %url, timer = %timer, "Navigation loading, redirect timer re-armed");
            return Transition::new(state, effects);
        }

        if self.is_entry_url(&url) {
            debug!("Still on gate URL, waiting for redirect");
            return Transition::unchanged(state);
        }

        info!(url = %url, "First redirect detected");
        if self.is_empty_redirect(&url) {
            info!("Empty redirect detected, routing into app");
            self.escape(state, Vec::new())
        } else {
            info!(url = %url, "Valid redirect, showing website");
            self.resolve(state, url)
        }
    }

    fn on_error(&self, mut state: GateState, error: WebViewError) -> Transition {
        state.page_loading = false;

        if state.handled {
            warn!(error = %error, "WebView error after gate decision");
            return Transition::unchanged(state);
        }

        warn!(
            error = %error,
            url = ?state.current_url,
            "WebView error while gate unresolved"
        );
        let action = self.policy.on_load_error(&state, &error);
        state.last_error = Some(error);
        self.apply_fallback(state, action, Vec::new())
    }

    fn apply_fallback(
        &self,
        mut state: GateState,
        action: FallbackAction,
        mut effects: Vec<GateEffect>,
    ) -> Transition {
        match action {
            FallbackAction::KeepWaiting => Transition::new(state, effects),
            FallbackAction::Reload => {
                state.reloads += 1;
                state.phase = GatePhase::LoadingGate;
                state.current_url = Some(self.config.entry_url.clone());
                state.page_loading = true;
                if let Some(timer) = state.timer.take() {
                    effects.push(GateEffect::CancelTimer { timer });
                }
                let timer = state.arm_timer();
                info!(attempt = state.reloads, "Reloading gate URL");
                effects.push(GateEffect::LoadUrl {
                    url: self.config.entry_url.clone(),
                    visible: false,
                });
                effects.push(GateEffect::ArmTimer {
                    timer,
                    after: self.config.redirect_timeout,
                });
                Transition::new(state, effects)
            }
            FallbackAction::Escape => {
                info!(policy = self.policy.name(), "Fallback escaping gate");
                self.escape(state, effects)
            }
        }
    }

    fn escape(&self, mut state: GateState, mut effects: Vec<GateEffect>) -> Transition {
        if let Some(timer) = state.timer.take() {
            effects.push(GateEffect::CancelTimer { timer });
        }
        state.handled = true;
        state.phase = GatePhase::Escaped;
        state.current_url = None;
        state.page_loading = false;
        effects.extend([
            GateEffect::RemoveCache,
            GateEffect::HideWebView,
            GateEffect::RouteIntoApp,
        ]);
        Transition::new(state, effects)
    }

    fn resolve(&self, mut state: GateState, url: String) -> Transition {
        let mut effects = Vec::with_capacity(3);
        if let Some(timer) = state.timer.take() {
            effects.push(GateEffect::CancelTimer { timer });
        }
        state.handled = true;
        state.phase = GatePhase::Resolved;
        state.current_url = Some(url.clone());
        state.page_loading = false;
        effects.push(GateEffect::PersistCache { url: url.clone() });
        effects.push(GateEffect::Reveal { url });
        Transition::new(state, effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{EscapeToApp, RetryThenEscape};
    use crate::state::GateView;
    use std::time::Duration;

    const ENTRY: &str = "https://gate.example/app";

    fn config() -> GateConfig {
        GateConfig {
            entry_url: ENTRY.into(),
            redirect_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }

    fn resolver() -> GateResolver {
        GateResolver::new(config()).unwrap()
    }

    fn started(resolver: &GateResolver) -> GateState {
        resolver.start(GateState::new(), None).state
    }

    #[test]
    fn cached_url_resolves_without_entry_load() {
        let r = resolver();
        let t = r.start(GateState::new(), Some("https://example.com/offer"));

        assert_eq!(t.state.phase(), GatePhase::Resolved);
        assert!(t.state.handled());
        assert_eq!(
            t.effects,
            vec![GateEffect::LoadUrl {
                url: "https://example.com/offer".into(),
                visible: true
            }]
        );
        assert!(t.state.armed_timer().is_none());
    }

    #[test]
    fn cached_sentinel_is_ignored() {
        let r = resolver();
        let t = r.start(GateState::new(), Some("HTTP://EMPTY/"));

        assert_eq!(t.state.phase(), GatePhase::LoadingGate);
        assert!(!t.state.handled());
        assert!(matches!(
            &t.effects[..],
            [GateEffect::LoadUrl { url, visible: false }, GateEffect::ArmTimer { .. }] if url == ENTRY
        ));
    }

    #[test]
    fn blank_cache_starts_fresh() {
        let r = resolver();
        let t = r.start(GateState::new(), Some("   "));
        assert_eq!(t.state.phase(), GatePhase::LoadingGate);
    }

    #[test]
    fn empty_redirect_escapes_and_clears_cache() {
        let r = resolver();
        let state = started(&r);
        let timer = state.armed_timer().unwrap();

        let t = r.handle(state, GateEvent::navigation("HTTP://EMPTY/", false));

        assert_eq!(t.state.phase(), GatePhase::Escaped);
        assert!(t.state.handled());
        assert_eq!(
            t.effects,
            vec![
                GateEffect::CancelTimer { timer },
                GateEffect::RemoveCache,
                GateEffect::HideWebView,
                GateEffect::RouteIntoApp,
            ]
        );
        assert_eq!(t.state.view(), GateView::Loader);
    }

    #[test]
    fn valid_redirect_resolves_and_persists() {
        let r = resolver();
        let state = started(&r);

        let t = r.handle(state, GateEvent::navigation("https://example.com/offer", false));

        assert_eq!(t.state.phase(), GatePhase::Resolved);
        assert_eq!(t.state.current_url(), Some("https://example.com/offer"));
        assert!(t.effects.contains(&GateEffect::PersistCache {
            url: "https://example.com/offer".into()
        }));
        assert_eq!(
            t.state.view(),
            GateView::Page {
                url: "https://example.com/offer".into(),
                hidden: false,
                overlay: false,
            }
        );
    }

    #[test]
    fn entry_url_events_keep_waiting() {
        let r = resolver();
        let mut state = started(&r);

        for url in [ENTRY, "https://GATE.example/app/", " https://gate.example/app "] {
            let t = r.handle(state, GateEvent::navigation(url, false));
            assert!(t.is_quiet());
            state = t.state;
        }

        assert_eq!(state.phase(), GatePhase::AwaitingRedirect);
        assert!(!state.handled());
    }

    #[test]
    fn loading_event_rearms_timer() {
        let r = resolver();
        let state = started(&r);
        let first = state.armed_timer().unwrap();

        let t = r.handle(state, GateEvent::navigation("https://tracker.example/hop", true));
        let second = t.state.armed_timer().unwrap();

        assert_ne!(first, second);
        assert_eq!(
            t.effects,
            vec![
                GateEffect::CancelTimer { timer: first },
                GateEffect::ArmTimer {
                    timer: second,
                    after: Duration::from_secs(30)
                },
            ]
        );

        // the replaced timer is stale now
        let t = r.timer_fired(t.state, first);
        assert!(t.is_quiet());
        assert!(!t.state.timed_out());
    }

    #[test]
    fn events_after_decision_are_ignored() {
        let r = resolver();
        let state = started(&r);
        let state = r
            .handle(state, GateEvent::navigation("https://example.com/offer", false))
            .state;

        let t = r.handle(state.clone(), GateEvent::navigation("http://empty", false));
        assert!(t.is_quiet());
        assert_eq!(t.state.phase(), GatePhase::Resolved);
        assert_eq!(t.state.current_url(), Some("https://example.com/offer"));
    }

    #[test]
    fn navigation_without_url_is_ignored() {
        let r = resolver();
        let state = started(&r);
        let t = r.handle(
            state.clone(),
            GateEvent::Navigation {
                url: None,
                is_loading: false,
            },
        );
        assert!(t.is_quiet());
        assert_eq!(t.state, state);
    }

    #[test]
    fn default_policy_keeps_waiting_on_timeout() {
        let r = resolver();
        let state = started(&r);
        let timer = state.armed_timer().unwrap();

        let t = r.timer_fired(state, timer);

        assert!(t.is_quiet());
        assert!(t.state.timed_out());
        assert!(!t.state.handled());
        assert!(t.state.armed_timer().is_none());

        // a late redirect still decides the gate
        let t = r.handle(t.state, GateEvent::navigation("http://empty", false));
        assert_eq!(t.state.phase(), GatePhase::Escaped);
    }

    #[test]
    fn errors_are_recorded_without_transition() {
        let r = resolver();
        let state = started(&r);

        let t = r.handle(
            state,
            GateEvent::LoadError {
                code: -6,
                description: "connection refused".into(),
            },
        );

        assert!(t.is_quiet());
        assert_eq!(t.state.phase(), GatePhase::LoadingGate);
        assert!(!t.state.page_loading());
        assert!(matches!(
            t.state.last_error(),
            Some(WebViewError::Network { code: -6, .. })
        ));
    }

    #[test]
    fn escape_policy_routes_into_app_on_timeout() {
        let r = GateResolver::with_policy(config(), Arc::new(EscapeToApp)).unwrap();
        let state = started(&r);
        let timer = state.armed_timer().unwrap();

        let t = r.timer_fired(state, timer);

        assert_eq!(t.state.phase(), GatePhase::Escaped);
        assert_eq!(
            t.effects,
            vec![
                GateEffect::RemoveCache,
                GateEffect::HideWebView,
                GateEffect::RouteIntoApp
            ]
        );
    }

    #[test]
    fn retry_policy_reloads_then_escapes() {
        let r = GateResolver::with_policy(config(), Arc::new(RetryThenEscape::new(1))).unwrap();
        let state = started(&r);

        let t = r.handle(
            state,
            GateEvent::HttpError {
                status: 503,
                url: Some(ENTRY.into()),
            },
        );
        assert_eq!(t.state.reloads(), 1);
        assert!(t.effects.contains(&GateEffect::LoadUrl {
            url: ENTRY.into(),
            visible: false
        }));
        let timer = t.state.armed_timer().unwrap();

        let t = r.timer_fired(t.state, timer);
        assert_eq!(t.state.phase(), GatePhase::Escaped);
    }

    #[test]
    fn unmount_silences_everything() {
        let r = resolver();
        let state = started(&r);
        let timer = state.armed_timer().unwrap();

        let t = r.unmount(state);
        assert_eq!(t.effects, vec![GateEffect::CancelTimer { timer }]);
        let frozen = t.state.clone();

        let t = r.handle(t.state, GateEvent::navigation("https://example.com/offer", false));
        assert!(t.is_quiet());
        assert_eq!(t.state, frozen);

        let t = r.timer_fired(t.state, timer);
        assert!(t.is_quiet());
        assert_eq!(t.state, frozen);
    }

    #[test]
    fn load_started_promotes_to_awaiting_redirect() {
        let r = resolver();
        let state = started(&r);
        let t = r.handle(
            state,
            GateEvent::LoadStarted {
                url: Some(ENTRY.into()),
            },
        );
        assert_eq!(t.state.phase(), GatePhase::AwaitingRedirect);
        assert!(t.is_quiet());
    }

    #[test]
    fn events_before_start_are_ignored() {
        let r = resolver();
        let t = r.handle(GateState::new(), GateEvent::navigation("http://empty", false));
        assert_eq!(t.state.phase(), GatePhase::Uninitialized);
        assert!(t.is_quiet());
    }
}
