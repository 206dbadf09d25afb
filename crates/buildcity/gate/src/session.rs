use std::sync::Arc;

use buildcity_store::{keys, KeyValueStore};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::GateError;
use crate::event::{GateEffect, GateEvent};
use crate::resolver::{GateResolver, Transition};
use crate::state::{GatePhase, GateState, TimerId};
use crate::traits::{Destination, Router, WebView};

/// How a gate session ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    /// A remote page is shown (from cache or a fresh redirect)
    Resolved { url: String },
    /// The gate was abandoned and the app routed to `destination`
    Escaped { destination: Destination },
    /// Torn down, or the event source went away, before a decision
    Abandoned,
}

/// Host-side handle: delivers web-view events and signals teardown.
#[derive(Clone)]
pub struct GateHandle {
    events: mpsc::Sender<GateEvent>,
    mounted: Arc<watch::Sender<bool>>,
}

impl GateHandle {
    /// Deliver a web-view event to the session.
    pub async fn send(&self, event: GateEvent) -> Result<(), GateError> {
        self.events
            .send(event)
            .await
            .map_err(|_| GateError::SessionClosed)
    }

    /// The gate screen is going away. Pending timers and any effects not
    /// yet executed are dropped.
    pub fn unmount(&self) {
        self.mounted.send_replace(false);
    }

    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }
}

/// Session-side receiving end, consumed by [`GateSession::run`].
pub struct GateInbox {
    events: mpsc::Receiver<GateEvent>,
    mounted: watch::Receiver<bool>,
}

enum Input {
    Event(GateEvent),
    Timer(TimerId),
    Unmount,
    Closed,
}

/// Drives a [`GateResolver`] against real collaborators.
///
/// One input is processed at a time, so the `handled` check-then-act in
/// the resolver never races with the timer.
pub struct GateSession {
    resolver: GateResolver,
    store: Arc<dyn KeyValueStore>,
    web_view: Arc<dyn WebView>,
    router: Arc<dyn Router>,
}

impl GateSession {
    pub fn new(
        resolver: GateResolver,
        store: Arc<dyn KeyValueStore>,
        web_view: Arc<dyn WebView>,
        router: Arc<dyn Router>,
    ) -> Self {
        Self {
            resolver,
            store,
            web_view,
            router,
        }
    }

    /// Event channel between the host and a session.
    pub fn channel(buffer: usize) -> (GateHandle, GateInbox) {
        let (events_tx, events_rx) = mpsc::channel(buffer.max(1));
        let (mounted_tx, mounted_rx) = watch::channel(true);
        (
            GateHandle {
                events: events_tx,
                mounted: Arc::new(mounted_tx),
            },
            GateInbox {
                events: events_rx,
                mounted: mounted_rx,
            },
        )
    }

    pub fn resolver(&self) -> &GateResolver {
        &self.resolver
    }

    /// Run the gate to a decision, teardown, or end of input.
    pub async fn run(self, inbox: GateInbox) -> GateOutcome {
        let GateInbox {
            mut events,
            mut mounted,
        } = inbox;

        if !*mounted.borrow() {
            return GateOutcome::Abandoned;
        }

        let cached = match self.store.get(keys::CACHED_GATE_URL).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Failed to load cached gate url");
                None
            }
        };

        let mut timer: Option<(TimerId, Instant)> = None;
        let mut routed: Option<Destination> = None;
        // every handle dropped: drain buffered events, then end on channel close
        let mut watching = true;

        let transition = self.resolver.start(GateState::new(), cached.as_deref());
        let mut state = self
            .apply(transition, &mut timer, &mounted, &mut routed)
            .await;

        loop {
            if !*mounted.borrow() {
                return self.teardown(state, &mut timer);
            }

            if state.handled() {
                return self.outcome(&state, routed);
            }

            let deadline = timer;
            let input = tokio::select! {
                biased;
                changed = mounted.changed(), if watching => match changed {
                    Ok(()) if *mounted.borrow() => continue,
                    Ok(()) => Input::Unmount,
                    Err(_) => {
                        watching = false;
                        continue;
                    }
                },
                event = events.recv() => match event {
                    Some(event) => Input::Event(event),
                    None => Input::Closed,
                },
                _ = sleep_until(deadline.map(|(_, at)| at)) => match deadline {
                    Some((id, _)) => Input::Timer(id),
                    None => continue,
                },
            };

            let transition = match input {
                Input::Event(event) => self.resolver.handle(state, event),
                Input::Timer(id) => {
                    timer = None;
                    self.resolver.timer_fired(state, id)
                }
                Input::Unmount => return self.teardown(state, &mut timer),
                Input::Closed => {
                    warn!(phase = %state.phase(), "Web view event stream closed before a decision");
                    return GateOutcome::Abandoned;
                }
            };

            state = self
                .apply(transition, &mut timer, &mounted, &mut routed)
                .await;
        }
    }

    /// Execute effects in order, stopping at the first sign of teardown.
    async fn apply(
        &self,
        transition: Transition,
        timer: &mut Option<(TimerId, Instant)>,
        mounted: &watch::Receiver<bool>,
        routed: &mut Option<Destination>,
    ) -> GateState {
        for effect in transition.effects {
            if !*mounted.borrow() {
                debug!("Component unmounted, dropping remaining effects");
                break;
            }

            match effect {
                GateEffect::LoadUrl { url, visible } => self.web_view.load(&url, visible),
                GateEffect::Reveal { url } => self.web_view.reveal(&url),
                GateEffect::HideWebView => self.web_view.hide(),
                GateEffect::ArmTimer { timer: id, after } => {
                    *timer = Some((id, Instant::now() + after));
                }
                GateEffect::CancelTimer { timer: id } => {
                    if matches!(timer, Some((armed, _)) if *armed == id) {
                        *timer = None;
                    }
                }
                GateEffect::PersistCache { url } => {
                    match self.store.set(keys::CACHED_GATE_URL, &url).await {
                        Ok(()) => info!(url = %url, "Cached redirect URL for future launches"),
                        Err(e) => warn!(error = %e, "Failed to cache gate url"),
                    }
                }
                GateEffect::RemoveCache => {
                    if let Err(e) = self.store.remove(keys::CACHED_GATE_URL).await {
                        warn!(error = %e, "Failed to clear cached gate url");
                    }
                }
                GateEffect::RouteIntoApp => {
                    *routed = self.route_into_app(mounted).await;
                }
            }
        }
        transition.state
    }

    /// `None` when the screen went away while the onboarding flag was read.
    async fn route_into_app(&self, mounted: &watch::Receiver<bool>) -> Option<Destination> {
        let destination = match self.store.get(keys::HAS_SEEN_ONBOARDING).await {
            Ok(None) => Destination::Onboarding,
            Ok(Some(_)) => Destination::Home,
            Err(e) => {
                warn!(error = %e, "Error checking onboarding status, falling back to onboarding");
                Destination::Onboarding
            }
        };
        if !*mounted.borrow() {
            debug!(destination = %destination, "Unmounted during onboarding lookup, not routing");
            return None;
        }
        info!(destination = %destination, "Routing into app");
        self.router.replace(destination.path());
        Some(destination)
    }

    /// Run the resolver's unmount and honour its timer cancellation. No
    /// other effect reaches the host after teardown.
    fn teardown(&self, state: GateState, timer: &mut Option<(TimerId, Instant)>) -> GateOutcome {
        let transition = self.resolver.unmount(state);
        for effect in &transition.effects {
            match effect {
                GateEffect::CancelTimer { timer: id } => {
                    if matches!(timer, Some((armed, _)) if *armed == *id) {
                        *timer = None;
                    }
                }
                other => debug!(effect = ?other, "Effect dropped at teardown"),
            }
        }
        info!(phase = %transition.state.phase(), "Gate unmounted before completion");
        GateOutcome::Abandoned
    }

    fn outcome(&self, state: &GateState, routed: Option<Destination>) -> GateOutcome {
        match (state.phase(), state.current_url(), routed) {
            (GatePhase::Resolved, Some(url), _) => GateOutcome::Resolved {
                url: url.to_string(),
            },
            (GatePhase::Escaped, _, Some(destination)) => GateOutcome::Escaped { destination },
            _ => GateOutcome::Abandoned,
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
