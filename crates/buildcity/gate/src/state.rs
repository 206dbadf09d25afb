use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the gate state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePhase {
    /// Nothing started yet
    Uninitialized,
    /// Entry URL requested, no web-view signal yet
    LoadingGate,
    /// Web view is navigating; waiting for the first settled redirect
    AwaitingRedirect,
    /// Terminal: a remote page is shown and cached
    Resolved,
    /// Terminal: the gate was abandoned for normal app routing
    Escaped,
}

impl GatePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GatePhase::Resolved | GatePhase::Escaped)
    }
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GatePhase::Uninitialized => "uninitialized",
            GatePhase::LoadingGate => "loading_gate",
            GatePhase::AwaitingRedirect => "awaiting_redirect",
            GatePhase::Resolved => "resolved",
            GatePhase::Escaped => "escaped",
        };
        f.write_str(name)
    }
}

/// Identity of one armed redirect timer.
///
/// A fresh id is minted on every arm, so a timer that fires after being
/// replaced or cancelled is recognizably stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Failure reported by the web view while a page loads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WebViewError {
    /// Network-level failure (DNS, TLS, connection reset...)
    Network { code: i32, description: String },
    /// The server answered with an error status
    Http { status: u16, url: Option<String> },
}

impl fmt::Display for WebViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebViewError::Network { code, description } => {
                write!(f, "network error {code}: {description}")
            }
            WebViewError::Http { status, url: Some(url) } => write!(f, "http {status} at {url}"),
            WebViewError::Http { status, url: None } => write!(f, "http {status}"),
        }
    }
}

/// What the host should render for the gate screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateView {
    /// Full-screen loading indicator, no web view mounted
    Loader,
    /// Web view on `url`; `hidden` keeps it at opacity 0 while the gate is
    /// undecided, `overlay` draws the loading indicator on top
    Page {
        url: String,
        hidden: bool,
        overlay: bool,
    },
}

/// Process-local state of one gate run.
///
/// Created fresh per launch and never persisted. Only
/// [`GateResolver`](crate::GateResolver) moves it between phases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateState {
    pub(crate) phase: GatePhase,
    pub(crate) current_url: Option<String>,
    pub(crate) handled: bool,
    pub(crate) mounted: bool,
    pub(crate) timer: Option<TimerId>,
    pub(crate) next_timer: u64,
    pub(crate) timed_out: bool,
    pub(crate) reloads: u32,
    pub(crate) last_error: Option<WebViewError>,
    pub(crate) page_loading: bool,
}

impl Default for GateState {
    fn default() -> Self {
        Self::new()
    }
}

impl GateState {
    pub fn new() -> Self {
        Self {
            phase: GatePhase::Uninitialized,
            current_url: None,
            handled: false,
            mounted: true,
            timer: None,
            next_timer: 0,
            timed_out: false,
            reloads: 0,
            last_error: None,
            page_loading: true,
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// URL the web view is (or should be) showing.
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// True once a terminal decision has been made.
    pub fn handled(&self) -> bool {
        self.handled
    }

    pub fn mounted(&self) -> bool {
        self.mounted
    }

    /// Currently armed redirect timer.
    pub fn armed_timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Whether the redirect timer has fired at least once while undecided.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Entry-URL reloads issued by the fallback policy.
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    pub fn last_error(&self) -> Option<&WebViewError> {
        self.last_error.as_ref()
    }

    pub fn page_loading(&self) -> bool {
        self.page_loading
    }

    /// Render model for the host.
    pub fn view(&self) -> GateView {
        let showing = matches!(
            self.phase,
            GatePhase::LoadingGate | GatePhase::AwaitingRedirect | GatePhase::Resolved
        );
        match (&self.current_url, showing) {
            (Some(url), true) => GateView::Page {
                url: url.clone(),
                hidden: !self.handled,
                overlay: !self.handled || self.page_loading,
            },
            _ => GateView::Loader,
        }
    }

    pub(crate) fn arm_timer(&mut self) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timer = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_shows_loader() {
        let state = GateState::new();
        assert_eq!(state.phase(), GatePhase::Uninitialized);
        assert!(!state.handled());
        assert!(state.mounted());
        assert_eq!(state.view(), GateView::Loader);
    }

    #[test]
    fn undecided_page_is_hidden_behind_overlay() {
        let mut state = GateState::new();
        state.phase = GatePhase::AwaitingRedirect;
        state.current_url = Some("https://gate.example".into());
        state.page_loading = false;

        assert_eq!(
            state.view(),
            GateView::Page {
                url: "https://gate.example".into(),
                hidden: true,
                overlay: true,
            }
        );
    }

    #[test]
    fn timer_ids_are_never_reused() {
        let mut state = GateState::new();
        let first = state.arm_timer();
        let second = state.arm_timer();
        assert_ne!(first, second);
        assert_eq!(state.armed_timer(), Some(second));
    }
}
