//! What the gate does when the redirect never settles.
//!
//! The redirect timer and web-view errors do not decide anything on their
//! own. They consult a [`FallbackPolicy`], injected into the resolver.

use crate::state::{GateState, WebViewError};

/// Action chosen by a fallback policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackAction {
    /// Stay on the loader and keep listening for navigation events
    KeepWaiting,
    /// Load the entry URL again and re-arm the timer
    Reload,
    /// Give up on the gate; behaves exactly like an empty redirect
    Escape,
}

/// Strategy for timeouts and load errors while the gate is undecided.
pub trait FallbackPolicy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The redirect timer fired with no decision.
    fn on_timeout(&self, state: &GateState) -> FallbackAction;

    /// The web view reported an error with no decision.
    fn on_load_error(&self, state: &GateState, error: &WebViewError) -> FallbackAction;
}

/// Log and keep waiting. The user stays on the loader until a navigation
/// event arrives.
#[derive(Clone, Copy, Debug, Default)]
pub struct StayOnLoader;

impl FallbackPolicy for StayOnLoader {
    fn name(&self) -> &'static str {
        "stay"
    }

    fn on_timeout(&self, _state: &GateState) -> FallbackAction {
        FallbackAction::KeepWaiting
    }

    fn on_load_error(&self, _state: &GateState, _error: &WebViewError) -> FallbackAction {
        FallbackAction::KeepWaiting
    }
}

/// Treat any timeout or load error as an empty redirect.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapeToApp;

impl FallbackPolicy for EscapeToApp {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn on_timeout(&self, _state: &GateState) -> FallbackAction {
        FallbackAction::Escape
    }

    fn on_load_error(&self, _state: &GateState, _error: &WebViewError) -> FallbackAction {
        FallbackAction::Escape
    }
}

/// Reload the entry URL up to `max_reloads` times, then escape.
#[derive(Clone, Copy, Debug)]
pub struct RetryThenEscape {
    pub max_reloads: u32,
}

impl RetryThenEscape {
    pub fn new(max_reloads: u32) -> Self {
        Self { max_reloads }
    }

    fn next(&self, state: &GateState) -> FallbackAction {
        if state.reloads() < self.max_reloads {
            FallbackAction::Reload
        } else {
            FallbackAction::Escape
        }
    }
}

impl Default for RetryThenEscape {
    fn default() -> Self {
        Self { max_reloads: 2 }
    }
}

impl FallbackPolicy for RetryThenEscape {
    fn name(&self) -> &'static str {
        "retry"
    }

    fn on_timeout(&self, state: &GateState) -> FallbackAction {
        self.next(state)
    }

    fn on_load_error(&self, state: &GateState, _error: &WebViewError) -> FallbackAction {
        self.next(state)
    }
}
