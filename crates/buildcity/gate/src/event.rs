use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::{TimerId, WebViewError};

/// Inbound signal from the web view host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GateEvent {
    /// The web view started loading a document
    LoadStarted {
        #[serde(default)]
        url: Option<String>,
    },
    /// Navigation state changed
    Navigation {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        is_loading: bool,
    },
    /// Network-level load failure
    LoadError { code: i32, description: String },
    /// HTTP error status while loading
    HttpError {
        status: u16,
        #[serde(default)]
        url: Option<String>,
    },
}

impl GateEvent {
    /// Shorthand for a navigation event.
    pub fn navigation(url: impl Into<String>, is_loading: bool) -> Self {
        GateEvent::Navigation {
            url: Some(url.into()),
            is_loading,
        }
    }

    /// The web-view error carried by this event, if any.
    pub fn as_error(&self) -> Option<WebViewError> {
        match self {
            GateEvent::LoadError { code, description } => Some(WebViewError::Network {
                code: *code,
                description: description.clone(),
            }),
            GateEvent::HttpError { status, url } => Some(WebViewError::Http {
                status: *status,
                url: url.clone(),
            }),
            _ => None,
        }
    }
}

/// Side effect requested by the resolver. Executed by the session in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateEffect {
    /// Point the web view at `url`; `visible = false` keeps it at opacity 0
    LoadUrl { url: String, visible: bool },
    /// Make the already-loaded page visible and settle on `url`
    Reveal { url: String },
    /// Remove the web view from screen
    HideWebView,
    /// Start (or restart) the redirect timer
    ArmTimer { timer: TimerId, after: Duration },
    /// Cancel a previously armed timer
    CancelTimer { timer: TimerId },
    /// Write `cached_gate_url`
    PersistCache { url: String },
    /// Delete `cached_gate_url`
    RemoveCache,
    /// Route to onboarding or home based on the onboarding flag
    RouteIntoApp,
}

impl GateEffect {
    /// Whether this effect touches the persisted gate cache.
    pub fn touches_cache(&self) -> bool {
        matches!(self, GateEffect::PersistCache { .. } | GateEffect::RemoveCache)
    }
}
