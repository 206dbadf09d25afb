use std::fmt;

use serde::{Deserialize, Serialize};

/// Embedded web view, as far as the gate needs it.
///
/// Navigation callbacks flow the other way, as
/// [`GateEvent`](crate::GateEvent)s on the session channel.
pub trait WebView: Send + Sync {
    /// Load `url`. A hidden web view keeps loading at opacity 0.
    fn load(&self, url: &str, visible: bool);

    /// Show the current page, settled on `url`.
    fn reveal(&self, url: &str);

    /// Take the web view off screen.
    fn hide(&self);
}

/// In-app screen transitions.
pub trait Router: Send + Sync {
    /// Replace the current history entry.
    fn replace(&self, path: &str);

    /// Push a new history entry.
    fn push(&self, path: &str);
}

/// Where the app goes after an escaped gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Onboarding,
    Home,
}

impl Destination {
    /// Route path understood by the host router.
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Onboarding => "/onboarding",
            Destination::Home => "/(tabs)",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
