use std::sync::Mutex;

use crate::traits::{Router, WebView};

/// Call observed by [`RecordingWebView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebViewCall {
    Load { url: String, visible: bool },
    Reveal { url: String },
    Hide,
}

/// Web view that only records what it was asked to do.
///
/// Used by tests and by headless hosts such as the CLI.
#[derive(Default)]
pub struct RecordingWebView {
    calls: Mutex<Vec<WebViewCall>>,
}

impl RecordingWebView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WebViewCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// URLs passed to `load`, in order.
    pub fn loaded_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WebViewCall::Load { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: WebViewCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl WebView for RecordingWebView {
    fn load(&self, url: &str, visible: bool) {
        self.record(WebViewCall::Load {
            url: url.to_string(),
            visible,
        });
    }

    fn reveal(&self, url: &str) {
        self.record(WebViewCall::Reveal {
            url: url.to_string(),
        });
    }

    fn hide(&self) {
        self.record(WebViewCall::Hide);
    }
}

/// Call observed by [`RecordingRouter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterCall {
    Replace(String),
    Push(String),
}

/// Router that records transitions.
#[derive(Default)]
pub struct RecordingRouter {
    calls: Mutex<Vec<RouterCall>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RouterCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Path of the most recent transition.
    pub fn current(&self) -> Option<String> {
        self.calls().last().map(|call| match call {
            RouterCall::Replace(path) | RouterCall::Push(path) => path.clone(),
        })
    }

    fn record(&self, call: RouterCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Router for RecordingRouter {
    fn replace(&self, path: &str) {
        self.record(RouterCall::Replace(path.to_string()));
    }

    fn push(&self, path: &str) {
        self.record(RouterCall::Push(path.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_view_records_in_order() {
        let view = RecordingWebView::new();
        view.load("https://gate.example", false);
        view.reveal("https://example.com/offer");
        view.hide();

        assert_eq!(view.loaded_urls(), vec!["https://gate.example".to_string()]);
        assert_eq!(view.calls().len(), 3);
        assert_eq!(view.calls()[2], WebViewCall::Hide);
    }

    #[test]
    fn router_tracks_current_path() {
        let router = RecordingRouter::new();
        assert!(router.current().is_none());

        router.replace("/onboarding");
        router.push("/meal-history");

        assert_eq!(router.current().as_deref(), Some("/meal-history"));
        assert_eq!(
            router.calls()[0],
            RouterCall::Replace("/onboarding".to_string())
        );
    }
}
