//! Gate Resolver: decides, once per launch, between a remote page and the
//! app's own onboarding/home routing.
//!
//! The entry URL is loaded in a hidden web view. The first settled
//! navigation away from it picks the outcome:
//!
//! - **Escaped**: the redirect lands on the empty sentinel. The cache is
//!   cleared and the app routes to onboarding or home.
//! - **Resolved**: any other URL. It is cached so the next launch shows it
//!   immediately without the network round trip.
//!
//! ## Invariants
//!
//! - **At-most-once decision**: `handled` flips false→true once per launch.
//!   Nothing after that touches the phase or the cache.
//! - **Sole cache writer**: only this crate writes `cached_gate_url`. Hosts
//!   reset it through [`forget_cached_url`].
//! - **Teardown is final**: after unmount no input produces an effect.
//!
//! ## Layout
//!
//! [`GateResolver`] is a pure reducer over [`GateState`]; it returns
//! [`GateEffect`]s instead of performing I/O. [`GateSession`] drives it from
//! an event channel, owns the redirect timer and executes the effects
//! against a [`KeyValueStore`](buildcity_store::KeyValueStore), a
//! [`WebView`] and a [`Router`].

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod mocks;
pub mod policy;
pub mod resolver;
pub mod session;
pub mod state;
pub mod traits;
pub mod url;

pub use cache::{cached_url, forget_cached_url};
pub use config::{GateConfig, DEFAULT_EMPTY_REDIRECT, DEFAULT_ENTRY_URL, DEFAULT_REDIRECT_TIMEOUT};
pub use error::GateError;
pub use event::{GateEffect, GateEvent};
pub use mocks::{RecordingRouter, RecordingWebView, RouterCall, WebViewCall};
pub use policy::{EscapeToApp, FallbackAction, FallbackPolicy, RetryThenEscape, StayOnLoader};
pub use resolver::{GateResolver, Transition};
pub use session::{GateHandle, GateInbox, GateOutcome, GateSession};
pub use state::{GatePhase, GateState, GateView, TimerId, WebViewError};
pub use traits::{Destination, Router, WebView};
pub use url::{is_same_url, normalize_url};
