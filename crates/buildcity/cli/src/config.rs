//! Configuration for the buildcity CLI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use buildcity_gate::{
    EscapeToApp, FallbackPolicy, GateConfig, GateError, GateResolver, RetryThenEscape,
    StayOnLoader, DEFAULT_EMPTY_REDIRECT, DEFAULT_ENTRY_URL, DEFAULT_REDIRECT_TIMEOUT,
};
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistent store
    #[serde(default)]
    pub store: StoreConfig,

    /// Gate resolution
    #[serde(default)]
    pub gate: GateSettings,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file backing the key-value store
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// What the gate does when the redirect times out or the page fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    /// Keep the loader up
    #[default]
    Stay,
    /// Route into the app as if the gate redirected to the empty sentinel
    Escape,
    /// Reload the entry URL, then escape
    Retry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    #[serde(default = "default_entry_url")]
    pub entry_url: String,

    #[serde(default = "default_empty_redirect")]
    pub empty_redirect: String,

    #[serde(default = "default_redirect_timeout_ms")]
    pub redirect_timeout_ms: u64,

    #[serde(default)]
    pub fallback: FallbackKind,

    /// Reload budget for the `retry` fallback
    #[serde(default = "default_max_reloads")]
    pub max_reloads: u32,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            entry_url: default_entry_url(),
            empty_redirect: default_empty_redirect(),
            redirect_timeout_ms: default_redirect_timeout_ms(),
            fallback: FallbackKind::default(),
            max_reloads: default_max_reloads(),
        }
    }
}

impl GateSettings {
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            entry_url: self.entry_url.clone(),
            empty_redirect: self.empty_redirect.clone(),
            redirect_timeout: Duration::from_millis(self.redirect_timeout_ms),
        }
    }

    pub fn policy(&self) -> Arc<dyn FallbackPolicy> {
        match self.fallback {
            FallbackKind::Stay => Arc::new(StayOnLoader),
            FallbackKind::Escape => Arc::new(EscapeToApp),
            FallbackKind::Retry => Arc::new(RetryThenEscape::new(self.max_reloads)),
        }
    }

    pub fn resolver(&self) -> Result<GateResolver, GateError> {
        GateResolver::with_policy(self.gate_config(), self.policy())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("buildcity").join("store.json"))
        .unwrap_or_else(|| PathBuf::from("buildcity-store.json"))
}

fn default_entry_url() -> String {
    DEFAULT_ENTRY_URL.to_string()
}

fn default_empty_redirect() -> String {
    DEFAULT_EMPTY_REDIRECT.to_string()
}

fn default_redirect_timeout_ms() -> u64 {
    DEFAULT_REDIRECT_TIMEOUT.as_millis() as u64
}

fn default_max_reloads() -> u32 {
    2
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl AppConfig {
    /// Layer defaults, the optional file and `BUILDCITY_*` variables.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `BUILDCITY_GATE__REDIRECT_TIMEOUT_MS=5000`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, config::Environment::with_prefix("BUILDCITY"))
    }

    fn load_with_env(
        path: Option<&str>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            env.prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
