use std::time::Duration;

use crate::error::GateError;
use crate::url::normalize_url;

/// Entry URL loaded on a launch without a usable cache.
pub const DEFAULT_ENTRY_URL: &str = "https://insanecrockslux.com/buildcityapp";

/// Redirect target meaning "no offer, continue into the app".
pub const DEFAULT_EMPTY_REDIRECT: &str = "http://empty";

/// Time allowed since the last loading event before the fallback policy runs.
pub const DEFAULT_REDIRECT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Configuration for the gate resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    /// URL loaded first (default: [`DEFAULT_ENTRY_URL`])
    pub entry_url: String,
    /// Empty-redirect sentinel (default: [`DEFAULT_EMPTY_REDIRECT`])
    pub empty_redirect: String,
    /// Redirect wait, re-armed on every loading event (default: 30s)
    pub redirect_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            entry_url: DEFAULT_ENTRY_URL.to_string(),
            empty_redirect: DEFAULT_EMPTY_REDIRECT.to_string(),
            redirect_timeout: DEFAULT_REDIRECT_TIMEOUT,
        }
    }
}

impl GateConfig {
    /// Reject configurations the state machine cannot decide with.
    pub fn validate(&self) -> Result<(), GateError> {
        let entry = normalize_url(Some(self.entry_url.as_str()));
        let sentinel = normalize_url(Some(self.empty_redirect.as_str()));

        if entry.is_empty() {
            return Err(GateError::InvalidConfig("entry_url is empty".into()));
        }
        if sentinel.is_empty() {
            return Err(GateError::InvalidConfig("empty_redirect is empty".into()));
        }
        if entry == sentinel {
            return Err(GateError::InvalidConfig(
                "entry_url and empty_redirect normalize to the same URL".into(),
            ));
        }
        if self.redirect_timeout.is_zero() {
            return Err(GateError::InvalidConfig(
                "redirect_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.redirect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn entry_equal_to_sentinel_is_rejected() {
        let config = GateConfig {
            entry_url: "HTTP://EMPTY/".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GateError::InvalidConfig(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = GateConfig {
            redirect_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
