use std::sync::Arc;

use buildcity_store::{keys, KeyValueStore};
use tracing::info;

use crate::RecordsResult;

/// Onboarding completion flag, read by the gate to pick the post-gate route.
#[derive(Clone)]
pub struct Onboarding {
    store: Arc<dyn KeyValueStore>,
}

impl Onboarding {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Any stored value counts as seen.
    pub async fn has_seen(&self) -> RecordsResult<bool> {
        Ok(self.store.get(keys::HAS_SEEN_ONBOARDING).await?.is_some())
    }

    pub async fn complete(&self) -> RecordsResult<()> {
        self.store
            .set(keys::HAS_SEEN_ONBOARDING, keys::FLAG_TRUE)
            .await?;
        info!("Onboarding completed");
        Ok(())
    }

    /// Show onboarding again on the next launch.
    pub async fn reset(&self) -> RecordsResult<()> {
        self.store.remove(keys::HAS_SEEN_ONBOARDING).await?;
        info!("Onboarding status reset");
        Ok(())
    }
}

/// First-launch detection.
#[derive(Clone)]
pub struct InstallTracker {
    store: Arc<dyn KeyValueStore>,
}

impl InstallTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record a launch. Returns true only for the very first one.
    pub async fn record_launch(&self) -> RecordsResult<bool> {
        if self.store.get(keys::APP_INSTALL_TRACKED).await?.is_some() {
            return Ok(false);
        }
        self.store
            .set(keys::APP_INSTALL_TRACKED, keys::FLAG_TRUE)
            .await?;
        info!("First app launch detected");
        Ok(true)
    }
}
