use std::sync::Arc;

use buildcity_store::{keys, KeyValueStore};
use tracing::{info, warn};

use crate::{RecordsError, RecordsResult};

/// Name shown before the user picks one.
pub const DEFAULT_USERNAME: &str = "Username";

/// Account settings and the delete-all switch.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn username(&self) -> RecordsResult<String> {
        Ok(self
            .store
            .get(keys::USERNAME)
            .await?
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string()))
    }

    /// Save a trimmed username. Returns false when nothing changed.
    pub async fn set_username(&self, name: &str) -> RecordsResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordsError::InvalidInput(
                "username must not be empty".into(),
            ));
        }
        if self.username().await? == name {
            return Ok(false);
        }
        self.store.set(keys::USERNAME, name).await?;
        info!(username = name, "Username saved");
        Ok(true)
    }

    /// Wipe every stored key: records, settings, gate cache and flags.
    pub async fn delete_all_data(&self) -> RecordsResult<()> {
        self.store.clear().await?;
        warn!("All app data deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildcity_store::InMemoryStore;

    #[tokio::test]
    async fn username_defaults_and_trims() {
        let settings = Settings::new(Arc::new(InMemoryStore::new()));
        assert_eq!(settings.username().await.unwrap(), DEFAULT_USERNAME);

        assert!(settings.set_username("  Mason  ").await.unwrap());
        assert_eq!(settings.username().await.unwrap(), "Mason");
        assert!(!settings.set_username("Mason").await.unwrap());
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let settings = Settings::new(Arc::new(InMemoryStore::new()));
        let result = settings.set_username("   ").await;
        assert!(matches!(result, Err(RecordsError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn delete_all_clears_every_key() {
        let store = Arc::new(InMemoryStore::with_entries([
            (keys::USERNAME, "Mason"),
            (keys::CACHED_GATE_URL, "https://example.com/offer"),
            (keys::HAS_SEEN_ONBOARDING, "true"),
        ]));
        let settings = Settings::new(store.clone());

        settings.delete_all_data().await.unwrap();

        assert!(store.is_empty());
        assert_eq!(settings.username().await.unwrap(), DEFAULT_USERNAME);
    }
}
