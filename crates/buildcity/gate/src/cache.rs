//! The persisted redirect cache, as seen from outside a session.

use buildcity_store::{keys, KeyValueStore};
use tracing::info;

use crate::GateError;

/// URL a previous launch resolved to, if any.
pub async fn cached_url(store: &dyn KeyValueStore) -> Result<Option<String>, GateError> {
    Ok(store.get(keys::CACHED_GATE_URL).await?)
}

/// Forget the resolved URL so the next launch loads the entry page again.
pub async fn forget_cached_url(store: &dyn KeyValueStore) -> Result<(), GateError> {
    store.remove(keys::CACHED_GATE_URL).await?;
    info!("Cached gate url cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildcity_store::InMemoryStore;

    #[tokio::test]
    async fn forget_clears_only_the_gate_cache() {
        let store = InMemoryStore::with_entries([
            (keys::CACHED_GATE_URL, "https://example.com/offer"),
            (keys::HAS_SEEN_ONBOARDING, keys::FLAG_TRUE),
        ]);
        assert_eq!(
            cached_url(&store).await.unwrap().as_deref(),
            Some("https://example.com/offer")
        );

        forget_cached_url(&store).await.unwrap();
        forget_cached_url(&store).await.unwrap();

        assert!(cached_url(&store).await.unwrap().is_none());
        assert!(store.get(keys::HAS_SEEN_ONBOARDING).await.unwrap().is_some());
    }
}
