use buildcity_store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::{RecordsError, RecordsResult};

/// Read a JSON value. Missing or malformed data is `None`.
pub(crate) async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> RecordsResult<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed stored record");
            Ok(None)
        }
    }
}

/// Read a JSON array. Missing or malformed data is empty.
pub(crate) async fn load_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> RecordsResult<Vec<T>> {
    Ok(load(store, key).await?.unwrap_or_default())
}

pub(crate) async fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> RecordsResult<()> {
    let raw =
        serde_json::to_string(value).map_err(|e| RecordsError::Serialization(e.to_string()))?;
    store.set(key, &raw).await?;
    Ok(())
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
