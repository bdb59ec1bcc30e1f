use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map.
///
/// The whole map is rewritten on every change. Writes go to a sibling
/// `.tmp` file first and are renamed over the target, so a crash never
/// leaves a half-written file behind.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

fn storage_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`, creating the file (and its parent directory)
    /// with an empty map if missing. An unreadable map starts over empty.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(storage_err)?;
            }
        }

        let store = Self { inner: Arc::new(RwLock::new(HashMap::new())), file_path };
        match fs::read(&store.file_path).await {
            Ok(bytes) => match serde_json::from_slice::<HashMap<K, V>>(&bytes) {
                Ok(map) => *store.inner.write().await = map,
                Err(e) => {
                    warn!(path = %store.file_path.display(), error = %e, "storage file is not a valid map; starting empty");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => store.persist(&HashMap::new()).await?,
            Err(e) => return Err(storage_err(e)),
        }
        Ok(Arc::new(store))
    }

    /// Callers hold the write guard while persisting so two saves never
    /// interleave on the temp file.
    async fn persist(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(storage_err)?;
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, data).await.map_err(storage_err)?;
        fs::rename(&tmp, &self.file_path).await.map_err(storage_err)?;
        Ok(())
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value and persist. The in-memory map is only
    /// changed once the file write succeeded.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key, value);
        self.persist(&next).await?;
        *map = next;
        Ok(())
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        if !map.contains_key(key) {
            return Ok(false);
        }
        let mut next = map.clone();
        next.remove(key);
        self.persist(&next).await?;
        *map = next;
        Ok(true)
    }
}
