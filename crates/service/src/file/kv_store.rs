use std::sync::Arc;
use crate::cart::ports::PersistentStore;
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed slot store.
/// Keeps a map of `key -> serialized blob` persisted as JSON.
#[derive(Clone)]
pub struct FileKvStore {
    store: Arc<JsonMapStore<String, String>>,
}

impl FileKvStore {
    /// Open the store at the given file path. Creates the file if missing.
    pub async fn open<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, String>::open(path).await?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait::async_trait]
impl PersistentStore for FileKvStore {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.store.get(&key.to_string()).await)
    }

    async fn write(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }

    async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        self.store.remove(&key.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn slots_survive_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_kv_{}.json", Uuid::new_v4()));
        let store = FileKvStore::open(&tmp).await?;

        assert_eq!(store.read("@RocketShoes:cart").await?, None);
        store.write("@RocketShoes:cart", "[]".to_string()).await?;
        store.write("@Other:slot", "x".to_string()).await?;

        // reopen from disk to ensure persistence
        let store2 = FileKvStore::open(&tmp).await?;
        assert_eq!(store2.read("@RocketShoes:cart").await?.as_deref(), Some("[]"));
        assert!(store2.remove("@Other:slot").await?);
        assert!(!store2.remove("@Other:slot").await?);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
