//! An in-memory [`Storage`] implementation, used by the registry crate's own
//! tests and by API integration tests so ingestion's concurrency properties
//! can be exercised without touching a filesystem.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::error::StorageError;
use crate::store::Storage;

#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, Bytes>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.data.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.data
            .get(key)
            .map(|v| v.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StorageError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .data
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    async fn move_key(&self, src: &str, dst: &str) -> Result<(), StorageError> {
        let value = self
            .data
            .remove(src)
            .ok_or_else(|| StorageError::NotFound(src.to_string()))?
            .1;
        self.data.insert(dst.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        store.put("a/b", Bytes::from_static(b"hello")).await.unwrap();
        assert!(store.exists("a/b").await.unwrap());
        assert_eq!(store.get("a/b").await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn get_missing_key_fails() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = MemoryStore::new();
        store.put("foo/a", Bytes::new()).await.unwrap();
        store.put("foo/b", Bytes::new()).await.unwrap();
        store.put("bar/a", Bytes::new()).await.unwrap();
        let mut keys = store.list("foo/").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["foo/a".to_string(), "foo/b".to_string()]);
    }

    #[tokio::test]
    async fn move_key_relocates_value() {
        let store = MemoryStore::new();
        store.put("src", Bytes::from_static(b"x")).await.unwrap();
        store.move_key("src", "dst").await.unwrap();
        assert!(!store.exists("src").await.unwrap());
        assert_eq!(store.get("dst").await.unwrap(), Bytes::from_static(b"x"));
    }
}
